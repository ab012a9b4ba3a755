//! Which coefficients carry a hidden bit, and how the bit is stored.
//!
//! Only luminance AC coefficients with a magnitude of at least 2 are used.
//! Changing the lowest magnitude bit of such a value never leaves its
//! category, so the Huffman symbol and the length of the bit field stay
//! the same; the file size does not depend on the payload.

/// Frame component whose coefficients carry payload bits.
pub const LUMINANCE: usize = 0;

/// Whether the AC coefficient `value` of `component` carries a payload bit.
#[inline]
pub fn is_eligible(component: usize, value: i32) -> bool {
    component == LUMINANCE && value.unsigned_abs() > 1
}

/// Store `bit` in the magnitude parity of `value`, keeping the sign.
#[inline]
pub fn embed_bit(value: i32, bit: u8) -> i32 {
    let magnitude = (value.unsigned_abs() & !1) | (bit & 1) as u32;
    if value < 0 {
        -(magnitude as i32)
    } else {
        magnitude as i32
    }
}

/// The bit carried by an eligible coefficient.
///
/// Negative values are stored in two's complement, so the lowest bit of the
/// value equals the lowest bit of its magnitude.
#[inline]
pub fn extract_bit(value: i32) -> u8 {
    (value & 1) as u8
}
