//! Payload bits in and out of the coefficient stream.
//!
//! Bits are taken from each payload byte starting with the least
//! significant one, one bit per eligible coefficient in scan order.

use crate::eligibility::{embed_bit, extract_bit, is_eligible};
use crate::jpeg::CoefficientHook;

/// Writes payload bits into eligible coefficients during encoding.
#[derive(Debug)]
pub struct PayloadPacker<'a> {
    payload: &'a [u8],
    /// Index of the next payload bit.
    cursor: usize,
    eligible: usize,
}

impl<'a> PayloadPacker<'a> {
    pub fn new(payload: &'a [u8]) -> Self {
        PayloadPacker {
            payload,
            cursor: 0,
            eligible: 0,
        }
    }

    /// Payload bits written so far.
    pub fn bits_written(&self) -> usize {
        self.cursor
    }

    /// Eligible coefficients seen so far.
    pub fn eligible(&self) -> usize {
        self.eligible
    }

    fn next_bit(&mut self) -> Option<u8> {
        let byte = self.payload.get(self.cursor / 8)?;
        let bit = (byte >> (self.cursor % 8)) & 1;
        self.cursor += 1;
        Some(bit)
    }
}

impl CoefficientHook for PayloadPacker<'_> {
    fn on_ac(&mut self, component: usize, value: i32) -> i32 {
        if !is_eligible(component, value) {
            return value;
        }
        self.eligible += 1;
        match self.next_bit() {
            Some(bit) => embed_bit(value, bit),
            // payload exhausted
            None => value,
        }
    }
}

/// Collects the bits of eligible coefficients during decoding.
#[derive(Debug, Default)]
pub struct PayloadUnpacker {
    data: Vec<u8>,
    /// Offset of the next bit within the last byte of `data`.
    offset: u8,
    eligible: usize,
}

impl PayloadUnpacker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eligible(&self) -> usize {
        self.eligible
    }

    /// The collected bytes; the last one is zero-padded.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

impl CoefficientHook for PayloadUnpacker {
    fn on_ac(&mut self, component: usize, value: i32) -> i32 {
        if !is_eligible(component, value) {
            return value;
        }
        if self.offset == 0 {
            self.data.push(0);
        }
        if let Some(last) = self.data.last_mut() {
            *last |= extract_bit(value) << self.offset;
        }
        self.offset = (self.offset + 1) % 8;
        self.eligible += 1;
        value
    }
}

/// Counts eligible coefficients without touching them.
#[derive(Debug, Default, Clone, Copy)]
pub struct CapacityCounter {
    eligible: usize,
}

impl CapacityCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of payload bits the counted coefficients can carry.
    pub fn bits(&self) -> usize {
        self.eligible
    }
}

impl CoefficientHook for CapacityCounter {
    #[inline]
    fn on_ac(&mut self, component: usize, value: i32) -> i32 {
        if is_eligible(component, value) {
            self.eligible += 1;
        }
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Coefficients 2 and 3 alternate so both parities are overwritten.
    fn carrier(len: usize) -> Vec<i32> {
        (0..len).map(|i| if i % 2 == 0 { 2 } else { -3 }).collect()
    }

    #[test]
    fn test_unpacker_bit_order() {
        let mut unpacker = PayloadUnpacker::new();
        for bit in [1, 0, 1, 1, 0, 0, 0, 0] {
            unpacker.on_ac(0, 2 + bit);
        }
        assert_eq!(unpacker.eligible(), 8);
        assert_eq!(unpacker.into_bytes(), vec![13]);
    }

    #[test]
    fn test_unpacker_pads_last_byte() {
        let mut unpacker = PayloadUnpacker::new();
        for _ in 0..9 {
            unpacker.on_ac(0, -5);
        }
        assert_eq!(unpacker.into_bytes(), vec![0xFF, 0x01]);
    }

    #[test]
    fn test_unpacker_ignores_ineligible() {
        let mut unpacker = PayloadUnpacker::new();
        unpacker.on_ac(0, 1);
        unpacker.on_ac(0, -1);
        unpacker.on_ac(1, 7);
        assert_eq!(unpacker.eligible(), 0);
        assert!(unpacker.into_bytes().is_empty());
    }

    #[test]
    fn test_packer_then_unpacker() {
        let payload = b"jsteg!";
        let mut packer = PayloadPacker::new(payload);
        let mut unpacker = PayloadUnpacker::new();

        for value in carrier(64) {
            let embedded = packer.on_ac(0, value);
            unpacker.on_ac(0, embedded);
        }

        assert_eq!(packer.bits_written(), 48);
        assert_eq!(packer.eligible(), 64);
        let revealed = unpacker.into_bytes();
        assert_eq!(revealed.len(), 8);
        assert_eq!(&revealed[..payload.len()], payload);
    }

    #[test]
    fn test_packer_passes_through_when_exhausted() {
        let mut packer = PayloadPacker::new(&[0x00]);
        let values = carrier(12);
        let out: Vec<i32> = values.iter().map(|&v| packer.on_ac(0, v)).collect();

        // 8 zero bits clear the parity, the rest is untouched
        assert!(out[..8].iter().all(|v| v & 1 == 0));
        assert_eq!(&out[8..], &values[8..]);
    }

    #[test]
    fn test_packer_skips_chroma_and_small_values() {
        let mut packer = PayloadPacker::new(&[0xFF]);
        assert_eq!(packer.on_ac(1, 4), 4);
        assert_eq!(packer.on_ac(0, 1), 1);
        assert_eq!(packer.on_ac(0, -1), -1);
        assert_eq!(packer.bits_written(), 0);
        assert_eq!(packer.on_ac(0, 4), 5);
        assert_eq!(packer.bits_written(), 1);
    }

    #[test]
    fn test_capacity_counter() {
        let mut counter = CapacityCounter::new();
        for (component, value) in [(0, 2), (0, 1), (1, 9), (0, -40), (2, -2)] {
            counter.on_ac(component, value);
        }
        assert_eq!(counter.bits(), 2);
    }
}
