//! Payload framing used by the command line tool.
//!
//! `jsteg` magic, payload length as little endian `u32`, payload. Reveal
//! returns every eligible bit of an image, the frame tells where the hidden
//! payload ends.

use byteorder::{ByteOrder, LittleEndian};

use crate::{CliError, CliResult};

pub const MAGIC: &[u8; 5] = b"jsteg";

/// Bytes added in front of the payload.
pub const FRAME_OVERHEAD: usize = MAGIC.len() + 4;

/// Prefix `payload` with magic and length.
pub fn frame(payload: &[u8]) -> CliResult<Vec<u8>> {
    let len = u32::try_from(payload.len()).map_err(|_| CliError::PayloadTooLarge(payload.len()))?;

    let mut length = [0u8; 4];
    LittleEndian::write_u32(&mut length, len);

    let mut framed = Vec::with_capacity(FRAME_OVERHEAD + payload.len());
    framed.extend_from_slice(MAGIC);
    framed.extend_from_slice(&length);
    framed.extend_from_slice(payload);
    Ok(framed)
}

/// The payload inside revealed bytes.
pub fn unframe(revealed: &[u8]) -> CliResult<&[u8]> {
    let rest = revealed.strip_prefix(&MAGIC[..]).ok_or(CliError::NoHiddenData)?;

    if rest.len() < 4 {
        return Err(CliError::NoHiddenData);
    }
    let declared = LittleEndian::read_u32(&rest[..4]) as usize;
    let payload = &rest[4..];
    if declared > payload.len() {
        return Err(CliError::MalformedHiddenData {
            declared,
            available: payload.len(),
        });
    }
    Ok(&payload[..declared])
}

/// Largest payload that fits into `bits` eligible coefficients once framed.
pub fn max_payload(bits: usize) -> usize {
    (bits / 8).saturating_sub(FRAME_OVERHEAD)
}
