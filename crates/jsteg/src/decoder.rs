//! Reveal: entropy-decode a JPEG and collect the hidden bits.

use std::io::Read;

use crate::error::Result;
use crate::jpeg::entropy::decode_scan;
use crate::jpeg::header::read_header;
use crate::jpeg::CoefficientHook;
use crate::payload::{CapacityCounter, PayloadUnpacker};

/// Read the bits hidden in the JPEG from `source`.
///
/// Every eligible coefficient contributes one bit, so the result is
/// `ceil(capacity / 8)` bytes long whatever was hidden; callers that embedded
/// a length or a terminator are expected to cut the payload out themselves.
pub fn reveal<R: Read>(mut source: R) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    source.read_to_end(&mut data)?;

    let mut unpacker = PayloadUnpacker::new();
    decode(&data, &mut unpacker)?;
    let eligible = unpacker.eligible();
    let revealed = unpacker.into_bytes();
    log::debug!("revealed {} bytes from {eligible} eligible coefficients", revealed.len());
    Ok(revealed)
}

/// Number of eligible coefficients in the JPEG from `source`.
pub fn jpeg_capacity<R: Read>(mut source: R) -> Result<usize> {
    let mut data = Vec::new();
    source.read_to_end(&mut data)?;

    let mut counter = CapacityCounter::new();
    decode(&data, &mut counter)?;
    Ok(counter.bits())
}

/// Validate the headers, then run the entropy decoder over the scan.
fn decode<H: CoefficientHook>(data: &[u8], hook: &mut H) -> Result<()> {
    let (header, offset) = read_header(data)?;
    log::debug!(
        "{}x{} frame with {} components, restart interval {}",
        header.frame.width,
        header.frame.height,
        header.frame.components.len(),
        header.restart_interval
    );

    let consumed = decode_scan(&data[offset..], &header, hook)?;
    let rest = &data[offset + consumed..];
    if !rest.starts_with(&[0xFF, 0xD9]) {
        log::debug!("scan is not followed by EOI, {} trailing bytes ignored", rest.len());
    }
    Ok(())
}
