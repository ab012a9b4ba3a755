//! Bit-level I/O for entropy-coded segments.
//!
//! Both directions handle:
//! - MSB-first bit order
//! - Byte stuffing (0xFF ↔ 0xFF 0x00)
//! - Restart markers (0xFFD0-0xFFD7) at restart interval boundaries
//!
//! The writer is adapted from
//! [jpeg-encoder](https://github.com/vstroebel/jpeg-encoder).

use super::huffman::HuffmanEncoder;
use super::marker::Marker;
use crate::error::{JstegError, Result};

/// Bit reader over the entropy-coded data following an SOS header.
///
/// The reader stops in front of any marker it meets. Restart markers are
/// consumed only through [`BitReader::restart`].
pub struct BitReader<'a> {
    data: &'a [u8],
    /// Position of the next unread byte.
    pos: usize,
    /// Byte currently being consumed.
    bits: u8,
    /// Bits of `bits` not yet consumed.
    num_bits: u8,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        BitReader {
            data,
            pos: 0,
            bits: 0,
            num_bits: 0,
        }
    }

    /// Byte position of the next unread byte.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Read the next byte with byte stuffing removed.
    fn next_byte(&mut self) -> Result<u8> {
        let byte = *self
            .data
            .get(self.pos)
            .ok_or_else(|| JstegError::format("short Huffman data"))?;
        if byte != 0xFF {
            self.pos += 1;
            return Ok(byte);
        }

        match self.data.get(self.pos + 1) {
            Some(0x00) => {
                self.pos += 2;
                Ok(0xFF)
            }
            Some(&code) => Err(JstegError::format(format!(
                "unexpected marker 0xFF{code:02X} in entropy-coded data"
            ))),
            None => Err(JstegError::format("short Huffman data")),
        }
    }

    /// Read one bit.
    #[inline]
    pub fn next_bit(&mut self) -> Result<u8> {
        if self.num_bits == 0 {
            self.bits = self.next_byte()?;
            self.num_bits = 8;
        }
        self.num_bits -= 1;
        Ok((self.bits >> self.num_bits) & 1)
    }

    /// Read `count` bits (at most 16) as an unsigned value.
    pub fn read_bits(&mut self, count: u8) -> Result<u32> {
        debug_assert!(count <= 16);
        let mut value = 0u32;
        for _ in 0..count {
            value = (value << 1) | self.next_bit()? as u32;
        }
        Ok(value)
    }

    /// Read and sign-extend a value of the given category.
    ///
    /// ITU T.81 Figure F.12: a field whose top bit is 0 encodes
    /// a negative value offset by `1 - 2^size`.
    pub fn receive_extend(&mut self, size: u8) -> Result<i32> {
        if size == 0 {
            return Ok(0);
        }

        let value = self.read_bits(size)? as i32;
        if value < 1 << (size - 1) {
            Ok(value + (-1 << size) + 1)
        } else {
            Ok(value)
        }
    }

    /// Consume the restart marker `RSTn` expected at an interval boundary.
    ///
    /// Remaining padding bits of the current byte are dropped.
    pub fn restart(&mut self, n: u8) -> Result<()> {
        self.num_bits = 0;
        self.bits = 0;

        let expected = Marker::RST(n).to_u8();
        match self.data.get(self.pos..self.pos + 2) {
            Some(&[0xFF, code]) if code == expected => {
                self.pos += 2;
                Ok(())
            }
            _ => Err(JstegError::format(format!(
                "bad RST marker, expected RST{n} at offset {}",
                self.pos
            ))),
        }
    }
}

/// Bit writer for entropy-coded data.
///
/// Handles:
/// - Bit-level writing to byte stream
/// - Byte stuffing (0xFF → 0xFF 0x00)
/// - Padding to byte boundary with 1 bits
pub struct BitWriter {
    data: Vec<u8>,
    /// Bit accumulator.
    bits: u32,
    /// Number of valid bits in accumulator (always < 8 between calls).
    num_bits: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::with_buffer(Vec::new())
    }

    /// Continue writing after the bytes already in `data` (e.g. the headers).
    pub fn with_buffer(data: Vec<u8>) -> Self {
        BitWriter {
            data,
            bits: 0,
            num_bits: 0,
        }
    }

    /// Write the low `count` bits of `value`, MSB first.
    #[inline]
    pub fn write_bits(&mut self, value: u32, count: u8) {
        debug_assert!(count <= 16);
        if count == 0 {
            return;
        }

        let mask = (1u32 << count) - 1;
        self.bits = (self.bits << count) | (value & mask);
        self.num_bits += count;

        while self.num_bits >= 8 {
            self.num_bits -= 8;
            let byte = (self.bits >> self.num_bits) as u8;
            self.write_byte(byte);
        }

        self.bits &= (1u32 << self.num_bits) - 1;
    }

    /// Write a Huffman-encoded symbol.
    #[inline]
    pub fn write_huffman(&mut self, symbol: u8, table: &HuffmanEncoder) -> Result<()> {
        let (code, len) = table
            .encode(symbol)
            .ok_or_else(|| JstegError::format(format!("symbol {symbol:#04x} not in Huffman table")))?;
        self.write_bits(code as u32, len);
        Ok(())
    }

    fn write_byte(&mut self, byte: u8) {
        self.data.push(byte);
        if byte == 0xFF {
            self.data.push(0x00);
        }
    }

    /// Pad to byte boundary with 1 bits.
    pub fn flush(&mut self) {
        if self.num_bits > 0 {
            let padding = 8 - self.num_bits;
            let value = (self.bits << padding) | ((1u32 << padding) - 1);
            self.write_byte(value as u8);
            self.num_bits = 0;
            self.bits = 0;
        }
    }

    /// Pad the current byte and emit the restart marker `RSTn`.
    pub fn restart(&mut self, n: u8) {
        self.flush();
        self.data.push(0xFF);
        self.data.push(Marker::RST(n).to_u8());
    }

    /// Append a marker without length, e.g. EOI, after padding.
    pub fn write_marker(&mut self, marker: Marker) {
        self.flush();
        self.data.push(0xFF);
        self.data.push(marker.to_u8());
    }

    /// Bytes written so far, not counting bits still pending.
    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    /// Get the written data, consuming the writer.
    pub fn into_bytes(mut self) -> Vec<u8> {
        self.flush();
        self.data
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_reader_basic() {
        let data = [0b10110100, 0b11001010];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.read_bits(4).unwrap(), 0b1011);
        assert_eq!(reader.read_bits(4).unwrap(), 0b0100);
        assert_eq!(reader.read_bits(8).unwrap(), 0b11001010);
        assert!(reader.next_bit().is_err());
    }

    #[test]
    fn test_bit_reader_stuffed_byte() {
        let data = [0xFF, 0x00, 0x12];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.read_bits(8).unwrap(), 0xFF);
        assert_eq!(reader.read_bits(8).unwrap(), 0x12);
        assert_eq!(reader.position(), 3);
    }

    #[test]
    fn test_bit_reader_stops_at_marker() {
        let data = [0xAB, 0xFF, 0xD9];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.read_bits(8).unwrap(), 0xAB);
        assert!(matches!(reader.next_bit(), Err(JstegError::Format(_))));
        // the marker is not consumed
        assert_eq!(reader.position(), 1);
    }

    #[test]
    fn test_receive_extend() {
        // bits: 1 | 0 | 01 | 11 | 000 ...
        let data = [0b10011100, 0b00000000];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.receive_extend(1).unwrap(), 1);
        assert_eq!(reader.receive_extend(1).unwrap(), -1);
        assert_eq!(reader.receive_extend(2).unwrap(), -2);
        assert_eq!(reader.receive_extend(2).unwrap(), 3);
        assert_eq!(reader.receive_extend(0).unwrap(), 0);
        // 000 → -7
        assert_eq!(reader.receive_extend(3).unwrap(), -7);
    }

    #[test]
    fn test_restart_marker_cycle() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b101, 3);
        writer.restart(0);
        writer.write_bits(0b0, 1);
        writer.restart(1);
        let data = writer.into_bytes();
        assert_eq!(data, vec![0b10111111, 0xFF, 0xD0, 0b01111111, 0xFF, 0xD1]);

        let mut reader = BitReader::new(&data);
        assert_eq!(reader.read_bits(3).unwrap(), 0b101);
        reader.restart(0).unwrap();
        assert_eq!(reader.next_bit().unwrap(), 0);
        assert!(matches!(reader.restart(2), Err(JstegError::Format(_))));
        reader.restart(1).unwrap();
    }

    #[test]
    fn test_bit_writer_byte_stuffing() {
        let mut writer = BitWriter::new();
        writer.write_bits(0xFF, 8);
        writer.write_bits(0x12, 8);
        assert_eq!(writer.into_bytes(), vec![0xFF, 0x00, 0x12]);
    }

    #[test]
    fn test_bit_writer_padding() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b10110, 5);
        assert_eq!(writer.into_bytes(), vec![0b10110111]);
    }

    #[test]
    fn test_bit_writer_masks_high_bits() {
        let mut writer = BitWriter::new();
        // negative magnitude fields are passed in two's complement
        writer.write_bits((-3i32) as u32, 4);
        writer.write_bits(0, 4);
        assert_eq!(writer.into_bytes(), vec![0b1101_0000]);
    }

    #[test]
    fn test_padding_to_ff_is_stuffed() {
        let mut writer = BitWriter::new();
        writer.write_bits(0b1111, 4);
        writer.restart(3);
        assert_eq!(writer.into_bytes(), vec![0xFF, 0x00, 0xFF, 0xD3]);
    }
}
