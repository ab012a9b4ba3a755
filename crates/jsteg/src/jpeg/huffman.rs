//! Canonical Huffman codes for JPEG entropy coding.
//!
//! Both directions are built from the same [`HuffmanTable`] definition,
//! following the code generation procedure of ITU T.81 Annex C.
//!
//! Adapted from:
//! - [jpeg-decoder](https://github.com/image-rs/jpeg-decoder) - decoding
//! - [jpeg-encoder](https://github.com/vstroebel/jpeg-encoder) - encoding

use super::bitio::BitReader;
use super::tables::HuffmanTable;
use crate::error::{JstegError, Result};

/// Derive (code length, code) pairs from a DHT table.
///
/// Implements ITU T.81 Figure C.1 and C.2.
fn derive_huffman_codes(table: &HuffmanTable) -> Result<(Vec<u8>, Vec<u16>)> {
    let total: usize = table.code_lengths.iter().map(|&n| n as usize).sum();
    if total > 256 {
        return Err(JstegError::format("Huffman table has more than 256 symbols"));
    }
    if total != table.values.len() {
        return Err(JstegError::format("Huffman table symbol count mismatch"));
    }

    let mut huffsize = Vec::with_capacity(total);
    for (len, &count) in table.code_lengths.iter().enumerate() {
        for _ in 0..count {
            huffsize.push((len + 1) as u8);
        }
    }

    let mut huffcode = Vec::with_capacity(total);
    let mut code: u32 = 0;
    let mut si = huffsize.first().copied().unwrap_or(0);

    for &size in &huffsize {
        while si < size {
            code <<= 1;
            si += 1;
        }
        if code >= (1u32 << size) {
            return Err(JstegError::format("bad Huffman code"));
        }
        huffcode.push(code as u16);
        code += 1;
    }

    Ok((huffsize, huffcode))
}

/// Symbol to code lookup for the encode pass.
#[derive(Debug, Clone)]
pub struct HuffmanEncoder {
    /// symbol → (code, code_length), None if the symbol is not in the table.
    encode_map: [Option<(u16, u8)>; 256],
}

impl HuffmanEncoder {
    pub fn from_table(table: &HuffmanTable) -> Result<Self> {
        let (code_sizes, codes) = derive_huffman_codes(table)?;

        let mut encode_map = [None; 256];
        for ((&code, &len), &symbol) in codes.iter().zip(code_sizes.iter()).zip(&table.values) {
            encode_map[symbol as usize] = Some((code, len));
        }

        Ok(HuffmanEncoder { encode_map })
    }

    /// Code and length for a symbol.
    #[inline]
    pub fn encode(&self, symbol: u8) -> Option<(u16, u8)> {
        self.encode_map[symbol as usize]
    }
}

/// Canonical decoder (ITU T.81 Figure F.16).
///
/// Codes are matched one bit at a time so decoding never reads past the last
/// symbol of an entropy-coded segment.
#[derive(Debug, Clone)]
pub struct HuffmanDecoder {
    /// Smallest code of each length, indexed by length.
    mincode: [i32; 17],
    /// Largest code of each length, -1 when no code has that length.
    maxcode: [i32; 17],
    /// Index into `values` of the first symbol of each length.
    valptr: [usize; 17],
    values: Vec<u8>,
}

impl HuffmanDecoder {
    pub fn from_table(table: &HuffmanTable) -> Result<Self> {
        let (_, codes) = derive_huffman_codes(table)?;

        let mut decoder = HuffmanDecoder {
            mincode: [0; 17],
            maxcode: [-1; 17],
            valptr: [0; 17],
            values: table.values.clone(),
        };

        let mut k = 0;
        for len in 1..=16 {
            let count = table.code_lengths[len - 1] as usize;
            if count == 0 {
                continue;
            }
            decoder.valptr[len] = k;
            decoder.mincode[len] = codes[k] as i32;
            k += count;
            decoder.maxcode[len] = codes[k - 1] as i32;
        }

        Ok(decoder)
    }

    /// Decode one symbol from the reader.
    pub fn decode(&self, reader: &mut BitReader<'_>) -> Result<u8> {
        let mut code: i32 = 0;
        for len in 1..=16 {
            code = (code << 1) | reader.next_bit()? as i32;
            if code <= self.maxcode[len] {
                let index = self.valptr[len] + (code - self.mincode[len]) as usize;
                return Ok(self.values[index]);
            }
        }
        Err(JstegError::format("bad Huffman code"))
    }
}
