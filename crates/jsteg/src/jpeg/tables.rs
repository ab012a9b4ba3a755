//! Quantization and Huffman table storage.
//!
//! The [`TableStore`] holds up to four quantization tables and up to four
//! Huffman tables per class. It is either parsed from the DQT/DHT segments of
//! a carrier or synthesized from the ITU T.81 Annex K tables for encoding.

/// Zigzag order to natural (row-major) order mapping.
pub const ZIGZAG_TO_NATURAL: [usize; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27, 20,
    13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58, 59,
    52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

/// Annex K.1 luminance quantization table, natural order.
const STD_LUMINANCE_QUANT: [u16; 64] = [
    16, 11, 10, 16, 24, 40, 51, 61, //
    12, 12, 14, 19, 26, 58, 60, 55, //
    14, 13, 16, 24, 40, 57, 69, 56, //
    14, 17, 22, 29, 51, 87, 80, 62, //
    18, 22, 37, 56, 68, 109, 103, 77, //
    24, 35, 55, 64, 81, 104, 113, 92, //
    49, 64, 78, 87, 103, 121, 120, 101, //
    72, 92, 95, 98, 112, 100, 103, 99,
];

/// Annex K.2 chrominance quantization table, natural order.
const STD_CHROMINANCE_QUANT: [u16; 64] = [
    17, 18, 24, 47, 99, 99, 99, 99, //
    18, 21, 26, 66, 99, 99, 99, 99, //
    24, 26, 56, 99, 99, 99, 99, 99, //
    47, 66, 99, 99, 99, 99, 99, 99, //
    99, 99, 99, 99, 99, 99, 99, 99, //
    99, 99, 99, 99, 99, 99, 99, 99, //
    99, 99, 99, 99, 99, 99, 99, 99, //
    99, 99, 99, 99, 99, 99, 99, 99,
];

const DC_LUMINANCE_BITS: [u8; 16] = [0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0];
const DC_CHROMINANCE_BITS: [u8; 16] = [0, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0];
const DC_VALUES: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

const AC_LUMINANCE_BITS: [u8; 16] = [0, 2, 1, 3, 3, 2, 4, 3, 5, 5, 4, 4, 0, 0, 1, 0x7d];
const AC_LUMINANCE_VALUES: [u8; 162] = [
    0x01, 0x02, 0x03, 0x00, 0x04, 0x11, 0x05, 0x12, 0x21, 0x31, 0x41, 0x06, 0x13, 0x51, 0x61, 0x07,
    0x22, 0x71, 0x14, 0x32, 0x81, 0x91, 0xa1, 0x08, 0x23, 0x42, 0xb1, 0xc1, 0x15, 0x52, 0xd1, 0xf0,
    0x24, 0x33, 0x62, 0x72, 0x82, 0x09, 0x0a, 0x16, 0x17, 0x18, 0x19, 0x1a, 0x25, 0x26, 0x27, 0x28,
    0x29, 0x2a, 0x34, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3a, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48, 0x49,
    0x4a, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5a, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68, 0x69,
    0x6a, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7a, 0x83, 0x84, 0x85, 0x86, 0x87, 0x88, 0x89,
    0x8a, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9a, 0xa2, 0xa3, 0xa4, 0xa5, 0xa6, 0xa7,
    0xa8, 0xa9, 0xaa, 0xb2, 0xb3, 0xb4, 0xb5, 0xb6, 0xb7, 0xb8, 0xb9, 0xba, 0xc2, 0xc3, 0xc4, 0xc5,
    0xc6, 0xc7, 0xc8, 0xc9, 0xca, 0xd2, 0xd3, 0xd4, 0xd5, 0xd6, 0xd7, 0xd8, 0xd9, 0xda, 0xe1, 0xe2,
    0xe3, 0xe4, 0xe5, 0xe6, 0xe7, 0xe8, 0xe9, 0xea, 0xf1, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7, 0xf8,
    0xf9, 0xfa,
];

const AC_CHROMINANCE_BITS: [u8; 16] = [0, 2, 1, 2, 4, 4, 3, 4, 7, 5, 4, 4, 0, 1, 2, 0x77];
const AC_CHROMINANCE_VALUES: [u8; 162] = [
    0x00, 0x01, 0x02, 0x03, 0x11, 0x04, 0x05, 0x21, 0x31, 0x06, 0x12, 0x41, 0x51, 0x07, 0x61, 0x71,
    0x13, 0x22, 0x32, 0x81, 0x08, 0x14, 0x42, 0x91, 0xa1, 0xb1, 0xc1, 0x09, 0x23, 0x33, 0x52, 0xf0,
    0x15, 0x62, 0x72, 0xd1, 0x0a, 0x16, 0x24, 0x34, 0xe1, 0x25, 0xf1, 0x17, 0x18, 0x19, 0x1a, 0x26,
    0x27, 0x28, 0x29, 0x2a, 0x35, 0x36, 0x37, 0x38, 0x39, 0x3a, 0x43, 0x44, 0x45, 0x46, 0x47, 0x48,
    0x49, 0x4a, 0x53, 0x54, 0x55, 0x56, 0x57, 0x58, 0x59, 0x5a, 0x63, 0x64, 0x65, 0x66, 0x67, 0x68,
    0x69, 0x6a, 0x73, 0x74, 0x75, 0x76, 0x77, 0x78, 0x79, 0x7a, 0x82, 0x83, 0x84, 0x85, 0x86, 0x87,
    0x88, 0x89, 0x8a, 0x92, 0x93, 0x94, 0x95, 0x96, 0x97, 0x98, 0x99, 0x9a, 0xa2, 0xa3, 0xa4, 0xa5,
    0xa6, 0xa7, 0xa8, 0xa9, 0xaa, 0xb2, 0xb3, 0xb4, 0xb5, 0xb6, 0xb7, 0xb8, 0xb9, 0xba, 0xc2, 0xc3,
    0xc4, 0xc5, 0xc6, 0xc7, 0xc8, 0xc9, 0xca, 0xd2, 0xd3, 0xd4, 0xd5, 0xd6, 0xd7, 0xd8, 0xd9, 0xda,
    0xe2, 0xe3, 0xe4, 0xe5, 0xe6, 0xe7, 0xe8, 0xe9, 0xea, 0xf2, 0xf3, 0xf4, 0xf5, 0xf6, 0xf7, 0xf8,
    0xf9, 0xfa,
];

/// A JPEG quantization table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizationTable {
    /// Precision: 0 = 8-bit, 1 = 16-bit.
    pub precision: u8,
    /// Divisors in zigzag order (as stored in JPEG).
    pub values: [u16; 64],
}

impl QuantizationTable {
    /// Build a table from natural-order values scaled by the IJG quality formula.
    pub fn scaled(natural: &[u16; 64], quality: u8) -> Self {
        let quality = quality.clamp(1, 100) as u32;
        let scale = if quality < 50 {
            5000 / quality
        } else {
            200 - 2 * quality
        };

        let mut values = [0u16; 64];
        for (zz, &nat) in ZIGZAG_TO_NATURAL.iter().enumerate() {
            let v = (natural[nat] as u32 * scale + 50) / 100;
            values[zz] = v.clamp(1, 255) as u16;
        }

        QuantizationTable {
            precision: 0,
            values,
        }
    }
}

/// Huffman table class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableClass {
    Dc = 0,
    Ac = 1,
}

/// Huffman table as carried by a DHT segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTable {
    /// Number of codes of each length (1-16 bits).
    pub code_lengths: [u8; 16],
    /// Symbol values in order of increasing code length.
    pub values: Vec<u8>,
}

impl HuffmanTable {
    fn new(code_lengths: [u8; 16], values: &[u8]) -> Self {
        HuffmanTable {
            code_lengths,
            values: values.to_vec(),
        }
    }

    pub fn dc_luminance() -> Self {
        Self::new(DC_LUMINANCE_BITS, &DC_VALUES)
    }

    pub fn dc_chrominance() -> Self {
        Self::new(DC_CHROMINANCE_BITS, &DC_VALUES)
    }

    pub fn ac_luminance() -> Self {
        Self::new(AC_LUMINANCE_BITS, &AC_LUMINANCE_VALUES)
    }

    pub fn ac_chrominance() -> Self {
        Self::new(AC_CHROMINANCE_BITS, &AC_CHROMINANCE_VALUES)
    }
}

/// All tables of one frame, indexed by selector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableStore {
    pub quant: [Option<QuantizationTable>; 4],
    pub dc: [Option<HuffmanTable>; 4],
    pub ac: [Option<HuffmanTable>; 4],
}

impl TableStore {
    /// Synthesize the encoder tables for the given quality.
    ///
    /// Selector 0 holds the luminance tables; selector 1 the chrominance
    /// tables when `color` is set.
    pub fn standard(quality: u8, color: bool) -> Self {
        let mut store = TableStore::default();
        store.quant[0] = Some(QuantizationTable::scaled(&STD_LUMINANCE_QUANT, quality));
        store.dc[0] = Some(HuffmanTable::dc_luminance());
        store.ac[0] = Some(HuffmanTable::ac_luminance());
        if color {
            store.quant[1] = Some(QuantizationTable::scaled(&STD_CHROMINANCE_QUANT, quality));
            store.dc[1] = Some(HuffmanTable::dc_chrominance());
            store.ac[1] = Some(HuffmanTable::ac_chrominance());
        }
        store
    }

    /// Huffman table of `class` at `selector`, if defined.
    pub fn huffman(&self, class: TableClass, selector: u8) -> Option<&HuffmanTable> {
        let tables = match class {
            TableClass::Dc => &self.dc,
            TableClass::Ac => &self.ac,
        };
        tables.get(selector as usize).and_then(Option::as_ref)
    }

    pub(crate) fn set_huffman(&mut self, class: TableClass, selector: u8, table: HuffmanTable) {
        match class {
            TableClass::Dc => self.dc[selector as usize] = Some(table),
            TableClass::Ac => self.ac[selector as usize] = Some(table),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zigzag_is_permutation() {
        let mut seen = [false; 64];
        for &n in ZIGZAG_TO_NATURAL.iter() {
            assert!(!seen[n]);
            seen[n] = true;
        }
        assert_eq!(ZIGZAG_TO_NATURAL[2], 8);
    }

    #[test]
    fn test_quality_50_keeps_annex_k() {
        let table = QuantizationTable::scaled(&STD_LUMINANCE_QUANT, 50);
        assert_eq!(table.values[0], 16);
        assert_eq!(table.values[1], 11);
        // zigzag index 2 is natural (1, 0)
        assert_eq!(table.values[2], 12);
        assert_eq!(table.values[63], 99);
    }

    #[test]
    fn test_quality_extremes() {
        let best = QuantizationTable::scaled(&STD_LUMINANCE_QUANT, 100);
        assert!(best.values.iter().all(|&v| v == 1));

        let worst = QuantizationTable::scaled(&STD_LUMINANCE_QUANT, 0);
        assert!(worst.values.iter().all(|&v| v <= 255 && v >= 1));
        assert_eq!(worst.values[0], 255);
    }

    #[test]
    fn test_standard_huffman_sizes() {
        for table in [
            HuffmanTable::dc_luminance(),
            HuffmanTable::dc_chrominance(),
            HuffmanTable::ac_luminance(),
            HuffmanTable::ac_chrominance(),
        ] {
            let total: usize = table.code_lengths.iter().map(|&n| n as usize).sum();
            assert_eq!(total, table.values.len());
        }
    }

    #[test]
    fn test_standard_store() {
        let gray = TableStore::standard(75, false);
        assert!(gray.quant[0].is_some());
        assert!(gray.quant[1].is_none());
        assert!(gray.huffman(TableClass::Ac, 1).is_none());

        let color = TableStore::standard(75, true);
        assert!(color.huffman(TableClass::Dc, 1).is_some());
        assert!(color.huffman(TableClass::Ac, 1).is_some());
        assert!(color.huffman(TableClass::Ac, 7).is_none());
    }
}
