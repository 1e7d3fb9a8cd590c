//! JPEG Huffman code tables.
//!
//! Tables are described the way a DHT segment carries them: `BITS` (number of
//! codes of each length 1-16) followed by `HUFFVAL` (symbols in code order).
//! Canonical codes are assigned per ITU T.81 Annex C.

use std::sync::LazyLock;

use crate::error::{Error, Result, TableClass};

/// Standard DC luminance Huffman table (number of codes per bit length).
const DC_LUM_BITS: [u8; 16] = [0, 1, 5, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0, 0, 0];

/// Standard DC luminance Huffman values.
const DC_LUM_VALS: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

/// Standard DC chrominance Huffman table.
const DC_CHROM_BITS: [u8; 16] = [0, 3, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0, 0, 0, 0];

/// Standard DC chrominance Huffman values.
const DC_CHROM_VALS: [u8; 12] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11];

/// Standard AC luminance Huffman table.
const AC_LUM_BITS: [u8; 16] = [0, 2, 1, 3, 3, 2, 4, 3, 5, 5, 4, 4, 0, 0, 1, 125];

/// Standard AC luminance Huffman values.
const AC_LUM_VALS: [u8; 162] = [
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

/// Standard AC chrominance Huffman table.
const AC_CHROM_BITS: [u8; 16] = [0, 2, 1, 2, 4, 4, 3, 4, 7, 5, 4, 4, 0, 1, 2, 119];

/// Standard AC chrominance Huffman values.
const AC_CHROM_VALS: [u8; 162] = [
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

/// End-of-block AC symbol.
pub const EOB: u8 = 0x00;
/// Sixteen-zero run AC symbol.
pub const ZRL: u8 = 0xF0;

/// Largest DC magnitude category for 8-bit samples.
pub const MAX_DC_CATEGORY: u8 = 11;
/// Largest AC magnitude category for 8-bit samples.
pub const MAX_AC_CATEGORY: u8 = 10;

/// Huffman code: (code, length in bits). A length of 0 means "no code".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HuffCode {
    pub code: u16,
    pub length: u8,
}

/// One Huffman table: symbol to code lookup plus the DHT lists it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTable {
    codes: [HuffCode; 256],
    bits: [u8; 16],
    vals: Vec<u8>,
}

impl HuffmanTable {
    /// Build a table from DHT-style `BITS` / `HUFFVAL` lists.
    ///
    /// Rejects lists whose counts disagree, repeated symbols, and code sets
    /// that overflow their length or use an all-ones code word.
    pub fn from_spec(bits: [u8; 16], vals: &[u8], class: TableClass) -> Result<Self> {
        let total: usize = bits.iter().map(|&n| n as usize).sum();
        if total != vals.len() || total > 256 {
            return Err(Error::MalformedHuffmanSpec(class));
        }

        let mut seen = [false; 256];
        for &v in vals {
            if std::mem::replace(&mut seen[v as usize], true) {
                return Err(Error::MalformedHuffmanSpec(class));
            }
        }

        let mut code = 0u32;
        for (i, &count) in bits.iter().enumerate() {
            let length = i + 1;
            code += count as u32;
            // After this length, `code` is one past the last assigned code word.
            if count > 0 && code >= (1u32 << length) {
                return Err(Error::MalformedHuffmanSpec(class));
            }
            code <<= 1;
        }

        Ok(Self::build(bits, vals))
    }

    /// Assign canonical codes without checking the lists.
    fn build(bits: [u8; 16], vals: &[u8]) -> Self {
        let mut codes = [HuffCode::default(); 256];
        let mut code = 0u16;
        let mut val_idx = 0;

        for (length, &count) in bits.iter().enumerate() {
            for _ in 0..count {
                let symbol = vals[val_idx] as usize;
                codes[symbol] = HuffCode {
                    code,
                    length: (length + 1) as u8,
                };
                val_idx += 1;
                code = code.wrapping_add(1);
            }
            code = code.wrapping_shl(1);
        }

        Self {
            codes,
            bits,
            vals: vals.to_vec(),
        }
    }

    /// Code for `symbol` (length 0 if the table has none).
    #[inline]
    pub fn code(&self, symbol: u8) -> HuffCode {
        self.codes[symbol as usize]
    }

    #[inline]
    pub fn has_code(&self, symbol: u8) -> bool {
        self.codes[symbol as usize].length > 0
    }

    /// Codes per length, as written in DHT.
    pub fn bits(&self) -> &[u8; 16] {
        &self.bits
    }

    /// Symbols in code order, as written in DHT.
    pub fn vals(&self) -> &[u8] {
        &self.vals
    }

    /// Check that every symbol the encoder can emit for this class has a code.
    pub fn check_complete(&self, class: TableClass) -> Result<()> {
        let missing = match class {
            TableClass::DcLuma | TableClass::DcChroma => {
                (0..=MAX_DC_CATEGORY).find(|&s| !self.has_code(s))
            }
            TableClass::AcLuma | TableClass::AcChroma => [EOB, ZRL]
                .into_iter()
                .chain((0..16u8).flat_map(|run| {
                    (1..=MAX_AC_CATEGORY).map(move |size| (run << 4) | size)
                }))
                .find(|&s| !self.has_code(s)),
        };

        match missing {
            Some(symbol) => Err(Error::IncompleteHuffmanTable { class, symbol }),
            None => Ok(()),
        }
    }
}

/// The four tables a baseline scan draws from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTables {
    pub dc_luma: HuffmanTable,
    pub ac_luma: HuffmanTable,
    pub dc_chroma: HuffmanTable,
    pub ac_chroma: HuffmanTable,
}

static STANDARD: LazyLock<HuffmanTables> = LazyLock::new(|| HuffmanTables {
    dc_luma: HuffmanTable::build(DC_LUM_BITS, &DC_LUM_VALS),
    ac_luma: HuffmanTable::build(AC_LUM_BITS, &AC_LUM_VALS),
    dc_chroma: HuffmanTable::build(DC_CHROM_BITS, &DC_CHROM_VALS),
    ac_chroma: HuffmanTable::build(AC_CHROM_BITS, &AC_CHROM_VALS),
});

impl HuffmanTables {
    /// The ITU T.81 Annex K example tables, built once per process.
    pub fn standard() -> &'static HuffmanTables {
        &STANDARD
    }

    /// Validate completeness. Chroma tables are only checked for color scans.
    pub fn validate(&self, color: bool) -> Result<()> {
        self.dc_luma.check_complete(TableClass::DcLuma)?;
        self.ac_luma.check_complete(TableClass::AcLuma)?;
        if color {
            self.dc_chroma.check_complete(TableClass::DcChroma)?;
            self.ac_chroma.check_complete(TableClass::AcChroma)?;
        }
        Ok(())
    }
}

impl Default for HuffmanTables {
    fn default() -> Self {
        Self::standard().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_huffman_tables() {
        let tables = HuffmanTables::standard();

        // DC category 0 in luminance is the 2-bit code 00
        assert_eq!(tables.dc_luma.code(0), HuffCode { code: 0b00, length: 2 });
        // Categories 1-5 share length 3
        assert_eq!(tables.dc_luma.code(1), HuffCode { code: 0b010, length: 3 });
        assert_eq!(tables.dc_luma.code(11), HuffCode { code: 0x1FE, length: 9 });

        // EOB in luminance AC is 1010
        assert_eq!(tables.ac_luma.code(EOB), HuffCode { code: 0b1010, length: 4 });
        // ZRL is 11 bits
        assert_eq!(tables.ac_luma.code(ZRL), HuffCode { code: 0x7F9, length: 11 });

        // Chrominance EOB is the 2-bit code 00
        assert_eq!(tables.ac_chroma.code(EOB), HuffCode { code: 0b00, length: 2 });
    }

    #[test]
    fn test_standard_tables_are_complete() {
        assert!(HuffmanTables::standard().validate(true).is_ok());
    }

    #[test]
    fn test_standard_tables_pass_spec_checks() {
        let t = HuffmanTables::standard();
        for (table, class) in [
            (&t.dc_luma, TableClass::DcLuma),
            (&t.ac_luma, TableClass::AcLuma),
            (&t.dc_chroma, TableClass::DcChroma),
            (&t.ac_chroma, TableClass::AcChroma),
        ] {
            let rebuilt = HuffmanTable::from_spec(*table.bits(), table.vals(), class).unwrap();
            assert_eq!(&rebuilt, table);
        }
    }

    #[test]
    fn test_codes_are_prefix_free() {
        let table = &HuffmanTables::standard().ac_luma;
        let codes: Vec<HuffCode> = table.vals().iter().map(|&s| table.code(s)).collect();
        for (i, a) in codes.iter().enumerate() {
            for b in codes.iter().skip(i + 1) {
                let (short, long) = if a.length <= b.length { (a, b) } else { (b, a) };
                let prefix = long.code >> (long.length - short.length);
                assert!(
                    prefix != short.code,
                    "{short:?} is a prefix of {long:?}"
                );
            }
        }
    }

    #[test]
    fn test_from_spec_rejects_count_mismatch() {
        let mut bits = [0u8; 16];
        bits[1] = 3;
        assert_eq!(
            HuffmanTable::from_spec(bits, &[0, 1], TableClass::DcLuma),
            Err(Error::MalformedHuffmanSpec(TableClass::DcLuma))
        );
    }

    #[test]
    fn test_from_spec_rejects_duplicate_symbol() {
        let mut bits = [0u8; 16];
        bits[1] = 2;
        assert_eq!(
            HuffmanTable::from_spec(bits, &[4, 4], TableClass::AcChroma),
            Err(Error::MalformedHuffmanSpec(TableClass::AcChroma))
        );
    }

    #[test]
    fn test_from_spec_rejects_all_ones_code() {
        // Two 1-bit codes would need the code word "1"
        let mut bits = [0u8; 16];
        bits[0] = 2;
        assert!(HuffmanTable::from_spec(bits, &[0, 1], TableClass::DcLuma).is_err());

        // Three 2-bit codes are fine (00, 01, 10)
        let mut bits = [0u8; 16];
        bits[1] = 3;
        assert!(HuffmanTable::from_spec(bits, &[0, 1, 2], TableClass::DcLuma).is_ok());
    }

    #[test]
    fn test_incomplete_dc_table_reports_first_missing() {
        let mut bits = [0u8; 16];
        bits[3] = 11;
        let vals: Vec<u8> = (0..11).collect();
        let table = HuffmanTable::from_spec(bits, &vals, TableClass::DcChroma).unwrap();
        assert_eq!(
            table.check_complete(TableClass::DcChroma),
            Err(Error::IncompleteHuffmanTable {
                class: TableClass::DcChroma,
                symbol: 11
            })
        );
    }

    #[test]
    fn test_incomplete_ac_table_rejected() {
        let t = HuffmanTables::standard();
        // Drop ZRL from the luma AC list by swapping it for an unused symbol.
        let vals: Vec<u8> = t
            .ac_luma
            .vals()
            .iter()
            .map(|&s| if s == ZRL { 0xFB } else { s })
            .collect();
        let table = HuffmanTable::from_spec(*t.ac_luma.bits(), &vals, TableClass::AcLuma).unwrap();
        assert_eq!(
            table.check_complete(TableClass::AcLuma),
            Err(Error::IncompleteHuffmanTable {
                class: TableClass::AcLuma,
                symbol: ZRL
            })
        );
    }

    #[test]
    fn test_gray_scan_skips_chroma_tables() {
        let mut tables = HuffmanTables::default();
        tables.ac_chroma = HuffmanTable::from_spec([0; 16], &[], TableClass::AcChroma).unwrap();
        assert!(tables.validate(false).is_ok());
        assert!(tables.validate(true).is_err());
    }
}
