//! JPEG quantization tables, zigzag ordering and coefficient rounding.

use crate::error::{Error, Result};
use crate::jpeg::dct::AAN_SCALE;

/// Standard JPEG luminance quantization table (natural order).
const STD_LUMINANCE_TABLE: [u8; 64] = [
    16, 11, 10, 16, 24, 40, 51, 61, 12, 12, 14, 19, 26, 58, 60, 55, 14, 13, 16, 24, 40, 57, 69, 56,
    14, 17, 22, 29, 51, 87, 80, 62, 18, 22, 37, 56, 68, 109, 103, 77, 24, 35, 55, 64, 81, 104, 113,
    92, 49, 64, 78, 87, 103, 121, 120, 101, 72, 92, 95, 98, 112, 100, 103, 99,
];

/// Standard JPEG chrominance quantization table (natural order).
const STD_CHROMINANCE_TABLE: [u8; 64] = [
    17, 18, 24, 47, 99, 99, 99, 99, 18, 21, 26, 66, 99, 99, 99, 99, 24, 26, 56, 99, 99, 99, 99, 99,
    47, 66, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99,
    99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99, 99,
];

/// Zigzag scan order: entry `j` is the natural (row-major) index of the
/// `j`-th coefficient in the scan.
pub const ZIGZAG_TO_NATURAL: [usize; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27, 20,
    13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58, 59,
    52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

/// Inverse of [`ZIGZAG_TO_NATURAL`]: entry `k` is the scan position of natural index `k`.
pub const NATURAL_TO_ZIGZAG: [usize; 64] = invert(&ZIGZAG_TO_NATURAL);

const fn invert(perm: &[usize; 64]) -> [usize; 64] {
    let mut out = [0usize; 64];
    let mut i = 0;
    while i < 64 {
        out[perm[i]] = i;
        i += 1;
    }
    out
}

/// Rounding applied to scaled DCT coefficients.
///
/// Reference encoders disagree on ties; the choice changes output bits only
/// when a scaled coefficient lands exactly on `n + 0.5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rounding {
    /// `2.5 -> 3`, `-2.5 -> -3`.
    #[default]
    HalfAwayFromZero,
    /// `2.5 -> 2`, `3.5 -> 4` (the SSE conversion default).
    HalfToEven,
}

impl Rounding {
    #[inline]
    pub fn apply(self, value: f32) -> i32 {
        match self {
            Rounding::HalfAwayFromZero => value.round() as i32,
            Rounding::HalfToEven => value.round_ties_even() as i32,
        }
    }
}

/// One quantization table, 64 divisors in zigzag order (the DQT layout).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantTable {
    values: [u8; 64],
}

impl QuantTable {
    /// Use a table already laid out in zigzag order. Entries must be non-zero.
    pub fn from_zigzag(values: [u8; 64]) -> Result<Self> {
        if let Some(index) = values.iter().position(|&q| q == 0) {
            return Err(Error::InvalidQuantTable { index });
        }
        Ok(Self { values })
    }

    /// Use a table given in natural (row-major) order.
    pub fn from_natural(natural: [u8; 64]) -> Result<Self> {
        let mut values = [0u8; 64];
        for (j, v) in values.iter_mut().enumerate() {
            *v = natural[ZIGZAG_TO_NATURAL[j]];
        }
        Self::from_zigzag(values)
    }

    /// Scale a natural-order base table by a libjpeg quality factor.
    fn scaled(base: &[u8; 64], quality: u8) -> Self {
        let quality = quality.clamp(1, 100);
        let scale = if quality < 50 {
            5000 / quality as u32
        } else {
            200 - 2 * quality as u32
        };

        let mut values = [0u8; 64];
        for (j, v) in values.iter_mut().enumerate() {
            let base = base[ZIGZAG_TO_NATURAL[j]] as u32;
            *v = ((base * scale + 50) / 100).clamp(1, 255) as u8;
        }
        Self { values }
    }

    /// Divisors in zigzag order.
    pub fn zigzag(&self) -> &[u8; 64] {
        &self.values
    }

    /// Divisor for natural index `k`.
    #[inline]
    pub fn natural(&self, k: usize) -> u8 {
        self.values[NATURAL_TO_ZIGZAG[k]]
    }
}

/// Luma and chroma quantization tables for one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantTables {
    /// Luminance table.
    pub luma: QuantTable,
    /// Chrominance table.
    pub chroma: QuantTable,
}

impl QuantTables {
    /// Create quantization tables with the given quality (clamped to 1-100).
    pub fn with_quality(quality: u8) -> Self {
        Self {
            luma: QuantTable::scaled(&STD_LUMINANCE_TABLE, quality),
            chroma: QuantTable::scaled(&STD_CHROMINANCE_TABLE, quality),
        }
    }
}

impl Default for QuantTables {
    fn default() -> Self {
        Self::with_quality(75)
    }
}

/// Natural-order multipliers turning AAN DCT output into quantized units:
/// `1 / (q * 8 * AAN_SCALE[row] * AAN_SCALE[col])`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleTable {
    factors: [f32; 64],
}

impl ScaleTable {
    pub fn new(table: &QuantTable) -> Self {
        let mut factors = [0.0f32; 64];
        for row in 0..8 {
            for col in 0..8 {
                let k = row * 8 + col;
                let q = table.natural(k) as f32;
                factors[k] = 1.0 / (q * 8.0 * AAN_SCALE[row] * AAN_SCALE[col]);
            }
        }
        Self { factors }
    }

    pub fn factors(&self) -> &[f32; 64] {
        &self.factors
    }
}

/// Scale, round and reorder an AAN DCT block. Output is in zigzag order.
#[inline]
pub fn quantize_block(dct: &[f32; 64], scale: &ScaleTable, rounding: Rounding) -> [i32; 64] {
    let mut out = [0i32; 64];
    for k in 0..64 {
        out[NATURAL_TO_ZIGZAG[k]] = rounding.apply(dct[k] * scale.factors[k]);
    }
    out
}

/// Reorder a natural-order block into zigzag order.
pub fn zigzag_reorder<T: Copy + Default>(block: &[T; 64]) -> [T; 64] {
    let mut result = [T::default(); 64];
    for (j, r) in result.iter_mut().enumerate() {
        *r = block[ZIGZAG_TO_NATURAL[j]];
    }
    result
}

/// Reorder a zigzag-order block back into natural order.
pub fn zigzag_restore<T: Copy + Default>(zigzag: &[T; 64]) -> [T; 64] {
    let mut result = [T::default(); 64];
    for (j, &v) in zigzag.iter().enumerate() {
        result[ZIGZAG_TO_NATURAL[j]] = v;
    }
    result
}
