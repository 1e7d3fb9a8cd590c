//! Scalar reference kernels.
//!
//! The accelerated backends must match these bit for bit, so each
//! expression is written in the association order the vector code uses.

use crate::color::coeff::*;

/// Convert one row of R, G, B samples (scalar fallback).
#[inline]
pub fn rgb_to_yuv_row(r: &[u8], g: &[u8], b: &[u8], y: &mut [f32], u: &mut [f32], v: &mut [f32]) {
    for i in 0..y.len() {
        let (rf, gf, bf) = (r[i] as f32, g[i] as f32, b[i] as f32);
        y[i] = (rf * YR + gf * YG) + (bf * YB + Y_SHIFT);
        u[i] = (rf * UR + gf * UG) + bf * UB;
        v[i] = (rf * VR + gf * VG) + bf * VB;
    }
}

/// Average 2x2 groups of a 16x16 tile (scalar fallback).
#[inline]
pub fn downsample_2x2(tile: &[f32; 256], out: &mut [f32; 64]) {
    for row in 0..8 {
        let top = &tile[row * 32..row * 32 + 16];
        let bottom = &tile[row * 32 + 16..row * 32 + 32];
        for col in 0..8 {
            let left = top[2 * col] + bottom[2 * col];
            let right = top[2 * col + 1] + bottom[2 * col + 1];
            out[row * 8 + col] = (left + right) * 0.25;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downsample_uniform() {
        let tile = [42.5f32; 256];
        let mut out = [0.0f32; 64];
        downsample_2x2(&tile, &mut out);
        assert!(out.iter().all(|&v| v == 42.5));
    }

    #[test]
    fn test_downsample_quadrant_average() {
        let mut tile = [0.0f32; 256];
        // Top-left 2x2 group: 1, 2 / 3, 6
        tile[0] = 1.0;
        tile[1] = 2.0;
        tile[16] = 3.0;
        tile[17] = 6.0;
        // Bottom-right 2x2 group
        tile[14 * 16 + 14] = 8.0;
        tile[15 * 16 + 15] = 8.0;
        let mut out = [0.0f32; 64];
        downsample_2x2(&tile, &mut out);
        assert_eq!(out[0], 3.0);
        assert_eq!(out[63], 4.0);
        assert_eq!(out[1], 0.0);
    }
}
