//! 4:2:0 chroma subsampling.

use crate::simd::{self, Backend};

/// Box-average a 16x16 chroma tile (row stride 16) down to one 8x8 block.
#[inline]
pub fn downsample_420(backend: Backend, tile: &[f32; 256]) -> [f32; 64] {
    let mut out = [0.0f32; 64];
    simd::downsample_2x2(backend, tile, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_tile() -> [f32; 256] {
        let mut tile = [0.0f32; 256];
        for (i, v) in tile.iter_mut().enumerate() {
            let (x, y) = (i % 16, i / 16);
            *v = (x as f32 * 3.5) - (y as f32 * 1.25) + 0.1;
        }
        tile
    }

    #[test]
    fn test_downsample_matches_definition() {
        let tile = gradient_tile();
        let out = downsample_420(Backend::Scalar, &tile);
        for y in 0..8 {
            for x in 0..8 {
                let t = |r: usize, c: usize| tile[r * 16 + c];
                let expected = ((t(2 * y, 2 * x) + t(2 * y + 1, 2 * x))
                    + (t(2 * y, 2 * x + 1) + t(2 * y + 1, 2 * x + 1)))
                    * 0.25;
                assert_eq!(out[y * 8 + x], expected, "({x}, {y})");
            }
        }
    }

    #[test]
    fn test_every_backend_matches_scalar() {
        let tile = gradient_tile();
        let expected = downsample_420(Backend::Scalar, &tile);
        for backend in simd::available_backends() {
            assert_eq!(downsample_420(backend, &tile), expected, "{backend:?}");
        }
    }
}
