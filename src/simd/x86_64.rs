//! x86_64 kernels using SSE4.1 and AVX2.

use std::arch::x86_64::*;

use super::fallback;
use crate::color::coeff::*;

/// Convert a row of R, G, B samples using SSE4.1, 4 pixels per step.
///
/// # Safety
/// Caller must ensure SSE4.1 is available and that every slice holds
/// at least `y.len()` elements.
#[target_feature(enable = "sse4.1")]
pub unsafe fn rgb_to_yuv_row_sse41(
    r: &[u8],
    g: &[u8],
    b: &[u8],
    y: &mut [f32],
    u: &mut [f32],
    v: &mut [f32],
) {
    let n = y.len();
    let yr = _mm_set1_ps(YR);
    let yg = _mm_set1_ps(YG);
    let yb = _mm_set1_ps(YB);
    let yt = _mm_set1_ps(Y_SHIFT);
    let ur = _mm_set1_ps(UR);
    let ug = _mm_set1_ps(UG);
    let ub = _mm_set1_ps(UB);
    let vr = _mm_set1_ps(VR);
    let vg = _mm_set1_ps(VG);
    let vb = _mm_set1_ps(VB);

    let mut i = 0;
    while i + 4 <= n {
        let rv = load4_ps(r, i);
        let gv = load4_ps(g, i);
        let bv = load4_ps(b, i);

        let yv = _mm_add_ps(
            _mm_add_ps(_mm_mul_ps(rv, yr), _mm_mul_ps(gv, yg)),
            _mm_add_ps(_mm_mul_ps(bv, yb), yt),
        );
        let uv = _mm_add_ps(
            _mm_add_ps(_mm_mul_ps(rv, ur), _mm_mul_ps(gv, ug)),
            _mm_mul_ps(bv, ub),
        );
        let vv = _mm_add_ps(
            _mm_add_ps(_mm_mul_ps(rv, vr), _mm_mul_ps(gv, vg)),
            _mm_mul_ps(bv, vb),
        );

        _mm_storeu_ps(y.as_mut_ptr().add(i), yv);
        _mm_storeu_ps(u.as_mut_ptr().add(i), uv);
        _mm_storeu_ps(v.as_mut_ptr().add(i), vv);
        i += 4;
    }

    if i < n {
        fallback::rgb_to_yuv_row(
            &r[i..n],
            &g[i..n],
            &b[i..n],
            &mut y[i..n],
            &mut u[i..n],
            &mut v[i..n],
        );
    }
}

/// Widen 4 bytes starting at `i` to f32 lanes.
#[inline]
#[target_feature(enable = "sse4.1")]
unsafe fn load4_ps(src: &[u8], i: usize) -> __m128 {
    let word = i32::from_le_bytes([src[i], src[i + 1], src[i + 2], src[i + 3]]);
    _mm_cvtepi32_ps(_mm_cvtepu8_epi32(_mm_cvtsi32_si128(word)))
}

/// Convert a row of R, G, B samples using AVX2, 8 pixels per step.
///
/// # Safety
/// Caller must ensure AVX2 is available and that every slice holds
/// at least `y.len()` elements.
#[target_feature(enable = "avx2")]
pub unsafe fn rgb_to_yuv_row_avx2(
    r: &[u8],
    g: &[u8],
    b: &[u8],
    y: &mut [f32],
    u: &mut [f32],
    v: &mut [f32],
) {
    let n = y.len();
    let yr = _mm256_set1_ps(YR);
    let yg = _mm256_set1_ps(YG);
    let yb = _mm256_set1_ps(YB);
    let yt = _mm256_set1_ps(Y_SHIFT);
    let ur = _mm256_set1_ps(UR);
    let ug = _mm256_set1_ps(UG);
    let ub = _mm256_set1_ps(UB);
    let vr = _mm256_set1_ps(VR);
    let vg = _mm256_set1_ps(VG);
    let vb = _mm256_set1_ps(VB);

    let mut i = 0;
    while i + 8 <= n {
        let rv = load8_ps(r, i);
        let gv = load8_ps(g, i);
        let bv = load8_ps(b, i);

        let yv = _mm256_add_ps(
            _mm256_add_ps(_mm256_mul_ps(rv, yr), _mm256_mul_ps(gv, yg)),
            _mm256_add_ps(_mm256_mul_ps(bv, yb), yt),
        );
        let uv = _mm256_add_ps(
            _mm256_add_ps(_mm256_mul_ps(rv, ur), _mm256_mul_ps(gv, ug)),
            _mm256_mul_ps(bv, ub),
        );
        let vv = _mm256_add_ps(
            _mm256_add_ps(_mm256_mul_ps(rv, vr), _mm256_mul_ps(gv, vg)),
            _mm256_mul_ps(bv, vb),
        );

        _mm256_storeu_ps(y.as_mut_ptr().add(i), yv);
        _mm256_storeu_ps(u.as_mut_ptr().add(i), uv);
        _mm256_storeu_ps(v.as_mut_ptr().add(i), vv);
        i += 8;
    }

    if i < n {
        rgb_to_yuv_row_sse41(
            &r[i..n],
            &g[i..n],
            &b[i..n],
            &mut y[i..n],
            &mut u[i..n],
            &mut v[i..n],
        );
    }
}

/// Widen 8 bytes starting at `i` to f32 lanes.
#[inline]
#[target_feature(enable = "avx2")]
unsafe fn load8_ps(src: &[u8], i: usize) -> __m256 {
    let bytes = &src[i..i + 8];
    let lo = _mm_loadl_epi64(bytes.as_ptr() as *const __m128i);
    _mm256_cvtepi32_ps(_mm256_cvtepu8_epi32(lo))
}

/// Average 2x2 groups of a 16x16 tile using SSE4.1 horizontal adds.
///
/// # Safety
/// Caller must ensure SSE4.1 is available.
#[target_feature(enable = "sse4.1")]
pub unsafe fn downsample_2x2_sse41(tile: &[f32; 256], out: &mut [f32; 64]) {
    let quarter = _mm_set1_ps(0.25);
    let src = tile.as_ptr();
    let dst = out.as_mut_ptr();

    for row in 0..8 {
        let top = src.add(row * 32);
        let bottom = top.add(16);
        for half in 0..2 {
            let offset = half * 8;
            // Vertical pair sums, then adjacent columns via hadd.
            let s0 = _mm_add_ps(_mm_loadu_ps(top.add(offset)), _mm_loadu_ps(bottom.add(offset)));
            let s1 = _mm_add_ps(
                _mm_loadu_ps(top.add(offset + 4)),
                _mm_loadu_ps(bottom.add(offset + 4)),
            );
            _mm_storeu_ps(
                dst.add(row * 8 + half * 4),
                _mm_mul_ps(_mm_hadd_ps(s0, s1), quarter),
            );
        }
    }
}
