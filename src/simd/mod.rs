//! Runtime-selected kernels for the per-pixel stages of the encoder.
//!
//! This module provides accelerated implementations of:
//! - RGB to YCbCr row conversion
//! - 2x2 chroma averaging for 4:2:0
//!
//! Every backend evaluates the same floating-point expressions in the same
//! order, so all of them produce bit-identical output. The best backend is
//! probed once and cached; callers may also request a specific backend, which
//! silently degrades to scalar when the CPU lacks it.

use std::sync::LazyLock;

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
pub mod x86_64;

pub mod fallback;

// ============================================================================
// Cached Feature Detection
// ============================================================================

/// Kernel backend, ordered from least to most capable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Backend {
    /// Portable scalar code.
    Scalar,
    /// SSE4.1, 4 lanes.
    Sse41,
    /// AVX2, 8 lanes.
    Avx2,
}

impl Backend {
    /// All backends, least capable first.
    pub const ALL: [Backend; 3] = [Backend::Scalar, Backend::Sse41, Backend::Avx2];

    /// Whether this backend can run on the current CPU.
    pub fn is_available(self) -> bool {
        self <= *BACKEND
    }

    /// This backend if available, otherwise scalar.
    #[inline]
    pub fn resolve(self) -> Backend {
        if self.is_available() {
            self
        } else {
            Backend::Scalar
        }
    }
}

/// Detect the best available backend.
fn detect_backend() -> Backend {
    #[cfg(all(feature = "simd", target_arch = "x86_64"))]
    {
        if is_x86_feature_detected!("avx2") && is_x86_feature_detected!("sse4.1") {
            return Backend::Avx2;
        }
        if is_x86_feature_detected!("sse4.1") {
            return Backend::Sse41;
        }
    }
    Backend::Scalar
}

/// Backend detected once at first use.
static BACKEND: LazyLock<Backend> = LazyLock::new(|| {
    let backend = detect_backend();
    log::debug!("kernel backend: {:?}", backend);
    backend
});

/// The best backend for this process.
#[inline]
pub fn backend() -> Backend {
    *BACKEND
}

/// Backends usable on this CPU, least capable first.
pub fn available_backends() -> Vec<Backend> {
    Backend::ALL
        .into_iter()
        .filter(|b| b.is_available())
        .collect()
}

// ============================================================================
// Public API Functions
// ============================================================================

/// Convert a row of R, G, B samples into Y, U, V floats.
///
/// Converts `y.len()` pixels; every other slice must be at least that long.
#[inline]
pub fn rgb_to_yuv_row(
    backend: Backend,
    r: &[u8],
    g: &[u8],
    b: &[u8],
    y: &mut [f32],
    u: &mut [f32],
    v: &mut [f32],
) {
    let n = y.len();
    let (r, g, b) = (&r[..n], &g[..n], &b[..n]);
    let (u, v) = (&mut u[..n], &mut v[..n]);

    match backend.resolve() {
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        Backend::Avx2 => unsafe { x86_64::rgb_to_yuv_row_avx2(r, g, b, y, u, v) },
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        Backend::Sse41 => unsafe { x86_64::rgb_to_yuv_row_sse41(r, g, b, y, u, v) },
        _ => fallback::rgb_to_yuv_row(r, g, b, y, u, v),
    }
}

/// Average each 2x2 group of a 16x16 tile into an 8x8 block.
#[inline]
pub fn downsample_2x2(backend: Backend, tile: &[f32; 256], out: &mut [f32; 64]) {
    match backend.resolve() {
        // The 8-lane form gains nothing on an 8-wide output row.
        #[cfg(all(feature = "simd", target_arch = "x86_64"))]
        Backend::Avx2 | Backend::Sse41 => unsafe { x86_64::downsample_2x2_sse41(tile, out) },
        _ => fallback::downsample_2x2(tile, out),
    }
}
