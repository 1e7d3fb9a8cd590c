//! # baseline-jpeg
//!
//! The compression core of a baseline sequential JPEG encoder.
//!
//! Given 8-bit RGB or gray sample planes, this crate produces the
//! entropy-coded segment of a baseline (SOF0, Huffman, 8-bit) scan:
//! color transform, optional 4:2:0 chroma subsampling, AAN forward DCT,
//! quantization, zigzag reordering, DC prediction with run-length/Huffman
//! AC coding, and byte-stuffed bit packing.
//!
//! ## Features
//!
//! - `simd` (default): runtime-selected SSE4.1 / AVX2 kernels for the color
//!   transform and the chroma average, bit-identical to the scalar path
//! - `parallel`: DCT and quantization across MCU rows with rayon
//! - `cli`: the `bjpeg` command-line encoder
//!
//! ## Example
//!
//! ```rust
//! use baseline_jpeg::color::{Plane, SourceImage};
//! use baseline_jpeg::jpeg::{encode_scan, HuffmanTables, QuantTables, ScanOptions};
//!
//! let (r, g, b) = (vec![255u8; 64], vec![0u8; 64], vec![0u8; 64]);
//! let image = SourceImage::rgb(
//!     Plane::packed(&r, 8, 8)?,
//!     Plane::packed(&g, 8, 8)?,
//!     Plane::packed(&b, 8, 8)?,
//! )?;
//! let segment = encode_scan(
//!     &image,
//!     &QuantTables::with_quality(85),
//!     HuffmanTables::standard(),
//!     &ScanOptions::default(),
//! )?;
//! assert!(!segment.is_empty());
//! # Ok::<(), baseline_jpeg::Error>(())
//! ```

pub mod bits;
pub mod color;
pub mod error;
pub mod jpeg;
pub mod simd;

pub use color::{deinterleave, PixelFormat, PlanarImage, Plane, SourceImage};
pub use error::{Error, Result};
pub use jpeg::{encode_rgb, encode_scan, encode_scan_into, ScanOptions, ScanStats, Subsampling};
