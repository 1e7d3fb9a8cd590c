//! Error types for the baseline-jpeg library.

use std::fmt;

use crate::jpeg::entropy::Component;

/// Result type alias for baseline-jpeg operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which of the four Huffman tables a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableClass {
    /// Luma DC table.
    DcLuma,
    /// Luma AC table.
    AcLuma,
    /// Chroma DC table.
    DcChroma,
    /// Chroma AC table.
    AcChroma,
}

impl fmt::Display for TableClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableClass::DcLuma => "DC luma",
            TableClass::AcLuma => "AC luma",
            TableClass::DcChroma => "DC chroma",
            TableClass::AcChroma => "AC chroma",
        };
        f.write_str(name)
    }
}

/// Errors that can occur while preparing or encoding a scan.
///
/// Every variant is raised at the encoder entry point, before any output
/// is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Invalid image dimensions (zero width or height).
    InvalidDimensions {
        /// Image width.
        width: u32,
        /// Image height.
        height: u32,
    },
    /// Row stride is smaller than the row length.
    InvalidStride {
        /// Bytes required for one row.
        min: usize,
        /// Stride that was supplied.
        stride: usize,
    },
    /// Pixel data length doesn't match expected size.
    InvalidDataLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes provided.
        actual: usize,
    },
    /// Color planes of one image disagree on their dimensions.
    PlaneMismatch,
    /// Invalid quality parameter (must be 1-100).
    InvalidQuality(u8),
    /// A quantization table entry is zero.
    InvalidQuantTable {
        /// Zigzag index of the offending entry.
        index: usize,
    },
    /// A Huffman table has no code for a symbol the encoder can emit.
    IncompleteHuffmanTable {
        /// Table missing the code.
        class: TableClass,
        /// Symbol without a code.
        symbol: u8,
    },
    /// Huffman BITS/HUFFVAL lists are inconsistent.
    MalformedHuffmanSpec(TableClass),
    /// A block was submitted for a component the scan layout does not code.
    ComponentNotInScan(Component),
    /// A block was submitted after the scan was flushed.
    ScanFinished,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDimensions { width, height } => {
                write!(f, "Invalid image dimensions: {}x{}", width, height)
            }
            Error::InvalidStride { min, stride } => {
                write!(f, "Invalid row stride {}: rows need at least {} bytes", stride, min)
            }
            Error::InvalidDataLength { expected, actual } => {
                write!(
                    f,
                    "Invalid pixel data length: expected {} bytes, got {}",
                    expected, actual
                )
            }
            Error::PlaneMismatch => write!(f, "Color planes have different dimensions"),
            Error::InvalidQuality(q) => {
                write!(f, "Invalid quality {}: must be 1-100", q)
            }
            Error::InvalidQuantTable { index } => {
                write!(f, "Quantization table entry {} is zero", index)
            }
            Error::IncompleteHuffmanTable { class, symbol } => {
                write!(f, "{} Huffman table has no code for symbol 0x{:02X}", class, symbol)
            }
            Error::MalformedHuffmanSpec(class) => {
                write!(f, "{} Huffman table BITS/HUFFVAL lists are malformed", class)
            }
            Error::ComponentNotInScan(c) => {
                write!(f, "Component {:?} is not part of this scan", c)
            }
            Error::ScanFinished => write!(f, "Scan already flushed"),
        }
    }
}

impl std::error::Error for Error {}
