//! Baseline sequential JPEG scan encoder.
//!
//! Turns 8-bit sample planes into one entropy-coded segment: the bytes that
//! follow an SOS header in a baseline (SOF0) file. Supports:
//! - 4:4:4 and 4:2:0 color, and single-component gray
//! - Quality-scaled or caller-supplied quantization tables
//! - Standard or caller-supplied Huffman tables
//!
//! Markers and headers are the caller's business; the segment ends byte
//! aligned with the final partial byte padded with 1-bits.

pub mod dct;
pub mod entropy;
pub mod huffman;
pub mod mcu;
pub mod quantize;
pub mod subsample;

use log::{debug, trace};

use crate::bits::BitWriter;
use crate::color::{deinterleave, PixelFormat, SourceImage};
use crate::error::{Error, Result};
use crate::simd::{self, Backend};

use entropy::{encode_block, Component, DcPredictors, HuffmanSink};
use mcu::{McuBlocks, McuLayout, McuTiles, McuTransform};
use quantize::ScaleTable;

pub use huffman::HuffmanTables;
pub use quantize::{QuantTables, Rounding};

/// Chroma subsampling options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Subsampling {
    /// 4:4:4, no subsampling.
    #[default]
    S444,
    /// 4:2:0, 2x2 chroma downsample.
    S420,
}

/// Scan encoding options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScanOptions {
    /// Subsampling scheme. Ignored for gray images.
    pub subsampling: Subsampling,
    /// Rounding of scaled DCT coefficients.
    pub rounding: Rounding,
    /// Kernel backend; `None` uses the one detected for this CPU.
    pub backend: Option<Backend>,
}

impl ScanOptions {
    /// Full-resolution chroma.
    pub fn fast() -> Self {
        Self::default()
    }

    /// 4:2:0 chroma, roughly half the chroma data.
    pub fn compact() -> Self {
        Self {
            subsampling: Subsampling::S420,
            ..Self::default()
        }
    }
}

/// Lifecycle of a [`ScanEncoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    NotStarted,
    Encoding,
    Flushed,
}

/// Counters collected while encoding a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// MCUs encoded.
    pub mcus: usize,
    /// 8x8 blocks encoded.
    pub blocks: usize,
    /// End-of-block symbols emitted.
    pub eob_count: usize,
    /// Sixteen-zero run symbols emitted.
    pub zrl_count: usize,
    /// `0x00` bytes inserted after `0xFF`.
    pub stuffed_bytes: usize,
    /// Segment length in bytes.
    pub bytes: usize,
}

/// Streams quantized blocks through the entropy coder into a bit writer.
///
/// Owns the DC predictors and the writer; tables are borrowed for the whole
/// scan and checked against the layout when the encoder is built.
pub struct ScanEncoder<'t> {
    writer: BitWriter,
    tables: &'t HuffmanTables,
    layout: McuLayout,
    predictors: DcPredictors,
    state: ScanState,
    stats: ScanStats,
}

impl<'t> ScanEncoder<'t> {
    pub fn new(tables: &'t HuffmanTables, layout: McuLayout) -> Result<Self> {
        Self::with_buffer(Vec::new(), tables, layout)
    }

    /// Encode into `buffer`, which is cleared first.
    ///
    /// Fails if `tables` lack a code the layout's components can emit.
    pub fn with_buffer(
        mut buffer: Vec<u8>,
        tables: &'t HuffmanTables,
        layout: McuLayout,
    ) -> Result<Self> {
        buffer.clear();
        tables.validate(layout != McuLayout::Gray)?;
        Ok(Self {
            writer: BitWriter::from_vec(buffer),
            tables,
            layout,
            predictors: DcPredictors::new(),
            state: ScanState::NotStarted,
            stats: ScanStats::default(),
        })
    }

    pub fn layout(&self) -> McuLayout {
        self.layout
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Entropy-code one zigzag-ordered block.
    pub fn encode_block(&mut self, component: Component, block: &[i32; 64]) -> Result<()> {
        if self.state == ScanState::Flushed {
            return Err(Error::ScanFinished);
        }
        if !self.layout.components().contains(&component) {
            return Err(Error::ComponentNotInScan(component));
        }
        self.state = ScanState::Encoding;

        let mut sink = HuffmanSink::new(&mut self.writer, self.tables);
        let summary = encode_block(block, component, &mut self.predictors, &mut sink);

        self.stats.blocks += 1;
        self.stats.zrl_count += summary.zero_runs as usize;
        self.stats.eob_count += summary.end_of_block as usize;
        Ok(())
    }

    /// Entropy-code the blocks of one MCU in layout order.
    pub fn encode_mcu(&mut self, blocks: &[[i32; 64]]) -> Result<()> {
        for (block, &component) in blocks.iter().zip(self.layout.components()) {
            self.encode_block(component, block)?;
        }
        self.stats.mcus += 1;
        Ok(())
    }

    /// Pad the final byte and close the scan. Calling it again is a no-op.
    pub fn finish(&mut self) -> Result<()> {
        self.writer.flush();
        self.state = ScanState::Flushed;
        self.stats.stuffed_bytes = self.writer.stuffed_bytes();
        self.stats.bytes = self.writer.len();
        Ok(())
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// Finish if needed and hand back the segment.
    pub fn into_bytes(self) -> Vec<u8> {
        self.writer.finish()
    }
}

/// Encode RGB pixel data (row-major, 3 bytes per pixel) with the standard
/// tables at `quality` and default options.
///
/// # Returns
/// The entropy-coded segment.
pub fn encode_rgb(data: &[u8], width: u32, height: u32, quality: u8) -> Result<Vec<u8>> {
    if quality == 0 || quality > 100 {
        return Err(Error::InvalidQuality(quality));
    }
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    let expected = width as usize * height as usize * 3;
    if data.len() != expected {
        return Err(Error::InvalidDataLength {
            expected,
            actual: data.len(),
        });
    }

    let planar = deinterleave(data, width, height, width as usize * 3, PixelFormat::Rgb24)?;
    encode_scan(
        &planar.source()?,
        &QuantTables::with_quality(quality),
        HuffmanTables::standard(),
        &ScanOptions::default(),
    )
}

/// Encode one scan of `image`.
pub fn encode_scan(
    image: &SourceImage<'_>,
    quant: &QuantTables,
    huffman: &HuffmanTables,
    options: &ScanOptions,
) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    encode_scan_into(&mut output, image, quant, huffman, options)?;
    Ok(output)
}

/// Encode one scan of `image` into a caller-provided buffer.
///
/// The `output` buffer is cleared and reused, allowing callers to avoid
/// repeated allocations across multiple encodes. It is left empty on error.
pub fn encode_scan_into(
    output: &mut Vec<u8>,
    image: &SourceImage<'_>,
    quant: &QuantTables,
    huffman: &HuffmanTables,
    options: &ScanOptions,
) -> Result<ScanStats> {
    output.clear();

    image.validate()?;

    let layout = match (image.is_gray(), options.subsampling) {
        (true, _) => McuLayout::Gray,
        (false, Subsampling::S444) => McuLayout::Color444,
        (false, Subsampling::S420) => McuLayout::Color420,
    };
    let transform = McuTransform {
        layout,
        luma: ScaleTable::new(&quant.luma),
        chroma: ScaleTable::new(&quant.chroma),
        rounding: options.rounding,
        backend: options.backend.unwrap_or_else(simd::backend).resolve(),
    };

    let (width, height) = (image.width(), image.height());
    output.reserve(width * height / 4);
    let mut encoder = ScanEncoder::with_buffer(std::mem::take(output), huffman, layout)?;

    debug!(
        "scan start: {}x{} {:?} backend={:?} rounding={:?}",
        width, height, layout, transform.backend, transform.rounding
    );


    #[cfg(feature = "parallel")]
    let result = encode_mcus_parallel(&mut encoder, image, &transform);
    #[cfg(not(feature = "parallel"))]
    let result = encode_mcus_sequential(&mut encoder, image, &transform);
    result?;

    encoder.finish()?;
    let stats = encoder.stats();
    *output = encoder.into_bytes();

    debug!(
        "scan done: {} MCUs, {} bytes ({} stuffed)",
        stats.mcus, stats.bytes, stats.stuffed_bytes
    );
    Ok(stats)
}

/// Transform and code MCUs one at a time in raster order.
#[cfg_attr(feature = "parallel", allow(dead_code))]
fn encode_mcus_sequential(
    encoder: &mut ScanEncoder<'_>,
    image: &SourceImage<'_>,
    transform: &McuTransform,
) -> Result<()> {
    let (cols, rows) = transform.layout.grid(image.width(), image.height());
    let mut tiles = McuTiles::default();
    let mut blocks = McuBlocks::default();

    for my in 0..rows {
        for mx in 0..cols {
            transform.run(image, mx, my, &mut tiles, &mut blocks);
            encoder.encode_mcu(blocks.as_slice())?;
        }
        trace!("MCU row {}/{} coded", my + 1, rows);
    }
    Ok(())
}

/// Transform every MCU row in parallel, then code serially in raster order.
#[cfg(feature = "parallel")]
fn encode_mcus_parallel(
    encoder: &mut ScanEncoder<'_>,
    image: &SourceImage<'_>,
    transform: &McuTransform,
) -> Result<()> {
    use rayon::prelude::*;

    let (_, rows) = transform.layout.grid(image.width(), image.height());
    let per_mcu = transform.layout.blocks_per_mcu();

    let coefficients: Vec<Vec<[i32; 64]>> = (0..rows)
        .into_par_iter()
        .map_init(McuTiles::default, |tiles, my| transform.run_row(image, my, tiles))
        .collect();

    for (my, row) in coefficients.iter().enumerate() {
        for blocks in row.chunks_exact(per_mcu) {
            encoder.encode_mcu(blocks)?;
        }
        trace!("MCU row {}/{} coded", my + 1, rows);
    }
    Ok(())
}
