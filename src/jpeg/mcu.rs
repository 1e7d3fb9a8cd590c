//! MCU geometry and pixel fetching.
//!
//! An MCU is read into float tiles (one per component, `size * size`
//! samples, row stride `size`), then cut into the 8x8 blocks the layout
//! prescribes. Blocks that hang over the right or bottom edge take
//! replicated edge samples.

use crate::color::{gray_to_y_row, SourceImage};
use crate::jpeg::dct::forward_dct;
use crate::jpeg::entropy::Component;
use crate::jpeg::quantize::{quantize_block, Rounding, ScaleTable};
use crate::jpeg::subsample::downsample_420;
use crate::simd::{self, Backend};

/// Most blocks any layout puts in one MCU.
pub const MAX_BLOCKS: usize = 6;

/// Block order and sampling of one MCU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum McuLayout {
    /// One luma block, 8x8 pixels.
    Gray,
    /// `Y, Cb, Cr`, 8x8 pixels.
    Color444,
    /// `Y00, Y01, Y10, Y11, Cb, Cr`, 16x16 pixels.
    Color420,
}

impl McuLayout {
    /// Pixels per MCU side.
    #[inline]
    pub fn size(self) -> usize {
        match self {
            McuLayout::Gray | McuLayout::Color444 => 8,
            McuLayout::Color420 => 16,
        }
    }

    /// Components of each block, in the order they are coded.
    pub fn components(self) -> &'static [Component] {
        match self {
            McuLayout::Gray => &[Component::Y],
            McuLayout::Color444 => &[Component::Y, Component::Cb, Component::Cr],
            McuLayout::Color420 => &[
                Component::Y,
                Component::Y,
                Component::Y,
                Component::Y,
                Component::Cb,
                Component::Cr,
            ],
        }
    }

    /// Blocks coded per MCU.
    #[inline]
    pub fn blocks_per_mcu(self) -> usize {
        self.components().len()
    }

    /// MCU columns and rows covering a `width` x `height` image.
    pub fn grid(self, width: usize, height: usize) -> (usize, usize) {
        let size = self.size();
        (width.div_ceil(size), height.div_ceil(size))
    }
}

/// How an MCU's samples are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    /// The MCU lies fully inside the image; rows are sliced directly.
    Interior,
    /// The MCU crosses the right or bottom edge; samples are clamp-gathered.
    Edge,
}

impl FetchStrategy {
    /// Strategy for the `size` x `size` MCU whose top-left pixel is `(x0, y0)`.
    #[inline]
    pub fn select(x0: usize, y0: usize, size: usize, width: usize, height: usize) -> Self {
        if x0 + size <= width && y0 + size <= height {
            FetchStrategy::Interior
        } else {
            FetchStrategy::Edge
        }
    }
}

/// Float tiles for one MCU plus scratch rows for edge gathering.
#[derive(Clone)]
pub struct McuTiles {
    pub y: [f32; 256],
    pub cb: [f32; 256],
    pub cr: [f32; 256],
    scratch: [[u8; 16]; 3],
}

impl Default for McuTiles {
    fn default() -> Self {
        Self {
            y: [0.0; 256],
            cb: [0.0; 256],
            cr: [0.0; 256],
            scratch: [[0; 16]; 3],
        }
    }
}

impl McuTiles {
    /// Read the `size` x `size` MCU at `(x0, y0)` into the tiles.
    ///
    /// Gray images fill only `y`.
    pub fn fetch(
        &mut self,
        image: &SourceImage<'_>,
        x0: usize,
        y0: usize,
        size: usize,
        strategy: FetchStrategy,
        backend: Backend,
    ) {
        let height = image.height();
        let Self {
            y,
            cb,
            cr,
            scratch,
        } = self;

        for dy in 0..size {
            let sy = (y0 + dy).min(height - 1);
            let out = dy * size..(dy + 1) * size;

            match image {
                SourceImage::Rgb { r, g, b } => {
                    let (rr, gr, br): (&[u8], &[u8], &[u8]) = match strategy {
                        FetchStrategy::Interior => (
                            &r.row(sy)[x0..x0 + size],
                            &g.row(sy)[x0..x0 + size],
                            &b.row(sy)[x0..x0 + size],
                        ),
                        FetchStrategy::Edge => {
                            for dx in 0..size {
                                scratch[0][dx] = r.clamped(x0 + dx, sy);
                                scratch[1][dx] = g.clamped(x0 + dx, sy);
                                scratch[2][dx] = b.clamped(x0 + dx, sy);
                            }
                            (&scratch[0][..size], &scratch[1][..size], &scratch[2][..size])
                        }
                    };
                    simd::rgb_to_yuv_row(
                        backend,
                        rr,
                        gr,
                        br,
                        &mut y[out.clone()],
                        &mut cb[out.clone()],
                        &mut cr[out],
                    );
                }
                SourceImage::Gray(p) => {
                    let src: &[u8] = match strategy {
                        FetchStrategy::Interior => &p.row(sy)[x0..x0 + size],
                        FetchStrategy::Edge => {
                            for (dx, s) in scratch[0].iter_mut().take(size).enumerate() {
                                *s = p.clamped(x0 + dx, sy);
                            }
                            &scratch[0][..size]
                        }
                    };
                    gray_to_y_row(src, &mut y[out]);
                }
            }
        }
    }
}

/// Copy the 8x8 block at `offset` out of a tile with row stride `stride`.
#[inline]
fn block_at(tile: &[f32; 256], stride: usize, offset: usize) -> [f32; 64] {
    let mut block = [0.0f32; 64];
    for (row, dst) in block.chunks_exact_mut(8).enumerate() {
        let start = offset + row * stride;
        dst.copy_from_slice(&tile[start..start + 8]);
    }
    block
}

/// Quantized blocks of one MCU, in coding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct McuBlocks {
    pub blocks: [[i32; 64]; MAX_BLOCKS],
    pub len: usize,
}

impl Default for McuBlocks {
    fn default() -> Self {
        Self {
            blocks: [[0; 64]; MAX_BLOCKS],
            len: 0,
        }
    }
}

impl McuBlocks {
    pub fn as_slice(&self) -> &[[i32; 64]] {
        &self.blocks[..self.len]
    }
}

/// Everything needed to turn an MCU position into quantized blocks.
#[derive(Debug, Clone, Copy)]
pub struct McuTransform {
    pub layout: McuLayout,
    pub luma: ScaleTable,
    pub chroma: ScaleTable,
    pub rounding: Rounding,
    pub backend: Backend,
}

impl McuTransform {
    /// Fetch, transform and quantize the MCU at column `mx`, row `my`.
    pub fn run(
        &self,
        image: &SourceImage<'_>,
        mx: usize,
        my: usize,
        tiles: &mut McuTiles,
        out: &mut McuBlocks,
    ) {
        let size = self.layout.size();
        let (x0, y0) = (mx * size, my * size);
        let strategy = FetchStrategy::select(x0, y0, size, image.width(), image.height());
        tiles.fetch(image, x0, y0, size, strategy, self.backend);

        let mut sample_blocks = [[0.0f32; 64]; MAX_BLOCKS];
        let count = match self.layout {
            McuLayout::Gray => {
                sample_blocks[0] = block_at(&tiles.y, 8, 0);
                1
            }
            McuLayout::Color444 => {
                sample_blocks[0] = block_at(&tiles.y, 8, 0);
                sample_blocks[1] = block_at(&tiles.cb, 8, 0);
                sample_blocks[2] = block_at(&tiles.cr, 8, 0);
                3
            }
            McuLayout::Color420 => {
                for (i, offset) in [0, 8, 128, 136].into_iter().enumerate() {
                    sample_blocks[i] = block_at(&tiles.y, 16, offset);
                }
                sample_blocks[4] = downsample_420(self.backend, &tiles.cb);
                sample_blocks[5] = downsample_420(self.backend, &tiles.cr);
                6
            }
        };

        let components = self.layout.components();
        for i in 0..count {
            let block = &mut sample_blocks[i];
            forward_dct(block);
            let scale = if components[i].is_luma() {
                &self.luma
            } else {
                &self.chroma
            };
            out.blocks[i] = quantize_block(block, scale, self.rounding);
        }
        out.len = count;
    }

    /// Transform MCU row `my` into a flat block list, [`McuLayout::blocks_per_mcu`]
    /// blocks per MCU in coding order.
    pub fn run_row(
        &self,
        image: &SourceImage<'_>,
        my: usize,
        tiles: &mut McuTiles,
    ) -> Vec<[i32; 64]> {
        let (cols, _) = self.layout.grid(image.width(), image.height());
        let mut row = Vec::with_capacity(cols * self.layout.blocks_per_mcu());
        let mut blocks = McuBlocks::default();
        for mx in 0..cols {
            self.run(image, mx, my, tiles, &mut blocks);
            row.extend_from_slice(blocks.as_slice());
        }
        row
    }
}
