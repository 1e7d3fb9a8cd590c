//! Sample planes, pixel formats and the YCbCr transform coefficients.

use crate::error::{Error, Result};

/// Fixed BT.601 coefficients shared by every kernel backend.
pub(crate) mod coeff {
    pub const YR: f32 = 0.29900;
    pub const YG: f32 = 0.58700;
    pub const YB: f32 = 0.11400;
    pub const Y_SHIFT: f32 = -128.0;
    pub const UR: f32 = -0.16874;
    pub const UG: f32 = -0.33126;
    pub const UB: f32 = 0.50000;
    pub const VR: f32 = 0.50000;
    pub const VG: f32 = -0.41869;
    pub const VB: f32 = -0.08131;
}

/// Interleaved pixel layouts accepted by [`deinterleave`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Grayscale, 1 byte per pixel.
    Gray8,
    /// R, G, B.
    Rgb24,
    /// B, G, R.
    Bgr24,
    /// R, G, B, A. Alpha is dropped.
    Rgba32,
    /// B, G, R, A. Alpha is dropped.
    Bgra32,
}

impl PixelFormat {
    /// Returns the number of bytes per pixel for this format.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb24 | PixelFormat::Bgr24 => 3,
            PixelFormat::Rgba32 | PixelFormat::Bgra32 => 4,
        }
    }

    /// Byte offsets of the red, green and blue channels within a pixel.
    #[inline]
    const fn rgb_offsets(self) -> Option<[usize; 3]> {
        match self {
            PixelFormat::Gray8 => None,
            PixelFormat::Rgb24 | PixelFormat::Rgba32 => Some([0, 1, 2]),
            PixelFormat::Bgr24 | PixelFormat::Bgra32 => Some([2, 1, 0]),
        }
    }
}

/// Bytes spanned by `rows` rows of `row_bytes` starting `stride` apart.
fn required_len(stride: usize, rows: usize, row_bytes: usize, actual: usize) -> Result<usize> {
    stride
        .checked_mul(rows - 1)
        .and_then(|n| n.checked_add(row_bytes))
        .ok_or(Error::InvalidDataLength {
            expected: usize::MAX,
            actual,
        })
}

/// A borrowed 2-D grid of 8-bit samples with an explicit row stride.
#[derive(Debug, Clone, Copy)]
pub struct Plane<'a> {
    data: &'a [u8],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a> Plane<'a> {
    /// Wrap `data` as a `width` x `height` plane whose rows start `stride` bytes apart.
    pub fn new(data: &'a [u8], width: u32, height: u32, stride: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let (w, h) = (width as usize, height as usize);
        if stride < w {
            return Err(Error::InvalidStride { min: w, stride });
        }
        let expected = required_len(stride, h, w, data.len())?;
        if data.len() < expected {
            return Err(Error::InvalidDataLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width: w,
            height: h,
            stride,
        })
    }

    /// Tightly packed plane (`stride == width`).
    pub fn packed(data: &'a [u8], width: u32, height: u32) -> Result<Self> {
        Self::new(data, width, height, width as usize)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Row `y` (exactly `width` samples).
    #[inline]
    pub fn row(&self, y: usize) -> &'a [u8] {
        let start = y * self.stride;
        &self.data[start..start + self.width]
    }

    /// Sample at `(x, y)` with both coordinates clamped into the plane.
    #[inline]
    pub fn clamped(&self, x: usize, y: usize) -> u8 {
        let x = x.min(self.width - 1);
        let y = y.min(self.height - 1);
        self.data[y * self.stride + x]
    }

    fn same_shape(&self, other: &Plane<'_>) -> bool {
        self.width == other.width && self.height == other.height
    }
}

/// Input to the scan encoder.
#[derive(Debug, Clone, Copy)]
pub enum SourceImage<'a> {
    /// Three color planes of identical dimensions.
    Rgb {
        r: Plane<'a>,
        g: Plane<'a>,
        b: Plane<'a>,
    },
    /// A single luma plane.
    Gray(Plane<'a>),
}

impl<'a> SourceImage<'a> {
    /// Build an RGB source, checking that the planes agree on their size.
    pub fn rgb(r: Plane<'a>, g: Plane<'a>, b: Plane<'a>) -> Result<Self> {
        if !r.same_shape(&g) || !r.same_shape(&b) {
            return Err(Error::PlaneMismatch);
        }
        Ok(SourceImage::Rgb { r, g, b })
    }

    /// Re-check plane agreement for images built from the enum directly.
    pub fn validate(&self) -> Result<()> {
        match self {
            SourceImage::Rgb { r, g, b } if !r.same_shape(g) || !r.same_shape(b) => {
                Err(Error::PlaneMismatch)
            }
            _ => Ok(()),
        }
    }

    pub fn width(&self) -> usize {
        match self {
            SourceImage::Rgb { r, .. } => r.width,
            SourceImage::Gray(p) => p.width,
        }
    }

    pub fn height(&self) -> usize {
        match self {
            SourceImage::Rgb { r, .. } => r.height,
            SourceImage::Gray(p) => p.height,
        }
    }

    pub fn is_gray(&self) -> bool {
        matches!(self, SourceImage::Gray(_))
    }
}

/// Owned planar copy of an interleaved image.
#[derive(Debug, Clone)]
pub struct PlanarImage {
    width: u32,
    height: u32,
    planes: Vec<Vec<u8>>,
}

impl PlanarImage {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Borrow the planes as an encoder input.
    pub fn source(&self) -> Result<SourceImage<'_>> {
        let plane = |i: usize| Plane::packed(&self.planes[i], self.width, self.height);
        match self.planes.len() {
            1 => Ok(SourceImage::Gray(plane(0)?)),
            _ => SourceImage::rgb(plane(0)?, plane(1)?, plane(2)?),
        }
    }
}

/// Split interleaved pixels into separate R, G, B planes (or one gray plane).
///
/// `stride` is the distance in bytes between the starts of consecutive rows.
pub fn deinterleave(
    data: &[u8],
    width: u32,
    height: u32,
    stride: usize,
    format: PixelFormat,
) -> Result<PlanarImage> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }
    let (w, h) = (width as usize, height as usize);
    let bpp = format.bytes_per_pixel();
    let row_bytes = w * bpp;
    if stride < row_bytes {
        return Err(Error::InvalidStride {
            min: row_bytes,
            stride,
        });
    }
    let expected = required_len(stride, h, row_bytes, data.len())?;
    if data.len() < expected {
        return Err(Error::InvalidDataLength {
            expected,
            actual: data.len(),
        });
    }

    let planes = match format.rgb_offsets() {
        None => {
            let mut gray = Vec::with_capacity(w * h);
            for y in 0..h {
                gray.extend_from_slice(&data[y * stride..y * stride + w]);
            }
            vec![gray]
        }
        Some(offsets) => {
            let mut planes = vec![Vec::with_capacity(w * h); 3];
            for y in 0..h {
                let row = &data[y * stride..y * stride + row_bytes];
                for px in row.chunks_exact(bpp) {
                    for (plane, &off) in planes.iter_mut().zip(offsets.iter()) {
                        plane.push(px[off]);
                    }
                }
            }
            planes
        }
    };

    Ok(PlanarImage {
        width,
        height,
        planes,
    })
}

/// Level-shift one row of gray samples.
#[inline]
pub fn gray_to_y_row(src: &[u8], y: &mut [f32]) {
    for (dst, &s) in y.iter_mut().zip(src) {
        *dst = s as f32 - 128.0;
    }
}
