//! Deterministic test images, as separate R, G, B planes.

#![allow(dead_code)]

use rand::{rngs::StdRng, Rng, SeedableRng};

/// Three planes of `width * height` samples.
pub type Planes = [Vec<u8>; 3];

/// One color everywhere.
pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Planes {
    let n = (width * height) as usize;
    rgb.map(|c| vec![c; n])
}

/// Red ramps left to right, green top to bottom, blue along the diagonal.
pub fn gradient(width: u32, height: u32) -> Planes {
    let mut planes: Planes = Default::default();
    for y in 0..height {
        for x in 0..width {
            planes[0].push(((x * 255) / width.max(1)) as u8);
            planes[1].push(((y * 255) / height.max(1)) as u8);
            planes[2].push((((x + y) * 127) / (width + height).max(1)) as u8);
        }
    }
    planes
}

/// Alternating black and white cells.
pub fn checkerboard(width: u32, height: u32, cell: u32) -> Planes {
    let mut plane = Vec::with_capacity((width * height) as usize);
    for y in 0..height {
        for x in 0..width {
            let white = ((x / cell) + (y / cell)) % 2 == 0;
            plane.push(if white { 255 } else { 0 });
        }
    }
    [plane.clone(), plane.clone(), plane]
}

/// Uniform random samples from a seeded generator.
pub fn noise(width: u32, height: u32, seed: u64) -> Planes {
    let mut rng = StdRng::seed_from_u64(seed);
    let n = (width * height) as usize;
    let mut plane = || (0..n).map(|_| rng.gen::<u8>()).collect::<Vec<u8>>();
    [plane(), plane(), plane()]
}

/// Interleave planes into `R G B` triples.
pub fn interleave(planes: &Planes) -> Vec<u8> {
    let mut out = Vec::with_capacity(planes[0].len() * 3);
    for i in 0..planes[0].len() {
        out.extend_from_slice(&[planes[0][i], planes[1][i], planes[2][i]]);
    }
    out
}
