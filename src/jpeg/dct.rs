//! Forward 8x8 DCT using the Arai-Agui-Nakajima factorisation.
//!
//! The transform is separable: a 1-D butterfly over each row, then over each
//! column, in place. Outputs are DCT-II coefficients multiplied by
//! `8 * AAN_SCALE[u] * AAN_SCALE[v]`; that factor is folded into the
//! quantizer's reciprocal table so no extra pass is needed here.

/// Per-frequency AAN output scale: `1` for DC, `sqrt(2) * cos(k*PI/16)` otherwise.
pub const AAN_SCALE: [f32; 8] = [
    1.0,
    1.387_039_8,
    1.306_563,
    1.175_875_6,
    1.0,
    0.785_694_96,
    0.541_196_1,
    0.275_899_38,
];

const R2_2: f32 = 0.707_106_781; // cos(4*PI/16)
const C6_S: f32 = 0.382_683_433; // cos(6*PI/16)
const C2_M_C6: f32 = 0.541_196_100; // cos(2*PI/16) - cos(6*PI/16)
const C2_P_C6: f32 = 1.306_562_965; // cos(2*PI/16) + cos(6*PI/16)

/// One 8-point butterfly over the elements `base`, `base + step`, ..., `base + 7 * step`.
#[inline(always)]
fn fdct_1d(data: &mut [f32; 64], base: usize, step: usize) {
    let at = |k: usize| base + k * step;
    let d0 = data[at(0)];
    let d1 = data[at(1)];
    let d2 = data[at(2)];
    let d3 = data[at(3)];
    let d4 = data[at(4)];
    let d5 = data[at(5)];
    let d6 = data[at(6)];
    let d7 = data[at(7)];

    let tmp0 = d0 + d7;
    let tmp7 = d0 - d7;
    let tmp1 = d1 + d6;
    let tmp6 = d1 - d6;
    let tmp2 = d2 + d5;
    let tmp5 = d2 - d5;
    let tmp3 = d3 + d4;
    let tmp4 = d3 - d4;

    // Even part
    let tmp10 = tmp0 + tmp3;
    let tmp13 = tmp0 - tmp3;
    let tmp11 = tmp1 + tmp2;
    let tmp12 = tmp1 - tmp2;

    data[at(0)] = tmp10 + tmp11;
    data[at(4)] = tmp10 - tmp11;

    let z1 = (tmp12 + tmp13) * R2_2;
    data[at(2)] = tmp13 + z1;
    data[at(6)] = tmp13 - z1;

    // Odd part
    let tmp10 = tmp4 + tmp5;
    let tmp11 = tmp5 + tmp6;
    let tmp12 = tmp6 + tmp7;

    let z5 = (tmp10 - tmp12) * C6_S;
    let z2 = tmp10 * C2_M_C6 + z5;
    let z4 = tmp12 * C2_P_C6 + z5;
    let z3 = tmp11 * R2_2;

    let z11 = tmp7 + z3;
    let z13 = tmp7 - z3;

    data[at(5)] = z13 + z2;
    data[at(3)] = z13 - z2;
    data[at(1)] = z11 + z4;
    data[at(7)] = z11 - z4;
}

/// Forward DCT of a row-major 8x8 block, in place (rows first, then columns).
pub fn forward_dct(block: &mut [f32; 64]) {
    for row in 0..8 {
        fdct_1d(block, row * 8, 1);
    }
    for col in 0..8 {
        fdct_1d(block, col, 8);
    }
}

/// Convert AAN-scaled output into orthonormal DCT-II coefficients
/// `F(u,v) = C(u)C(v)/4 * sum f(x,y) cos((2x+1)u*PI/16) cos((2y+1)v*PI/16)`.
pub fn descale(block: &[f32; 64]) -> [f32; 64] {
    let mut out = [0.0f32; 64];
    for v in 0..8 {
        for u in 0..8 {
            out[v * 8 + u] = block[v * 8 + u] / (8.0 * AAN_SCALE[v] * AAN_SCALE[u]);
        }
    }
    out
}
