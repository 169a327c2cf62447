// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{BLOCK_DIM, BLOCK_SIZE};

/// `cos(pi/8) * sqrt(2) - 1` in 16.16 fixed point.
pub const COSPI8_SQRT2_MINUS1: i64 = 20091;
/// `sin(pi/8) * sqrt(2)` in 16.16 fixed point.
pub const SINPI8_SQRT2: i64 = 35468;

#[inline(always)]
fn mul_sin(x: i64) -> i64 {
    (x * SINPI8_SQRT2) >> 16
}

#[inline(always)]
fn mul_cos(x: i64) -> i64 {
    x + ((x * COSPI8_SQRT2_MINUS1) >> 16)
}

/// One 4-point butterfly over `v[0], v[1], v[2], v[3]`.
#[inline(always)]
fn idct1d(v: [i64; 4]) -> [i64; 4] {
    let a = v[0] + v[2];
    let b = v[0] - v[2];
    let c = mul_sin(v[1]) - mul_cos(v[3]);
    let d = mul_cos(v[1]) + mul_sin(v[3]);
    [a + d, b + c, b - c, a - d]
}

/// Inverse DCT of a dequantized 4x4 block, bit-exact with the VP8 reference
/// decoder. The output is the residual to add to the prediction.
///
/// ```
/// # use vp8_transforms::idct4x4;
/// let mut block = [0; 16];
/// block[0] = 100;
/// idct4x4(&mut block);
/// assert_eq!(block, [13; 16]);
/// ```
pub fn idct4x4(block: &mut [i32; BLOCK_SIZE]) {
    let mut tmp = [0i64; BLOCK_SIZE];
    for x in 0..BLOCK_DIM {
        let column = idct1d([
            block[x] as i64,
            block[BLOCK_DIM + x] as i64,
            block[2 * BLOCK_DIM + x] as i64,
            block[3 * BLOCK_DIM + x] as i64,
        ]);
        for (y, value) in column.into_iter().enumerate() {
            tmp[y * BLOCK_DIM + x] = value;
        }
    }
    for y in 0..BLOCK_DIM {
        let row = &tmp[y * BLOCK_DIM..(y + 1) * BLOCK_DIM];
        let row = idct1d([row[0], row[1], row[2], row[3]]);
        for (x, value) in row.into_iter().enumerate() {
            block[y * BLOCK_DIM + x] = ((value + 4) >> 3) as i32;
        }
    }
}
