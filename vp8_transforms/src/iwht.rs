// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{BLOCK_DIM, BLOCK_SIZE};

#[inline(always)]
fn iwht1d(v: [i32; 4]) -> [i32; 4] {
    let a = v[0] + v[3];
    let b = v[1] + v[2];
    let c = v[1] - v[2];
    let d = v[0] - v[3];
    [a + b, c + d, a - b, d - c]
}

/// Inverse Walsh-Hadamard transform of the second order (Y2) block.
///
/// Output `i` is the DC coefficient of luma sub-block `i` in raster order.
pub fn iwht4x4(block: &mut [i32; BLOCK_SIZE]) {
    let mut tmp = [0i32; BLOCK_SIZE];
    for x in 0..BLOCK_DIM {
        let column = iwht1d([
            block[x],
            block[BLOCK_DIM + x],
            block[2 * BLOCK_DIM + x],
            block[3 * BLOCK_DIM + x],
        ]);
        for (y, value) in column.into_iter().enumerate() {
            tmp[y * BLOCK_DIM + x] = value;
        }
    }
    for y in 0..BLOCK_DIM {
        let row = &tmp[y * BLOCK_DIM..(y + 1) * BLOCK_DIM];
        let row = iwht1d([row[0], row[1], row[2], row[3]]);
        for (x, value) in row.into_iter().enumerate() {
            block[y * BLOCK_DIM + x] = (value + 3) >> 3;
        }
    }
}
