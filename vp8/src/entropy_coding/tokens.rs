// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! DCT token alphabet and the fixed tables used to turn tokens into
//! coefficients (RFC 6386, section 13).

use crate::{bool_decoder::BoolDecoder, error::Result};

pub const NUM_DCT_TOKENS: usize = 12;

pub const DCT_0: i8 = 0;
pub const DCT_1: i8 = 1;
pub const DCT_2: i8 = 2;
pub const DCT_3: i8 = 3;
pub const DCT_4: i8 = 4;
pub const DCT_CAT1: i8 = 5;
pub const DCT_CAT2: i8 = 6;
pub const DCT_CAT3: i8 = 7;
pub const DCT_CAT4: i8 = 8;
pub const DCT_CAT5: i8 = 9;
pub const DCT_CAT6: i8 = 10;
pub const DCT_EOB: i8 = 11;

/// Extra-bit probabilities of each escape category, zero terminated.
#[rustfmt::skip]
pub const PROB_DCT_CAT: [[u8; 12]; 6] = [
    [159, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [165, 145, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [173, 148, 140, 0, 0, 0, 0, 0, 0, 0, 0, 0],
    [176, 155, 140, 135, 0, 0, 0, 0, 0, 0, 0, 0],
    [180, 157, 141, 134, 130, 0, 0, 0, 0, 0, 0, 0],
    [254, 254, 243, 230, 196, 177, 153, 140, 133, 130, 129, 0],
];

pub const DCT_CAT_BASE: [i32; 6] = [5, 7, 11, 19, 35, 67];

/// Probability band of each scan position.
pub const COEFF_BANDS: [usize; 16] = [0, 1, 2, 3, 6, 4, 5, 6, 6, 6, 6, 6, 6, 6, 6, 7];

/// Raster position of each scan position.
pub const ZIGZAG: [usize; 16] = [0, 1, 4, 8, 5, 2, 3, 6, 9, 12, 13, 10, 7, 11, 14, 15];

/// Selects the first index of the coefficient probability table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BlockType {
    /// Luma block whose DC comes from the Y2 block.
    YAfterY2 = 0,
    Y2 = 1,
    Chroma = 2,
    /// Luma block carrying its own DC.
    YWithDc = 3,
}

/// Reads the extra magnitude bits of an escape token, one bit per entry of
/// `probs` up to the terminating zero.
pub fn dct_extra(bd: &mut BoolDecoder, probs: &[u8]) -> Result<i32> {
    let mut extra = 0;
    for &prob in probs.iter().take_while(|&&p| p != 0) {
        extra = (extra << 1) | bd.read_bool(prob)? as i32;
    }
    Ok(extra)
}
