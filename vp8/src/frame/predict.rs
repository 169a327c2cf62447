// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Intra predictors. All functions are pure over explicit edge samples.

use crate::error::{Error, Result};

use super::modes::{IntraMode, LumaMode};

/// Samples surrounding a 4x4 block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubBlockEdges {
    /// Bottom row of the block above, then of the block above and to the
    /// right.
    pub above: [u8; 8],
    /// Right column of the block to the left.
    pub left: [u8; 4],
    /// Bottom-right sample of the block above and to the left.
    pub corner: u8,
}

/// Samples surrounding an `N`x`N` macroblock plane, and whether the
/// neighboring macroblocks are inside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockEdges<const N: usize> {
    pub above: [u8; N],
    pub left: [u8; N],
    pub corner: u8,
    pub have_above: bool,
    pub have_left: bool,
}

#[inline(always)]
fn avg2(a: u8, b: u8) -> u8 {
    ((a as u16 + b as u16 + 1) >> 1) as u8
}

#[inline(always)]
fn avg3(a: u8, b: u8, c: u8) -> u8 {
    ((a as u16 + 2 * b as u16 + c as u16 + 2) >> 2) as u8
}

#[inline(always)]
fn true_motion(left: u8, above: u8, corner: u8) -> u8 {
    (left as i32 + above as i32 - corner as i32).clamp(0, 255) as u8
}

fn from_rows(rows: [[u8; 4]; 4]) -> [u8; 16] {
    std::array::from_fn(|i| rows[i / 4][i % 4])
}

/// Predicts one 4x4 luma block of a B_PRED macroblock.
pub fn predict_subblock(mode: IntraMode, edges: &SubBlockEdges) -> [u8; 16] {
    let p = edges.corner;
    let [a0, a1, a2, a3, a4, a5, a6, a7] = edges.above;
    let [l0, l1, l2, l3] = edges.left;
    match mode {
        IntraMode::Dc => {
            let sum: u32 = edges.above[..4]
                .iter()
                .chain(&edges.left)
                .map(|&v| v as u32)
                .sum();
            [((sum + 4) >> 3) as u8; 16]
        }
        IntraMode::Tm => {
            std::array::from_fn(|i| true_motion(edges.left[i / 4], edges.above[i % 4], p))
        }
        IntraMode::Ve => {
            let row = [
                avg3(p, a0, a1),
                avg3(a0, a1, a2),
                avg3(a1, a2, a3),
                avg3(a2, a3, a4),
            ];
            from_rows([row; 4])
        }
        IntraMode::He => {
            let column = [
                avg3(p, l0, l1),
                avg3(l0, l1, l2),
                avg3(l1, l2, l3),
                avg3(l2, l3, l3),
            ];
            std::array::from_fn(|i| column[i / 4])
        }
        IntraMode::Ld => std::array::from_fn(|i| {
            let d = i % 4 + i / 4;
            avg3(
                edges.above[d],
                edges.above[d + 1],
                edges.above[(d + 2).min(7)],
            )
        }),
        IntraMode::Rd => {
            let edge = [l3, l2, l1, l0, p, a0, a1, a2, a3];
            std::array::from_fn(|i| {
                let d = 3 + i % 4 - i / 4;
                avg3(edge[d], edge[d + 1], edge[d + 2])
            })
        }
        IntraMode::Vr => from_rows([
            [avg2(p, a0), avg2(a0, a1), avg2(a1, a2), avg2(a2, a3)],
            [avg3(l0, p, a0), avg3(p, a0, a1), avg3(a0, a1, a2), avg3(a1, a2, a3)],
            [avg3(l1, l0, p), avg2(p, a0), avg2(a0, a1), avg2(a1, a2)],
            [avg3(l2, l1, l0), avg3(l0, p, a0), avg3(p, a0, a1), avg3(a0, a1, a2)],
        ]),
        IntraMode::Vl => from_rows([
            [avg2(a0, a1), avg2(a1, a2), avg2(a2, a3), avg2(a3, a4)],
            [avg3(a0, a1, a2), avg3(a1, a2, a3), avg3(a2, a3, a4), avg3(a3, a4, a5)],
            [avg2(a1, a2), avg2(a2, a3), avg2(a3, a4), avg3(a4, a5, a6)],
            [avg3(a1, a2, a3), avg3(a2, a3, a4), avg3(a3, a4, a5), avg3(a5, a6, a7)],
        ]),
        IntraMode::Hd => from_rows([
            [avg2(l0, p), avg3(l0, p, a0), avg3(p, a0, a1), avg3(a0, a1, a2)],
            [avg2(l1, l0), avg3(l1, l0, p), avg2(l0, p), avg3(l0, p, a0)],
            [avg2(l2, l1), avg3(l2, l1, l0), avg2(l1, l0), avg3(l1, l0, p)],
            [avg2(l3, l2), avg3(l3, l2, l1), avg2(l2, l1), avg3(l2, l1, l0)],
        ]),
        IntraMode::Hu => from_rows([
            [avg2(l0, l1), avg3(l0, l1, l2), avg2(l1, l2), avg3(l1, l2, l3)],
            [avg2(l1, l2), avg3(l1, l2, l3), avg2(l2, l3), avg3(l2, l3, l3)],
            [avg2(l2, l3), avg3(l2, l3, l3), l3, l3],
            [l3; 4],
        ]),
    }
}

/// Predicts a whole `N`x`N` plane of a macroblock (16 for luma, 8 for
/// chroma). `B` has no whole-block predictor.
pub fn predict_block<const N: usize>(mode: LumaMode, edges: &BlockEdges<N>) -> Result<[[u8; N]; N]> {
    let mut out = [[0u8; N]; N];
    match mode {
        LumaMode::Dc => {
            let mut sum = 0u32;
            let mut count = 0;
            if edges.have_above {
                sum += edges.above.iter().map(|&v| v as u32).sum::<u32>();
                count += 1;
            }
            if edges.have_left {
                sum += edges.left.iter().map(|&v| v as u32).sum::<u32>();
                count += 1;
            }
            let dc = if count == 0 {
                128
            } else {
                let shift = N.trailing_zeros() - 1 + count;
                ((sum + (1 << (shift - 1))) >> shift) as u8
            };
            out = [[dc; N]; N];
        }
        LumaMode::V => out = [edges.above; N],
        LumaMode::H => {
            for (row, &left) in out.iter_mut().zip(&edges.left) {
                *row = [left; N];
            }
        }
        LumaMode::Tm => {
            for (row, &left) in out.iter_mut().zip(&edges.left) {
                for (v, &above) in row.iter_mut().zip(&edges.above) {
                    *v = true_motion(left, above, edges.corner);
                }
            }
        }
        LumaMode::B => return Err(Error::UnsupportedPredictionMode("luma", LumaMode::B as u8)),
    }
    Ok(out)
}
