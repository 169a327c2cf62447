// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use array_init::array_init;

use crate::{
    entropy_coding::{
        probabilities::{KEYFRAME_BPRED_MODE_PROBS, KEYFRAME_UV_MODE_PROBS, KEYFRAME_YMODE_PROBS},
        tokens::BlockType,
        tree::{KEYFRAME_BPRED_MODE_TREE, KEYFRAME_UV_MODE_TREE, KEYFRAME_YMODE_TREE, SEGMENT_ID_TREE},
    },
    error::Result,
    util::tracing_wrappers::*,
};

use super::{
    Frame,
    modes::{ChromaMode, IntraMode, LumaMode},
    predict::{predict_block, predict_subblock},
    subblock::{PlaneType, SubBlock},
};

/// Progress of a macroblock through the two decoding passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum DecodeState {
    Allocated,
    ModesRead,
    TokensDecoded,
    Reconstructed,
}

/// A 16x16 luma / 8x8 chroma block and everything decoded for it.
#[derive(Debug, Clone)]
pub struct MacroBlock {
    /// Grid column; real macroblocks start at 1.
    pub column: usize,
    /// Grid row; real macroblocks start at 1.
    pub row: usize,
    pub y: [SubBlock; 16],
    pub u: [SubBlock; 4],
    pub v: [SubBlock; 4],
    pub y2: SubBlock,
    pub luma_mode: LumaMode,
    pub chroma_mode: ChromaMode,
    pub skip_coeff: bool,
    pub segment: u8,
    pub state: DecodeState,
}

impl MacroBlock {
    pub fn new(column: usize, row: usize) -> MacroBlock {
        MacroBlock {
            column,
            row,
            y: array_init(|_| SubBlock::new(PlaneType::Y1)),
            u: array_init(|_| SubBlock::new(PlaneType::U)),
            v: array_init(|_| SubBlock::new(PlaneType::V)),
            y2: SubBlock::new(PlaneType::Y2),
            luma_mode: LumaMode::Dc,
            chroma_mode: ChromaMode::Dc,
            skip_coeff: false,
            segment: 0,
            state: DecodeState::Allocated,
        }
    }

    /// A border macroblock outside the frame with every sample set to
    /// `fill`.
    pub fn sentinel(column: usize, row: usize, fill: u8) -> MacroBlock {
        MacroBlock {
            y: array_init(|_| SubBlock::sentinel(PlaneType::Y1, fill)),
            u: array_init(|_| SubBlock::sentinel(PlaneType::U, fill)),
            v: array_init(|_| SubBlock::sentinel(PlaneType::V, fill)),
            state: DecodeState::Reconstructed,
            ..MacroBlock::new(column, row)
        }
    }

    pub fn sub_block(&self, plane: PlaneType, index: usize) -> &SubBlock {
        match plane {
            PlaneType::Y1 => &self.y[index],
            PlaneType::Y2 => &self.y2,
            PlaneType::U => &self.u[index],
            PlaneType::V => &self.v[index],
        }
    }

    pub fn sub_block_mut(&mut self, plane: PlaneType, index: usize) -> &mut SubBlock {
        match plane {
            PlaneType::Y1 => &mut self.y[index],
            PlaneType::Y2 => &mut self.y2,
            PlaneType::U => &mut self.u[index],
            PlaneType::V => &mut self.v[index],
        }
    }

    /// Splits a whole-plane prediction into the 4x4 blocks of `plane` and
    /// reconstructs them.
    fn reconstruct_plane<const N: usize>(&mut self, plane: PlaneType, predicted: &[[u8; N]; N]) {
        let dim = plane.blocks_per_row();
        for index in 0..dim * dim {
            let (bx, by) = (index % dim * 4, index / dim * 4);
            let block = std::array::from_fn(|i| predicted[by + i / 4][bx + i % 4]);
            self.sub_block_mut(plane, index).reconstruct(block);
        }
    }

    fn advance(&mut self, from: DecodeState, to: DecodeState) {
        debug_assert_eq!(self.state, from, "macroblock ({}, {})", self.column, self.row);
        self.state = to;
    }
}

impl Frame<'_> {
    /// Reads the segment id, skip flag and prediction modes of one
    /// macroblock from the first partition.
    pub(super) fn read_macro_block_modes(&mut self, mb: usize) -> Result<()> {
        let segmentation = &self.header.segmentation;
        let segment = if segmentation.reads_segment_ids() {
            self.first_partition
                .read_tree(&SEGMENT_ID_TREE, &segmentation.tree_probs, 0)?
        } else {
            0
        };
        let skip_coeff = match self.header.prob_skip_false {
            Some(prob) => self.first_partition.read_bool(prob)?,
            None => false,
        };
        let luma_mode = LumaMode::try_from(self.first_partition.read_tree(
            &KEYFRAME_YMODE_TREE,
            &KEYFRAME_YMODE_PROBS,
            0,
        )?)?;
        {
            let block = &mut self.macroblocks[mb];
            block.segment = segment;
            block.skip_coeff = skip_coeff;
            block.luma_mode = luma_mode;
        }

        if luma_mode == LumaMode::B {
            for index in 0..16 {
                let above = self.above_sub_block(mb, PlaneType::Y1, index).mode;
                let left = self.left_sub_block(mb, PlaneType::Y1, index).mode;
                let mode = self.first_partition.read_tree(
                    &KEYFRAME_BPRED_MODE_TREE,
                    &KEYFRAME_BPRED_MODE_PROBS[above as usize][left as usize],
                    0,
                )?;
                self.macroblocks[mb].y[index].mode = IntraMode::try_from(mode)?;
            }
        } else {
            let mode = luma_mode.implied_subblock_mode();
            for block in self.macroblocks[mb].y.iter_mut() {
                block.mode = mode;
            }
        }

        let chroma_mode = ChromaMode::try_from(self.first_partition.read_tree(
            &KEYFRAME_UV_MODE_TREE,
            &KEYFRAME_UV_MODE_PROBS,
            0,
        )?)?;
        let block = &mut self.macroblocks[mb];
        block.chroma_mode = chroma_mode;
        trace!(
            column = block.column,
            row = block.row,
            segment,
            skip_coeff,
            ?luma_mode,
            ?chroma_mode
        );
        block.advance(DecodeState::Allocated, DecodeState::ModesRead);
        Ok(())
    }

    /// Reads the coefficient tokens of one macroblock from token partition
    /// `partition`. Skipped macroblocks keep all-zero tokens.
    pub fn decode_macro_block(&mut self, mb: usize, partition: usize) -> Result<()> {
        if !self.macroblocks[mb].skip_coeff {
            let with_y2 = self.macroblocks[mb].luma_mode != LumaMode::B;
            if with_y2 {
                let context = self.token_context(mb, PlaneType::Y2, 0);
                self.macroblocks[mb].y2.decode_tokens(
                    &mut self.partitions[partition],
                    &self.coeff_probs,
                    context,
                    BlockType::Y2,
                    false,
                )?;
            }
            let luma_type = if with_y2 {
                BlockType::YAfterY2
            } else {
                BlockType::YWithDc
            };
            let planes = [
                (PlaneType::Y1, 16, luma_type, with_y2),
                (PlaneType::U, 4, BlockType::Chroma, false),
                (PlaneType::V, 4, BlockType::Chroma, false),
            ];
            for (plane, count, block_type, skip_dc) in planes {
                for index in 0..count {
                    let context = self.token_context(mb, plane, index);
                    self.macroblocks[mb].sub_block_mut(plane, index).decode_tokens(
                        &mut self.partitions[partition],
                        &self.coeff_probs,
                        context,
                        block_type,
                        skip_dc,
                    )?;
                }
            }
        }
        self.macroblocks[mb].advance(DecodeState::ModesRead, DecodeState::TokensDecoded);
        Ok(())
    }

    /// Dequantizes, predicts and reconstructs one macroblock. Its left,
    /// above and above-right neighbors must already be reconstructed.
    pub fn dequant_macro_block(&mut self, mb: usize) -> Result<()> {
        let factors = self.dequant[self.macroblocks[mb].segment as usize];
        let luma_mode = self.macroblocks[mb].luma_mode;

        if luma_mode == LumaMode::B {
            for index in 0..16 {
                self.macroblocks[mb].y[index].dequantize(factors.y1, None);
                let edges = self.sub_block_edges(mb, index);
                let block = &mut self.macroblocks[mb].y[index];
                let predicted = predict_subblock(block.mode, &edges);
                block.reconstruct(predicted);
            }
        } else {
            let block = &mut self.macroblocks[mb];
            let dc = block.y2.dequantize(factors.y2, None);
            for (sub_block, &dc) in block.y.iter_mut().zip(&dc) {
                sub_block.dequantize(factors.y1, Some(dc));
            }
            let predicted = predict_block::<16>(luma_mode, &self.block_edges(mb, PlaneType::Y1))?;
            self.macroblocks[mb].reconstruct_plane(PlaneType::Y1, &predicted);
        }

        let chroma_mode = LumaMode::from(self.macroblocks[mb].chroma_mode);
        for plane in [PlaneType::U, PlaneType::V] {
            for index in 0..4 {
                self.macroblocks[mb]
                    .sub_block_mut(plane, index)
                    .dequantize(factors.for_plane(plane), None);
            }
            let predicted = predict_block::<8>(chroma_mode, &self.block_edges(mb, plane))?;
            self.macroblocks[mb].reconstruct_plane(plane, &predicted);
        }
        self.macroblocks[mb].advance(DecodeState::TokensDecoded, DecodeState::Reconstructed);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn sentinel_is_reconstructed() {
        let mb = MacroBlock::sentinel(0, 0, 127);
        assert_eq!(mb.state, DecodeState::Reconstructed);
        assert_eq!(mb.luma_mode, LumaMode::Dc);
        assert!(mb.y.iter().all(|b| b.mode == IntraMode::Dc && !b.has_nonzero_token()));
        assert_eq!(mb.u[3].pixel(3, 3), 127);
        assert!(mb.y2.reconstructed.is_none());
    }

    #[test]
    fn plane_split_into_blocks() {
        let mut mb = MacroBlock::new(1, 1);
        let predicted: [[u8; 8]; 8] = std::array::from_fn(|y| std::array::from_fn(|x| (y * 8 + x) as u8));
        mb.reconstruct_plane(PlaneType::U, &predicted);
        assert_eq!(mb.u[0].bottom_row(), [24, 25, 26, 27]);
        assert_eq!(mb.u[1].right_column(), [7, 15, 23, 31]);
        assert_eq!(mb.u[3].pixel(3, 3), 63);
        assert_eq!(mb.u[2].predicted.unwrap()[0], 32);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn out_of_order_transition() {
        let mut mb = MacroBlock::new(1, 1);
        mb.advance(DecodeState::ModesRead, DecodeState::TokensDecoded);
    }
}
