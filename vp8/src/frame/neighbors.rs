// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Lookups of neighboring sub-blocks across macroblock boundaries.
//!
//! Macroblocks are addressed by their index in the bordered grid, so every
//! step of one macroblock in any direction from a real macroblock lands on
//! a valid (possibly border) cell.

use super::{
    Frame,
    macroblock::MacroBlock,
    modes::LumaMode,
    predict::{BlockEdges, SubBlockEdges},
    subblock::{PlaneType, SubBlock},
};

impl Frame<'_> {
    pub(super) fn grid_stride(&self) -> usize {
        self.mb_cols + 2
    }

    /// Grid index of the macroblock in grid column `x`, row `y`.
    pub(super) fn mb_index(&self, x: usize, y: usize) -> usize {
        y * self.grid_stride() + x
    }

    pub(super) fn sub_block(&self, (mb, index): (usize, usize), plane: PlaneType) -> &SubBlock {
        self.macroblocks[mb].sub_block(plane, index)
    }

    /// The sub-block `dx` columns and `dy` rows away from sub-block `index`
    /// of macroblock `mb`, as `(macroblock, sub-block)` indices.
    pub(super) fn relative_sub_block(
        &self,
        mb: usize,
        plane: PlaneType,
        index: usize,
        dx: isize,
        dy: isize,
    ) -> (usize, usize) {
        debug_assert!(plane != PlaneType::Y2);
        let dim = plane.blocks_per_row() as isize;
        let x = (index as isize % dim) + dx;
        let y = (index as isize / dim) + dy;
        let mb_offset = y.div_euclid(dim) * self.grid_stride() as isize + x.div_euclid(dim);
        (
            mb.wrapping_add_signed(mb_offset),
            (y.rem_euclid(dim) * dim + x.rem_euclid(dim)) as usize,
        )
    }

    pub(super) fn above_sub_block(&self, mb: usize, plane: PlaneType, index: usize) -> &SubBlock {
        if plane == PlaneType::Y2 {
            return self.y2_neighbor(mb, self.grid_stride());
        }
        self.sub_block(self.relative_sub_block(mb, plane, index, 0, -1), plane)
    }

    pub(super) fn left_sub_block(&self, mb: usize, plane: PlaneType, index: usize) -> &SubBlock {
        if plane == PlaneType::Y2 {
            return self.y2_neighbor(mb, 1);
        }
        self.sub_block(self.relative_sub_block(mb, plane, index, -1, 0), plane)
    }

    /// The nearest Y2 block `step` grid cells back, passing over B_PRED
    /// macroblocks, which have no Y2 block. Border macroblocks stop the
    /// walk.
    fn y2_neighbor(&self, mb: usize, step: usize) -> &SubBlock {
        let mut neighbor = mb - step;
        while self.macroblocks[neighbor].luma_mode == LumaMode::B {
            neighbor -= step;
        }
        &self.macroblocks[neighbor].y2
    }

    /// Token context of a block: how many of its left and above neighbors
    /// have a nonzero token.
    pub(super) fn token_context(&self, mb: usize, plane: PlaneType, index: usize) -> usize {
        self.left_sub_block(mb, plane, index).has_nonzero_token() as usize
            + self.above_sub_block(mb, plane, index).has_nonzero_token() as usize
    }

    fn is_rightmost(&self, mb: &MacroBlock) -> bool {
        mb.column == self.mb_cols
    }

    /// Four samples to the above-right of luma sub-block `index`.
    pub(super) fn above_right_edge(&self, mb: usize, index: usize) -> [u8; 4] {
        let block = &self.macroblocks[mb];
        if index % 4 < 3 {
            return self
                .sub_block(self.relative_sub_block(mb, PlaneType::Y1, index, 1, -1), PlaneType::Y1)
                .bottom_row();
        }
        // Column 3 uses the row above the macroblock for all four rows.
        if self.is_rightmost(block) && block.row > 1 {
            let above = &self.macroblocks[mb - self.grid_stride()];
            return [above.y[15].pixel(3, 3); 4];
        }
        self.macroblocks[mb + 1 - self.grid_stride()].y[12].bottom_row()
    }

    /// Edges of luma sub-block `index` of a B_PRED macroblock.
    pub(super) fn sub_block_edges(&self, mb: usize, index: usize) -> SubBlockEdges {
        let plane = PlaneType::Y1;
        let above = self.above_sub_block(mb, plane, index).bottom_row();
        let above_right = self.above_right_edge(mb, index);
        let mut edges = SubBlockEdges {
            above: [0; 8],
            left: self.left_sub_block(mb, plane, index).right_column(),
            corner: self
                .sub_block(self.relative_sub_block(mb, plane, index, -1, -1), plane)
                .pixel(3, 3),
        };
        edges.above[..4].copy_from_slice(&above);
        edges.above[4..].copy_from_slice(&above_right);
        edges
    }

    /// Edges of a whole macroblock plane; `N` is 16 for luma and 8 for
    /// chroma.
    pub(super) fn block_edges<const N: usize>(&self, mb: usize, plane: PlaneType) -> BlockEdges<N> {
        let dim = plane.blocks_per_row();
        debug_assert_eq!(dim * 4, N);
        let stride = self.grid_stride();
        let block = &self.macroblocks[mb];
        let above = &self.macroblocks[mb - stride];
        let left = &self.macroblocks[mb - 1];
        let above_left = &self.macroblocks[mb - stride - 1];
        let bottom_row = dim * (dim - 1);
        BlockEdges {
            above: std::array::from_fn(|x| above.sub_block(plane, bottom_row + x / 4).pixel(x % 4, 3)),
            left: std::array::from_fn(|y| left.sub_block(plane, (y / 4) * dim + dim - 1).pixel(3, y % 4)),
            corner: above_left.sub_block(plane, dim * dim - 1).pixel(3, 3),
            have_above: block.row > 1,
            have_left: block.column > 1,
        }
    }
}
