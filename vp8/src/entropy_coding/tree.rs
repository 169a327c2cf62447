// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    bool_decoder::BoolDecoder,
    error::Result,
    frame::modes::{ChromaMode, IntraMode, LumaMode},
};

use super::tokens::*;

/// A binary decoding tree stored as a flat array of node pairs.
///
/// Entry `i` is the successor of node `i & !1` on branch `i & 1`. Positive
/// entries are offsets of internal nodes; entries `<= 0` are leaves holding
/// the negated symbol. The root pair sits at offset 0 and is never a
/// successor, so `-0` is a valid leaf.
#[derive(Debug, Clone, Copy)]
pub struct Tree {
    nodes: &'static [i8],
}

impl Tree {
    pub const fn new(nodes: &'static [i8]) -> Tree {
        Tree { nodes }
    }

    pub fn nodes(&self) -> &'static [i8] {
        self.nodes
    }

    /// Decodes one symbol. `probs[i >> 1]` is the probability of taking
    /// branch 0 at node `i`.
    pub fn walk(&self, bd: &mut BoolDecoder, probs: &[u8]) -> Result<u8> {
        self.walk_from(bd, probs, 0)
    }

    /// Like [`Self::walk`], but starts `skip_branches` nodes down the left
    /// spine of the tree.
    pub fn walk_from(&self, bd: &mut BoolDecoder, probs: &[u8], skip_branches: usize) -> Result<u8> {
        let mut index = 2 * skip_branches;
        loop {
            let branch = bd.read_bool(probs[index >> 1])?;
            let next = self.nodes[index + branch as usize];
            if next <= 0 {
                return Ok(next.unsigned_abs());
            }
            index = next as usize;
        }
    }
}

pub const SEGMENT_ID_TREE: Tree = Tree::new(&[2, 4, -0, -1, -2, -3]);

pub const KEYFRAME_YMODE_TREE: Tree = Tree::new(&[
    -(LumaMode::B as i8),
    2,
    4,
    6,
    -(LumaMode::Dc as i8),
    -(LumaMode::V as i8),
    -(LumaMode::H as i8),
    -(LumaMode::Tm as i8),
]);

pub const KEYFRAME_BPRED_MODE_TREE: Tree = Tree::new(&[
    -(IntraMode::Dc as i8),
    2,
    -(IntraMode::Tm as i8),
    4,
    -(IntraMode::Ve as i8),
    6,
    8,
    12,
    -(IntraMode::He as i8),
    10,
    -(IntraMode::Rd as i8),
    -(IntraMode::Vr as i8),
    -(IntraMode::Ld as i8),
    14,
    -(IntraMode::Vl as i8),
    16,
    -(IntraMode::Hd as i8),
    -(IntraMode::Hu as i8),
]);

pub const KEYFRAME_UV_MODE_TREE: Tree = Tree::new(&[
    -(ChromaMode::Dc as i8),
    2,
    -(ChromaMode::V as i8),
    4,
    -(ChromaMode::H as i8),
    -(ChromaMode::Tm as i8),
]);

#[rustfmt::skip]
pub const COEFF_TOKEN_TREE: Tree = Tree::new(&[
    -DCT_EOB, 2, -DCT_0, 4, -DCT_1, 6, 8, 12, -DCT_2, 10, -DCT_3, -DCT_4, 14, 16,
    -DCT_CAT1, -DCT_CAT2, 18, 20, -DCT_CAT3, -DCT_CAT4, -DCT_CAT5, -DCT_CAT6,
]);
