// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{bool_decoder::BoolDecoder, error::Result, util::tracing_wrappers::*};

use super::Vp8Header;

pub const NUM_SEGMENTS: usize = 4;
const QUANTIZER_BITS: usize = 7;
const LOOP_FILTER_BITS: usize = 6;

/// Segment-based adjustments (RFC 6386, section 9.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    pub enabled: bool,
    /// The mode pass reads a segment id for each macroblock.
    pub update_map: bool,
    pub update_data: bool,
    /// Segment values replace the frame values instead of adjusting them.
    pub absolute_values: bool,
    pub quantizer: [i8; NUM_SEGMENTS],
    pub loop_filter_level: [i8; NUM_SEGMENTS],
    pub tree_probs: [u8; NUM_SEGMENTS - 1],
}

impl Default for Segmentation {
    fn default() -> Self {
        Segmentation {
            enabled: false,
            update_map: false,
            update_data: false,
            absolute_values: false,
            quantizer: [0; NUM_SEGMENTS],
            loop_filter_level: [0; NUM_SEGMENTS],
            tree_probs: [255; NUM_SEGMENTS - 1],
        }
    }
}

impl Segmentation {
    /// Whether the mode pass reads a segment id per macroblock.
    pub fn reads_segment_ids(&self) -> bool {
        self.enabled && self.update_map
    }
}

impl Vp8Header for Segmentation {
    fn read(bd: &mut BoolDecoder) -> Result<Self> {
        let mut segmentation = Segmentation {
            enabled: bd.read_flag()?,
            ..Default::default()
        };
        if !segmentation.enabled {
            return Ok(segmentation);
        }
        segmentation.update_map = bd.read_flag()?;
        segmentation.update_data = bd.read_flag()?;
        if segmentation.update_data {
            segmentation.absolute_values = bd.read_flag()?;
            for q in segmentation.quantizer.iter_mut() {
                *q = bd.read_optional_signed(QUANTIZER_BITS)? as i8;
            }
            for lf in segmentation.loop_filter_level.iter_mut() {
                *lf = bd.read_optional_signed(LOOP_FILTER_BITS)? as i8;
            }
        }
        if segmentation.update_map {
            for prob in segmentation.tree_probs.iter_mut() {
                *prob = if bd.read_flag()? {
                    bd.read_literal(8)? as u8
                } else {
                    255
                };
            }
        }
        debug!(?segmentation);
        Ok(segmentation)
    }
}
