// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use num_derive::FromPrimitive;

use crate::{bool_decoder::BoolDecoder, error::Result};

use super::Vp8Header;

const NUM_REF_DELTAS: usize = 4;
const NUM_MODE_DELTAS: usize = 4;
const DELTA_BITS: usize = 6;

#[derive(Debug, FromPrimitive, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterType {
    #[default]
    Normal = 0,
    Simple = 1,
}

/// Deblocking filter parameters. They are parsed and reported; the decoder
/// does not filter its output.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoopFilterParams {
    pub filter_type: FilterType,
    pub level: u8,
    pub sharpness: u8,
    pub deltas_enabled: bool,
    pub deltas_updated: bool,
    pub ref_deltas: [i8; NUM_REF_DELTAS],
    pub mode_deltas: [i8; NUM_MODE_DELTAS],
}

impl Vp8Header for LoopFilterParams {
    fn read(bd: &mut BoolDecoder) -> Result<Self> {
        let mut params = LoopFilterParams {
            filter_type: if bd.read_flag()? {
                FilterType::Simple
            } else {
                FilterType::Normal
            },
            level: bd.read_literal(6)? as u8,
            sharpness: bd.read_literal(3)? as u8,
            deltas_enabled: bd.read_flag()?,
            ..Default::default()
        };
        if params.deltas_enabled {
            params.deltas_updated = bd.read_flag()?;
            if params.deltas_updated {
                for delta in params
                    .ref_deltas
                    .iter_mut()
                    .chain(params.mode_deltas.iter_mut())
                {
                    *delta = bd.read_optional_signed(DELTA_BITS)? as i8;
                }
            }
        }
        Ok(params)
    }
}
