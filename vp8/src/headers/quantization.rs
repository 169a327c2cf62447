// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{bool_decoder::BoolDecoder, error::Result};

use super::Vp8Header;

/// Base quantizer index and the per-coefficient-kind deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuantIndices {
    pub y_ac_index: u8,
    pub y1_dc_delta: i8,
    pub y2_dc_delta: i8,
    pub y2_ac_delta: i8,
    pub uv_dc_delta: i8,
    pub uv_ac_delta: i8,
}

impl Vp8Header for QuantIndices {
    fn read(bd: &mut BoolDecoder) -> Result<Self> {
        let y_ac_index = bd.read_literal(7)? as u8;
        let mut delta = || -> Result<i8> { Ok(bd.read_optional_signed(4)? as i8) };
        Ok(QuantIndices {
            y_ac_index,
            y1_dc_delta: delta()?,
            y2_dc_delta: delta()?,
            y2_ac_delta: delta()?,
            uv_dc_delta: delta()?,
            uv_ac_delta: delta()?,
        })
    }
}
