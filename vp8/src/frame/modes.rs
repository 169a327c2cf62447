// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::error::{Error, Result};

/// Whole-macroblock luma prediction; `B` predicts each 4x4 block separately.
#[derive(Debug, FromPrimitive, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum LumaMode {
    #[default]
    Dc = 0,
    V = 1,
    H = 2,
    Tm = 3,
    B = 4,
}

#[derive(Debug, FromPrimitive, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum ChromaMode {
    #[default]
    Dc = 0,
    V = 1,
    H = 2,
    Tm = 3,
}

/// Directional mode of a single 4x4 luma block.
#[derive(Debug, FromPrimitive, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum IntraMode {
    #[default]
    Dc = 0,
    Tm = 1,
    Ve = 2,
    He = 3,
    Ld = 4,
    Rd = 5,
    Vr = 6,
    Vl = 7,
    Hd = 8,
    Hu = 9,
}

impl TryFrom<u8> for LumaMode {
    type Error = Error;
    fn try_from(value: u8) -> Result<Self> {
        Self::from_u8(value).ok_or(Error::UnsupportedPredictionMode("luma", value))
    }
}

impl TryFrom<u8> for ChromaMode {
    type Error = Error;
    fn try_from(value: u8) -> Result<Self> {
        Self::from_u8(value).ok_or(Error::UnsupportedPredictionMode("chroma", value))
    }
}

impl TryFrom<u8> for IntraMode {
    type Error = Error;
    fn try_from(value: u8) -> Result<Self> {
        Self::from_u8(value).ok_or(Error::UnsupportedPredictionMode("subblock", value))
    }
}

impl From<ChromaMode> for LumaMode {
    fn from(mode: ChromaMode) -> Self {
        match mode {
            ChromaMode::Dc => LumaMode::Dc,
            ChromaMode::V => LumaMode::V,
            ChromaMode::H => LumaMode::H,
            ChromaMode::Tm => LumaMode::Tm,
        }
    }
}

impl LumaMode {
    /// Sub-block mode that B_PRED neighbors see for a whole-block mode.
    pub fn implied_subblock_mode(self) -> IntraMode {
        match self {
            LumaMode::Dc | LumaMode::B => IntraMode::Dc,
            LumaMode::V => IntraMode::Ve,
            LumaMode::H => IntraMode::He,
            LumaMode::Tm => IntraMode::Tm,
        }
    }
}
