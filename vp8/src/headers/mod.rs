// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod frame_header;
pub mod loop_filter;
pub mod quantization;
pub mod segmentation;

use crate::{bool_decoder::BoolDecoder, error::Result};

pub use frame_header::{FrameHeader, FrameTag};
pub use loop_filter::{FilterType, LoopFilterParams};
pub use quantization::QuantIndices;
pub use segmentation::Segmentation;

/// A group of fields read from the first partition in bitstream order.
pub trait Vp8Header
where
    Self: Sized,
{
    fn read(bd: &mut BoolDecoder) -> Result<Self>;
}
