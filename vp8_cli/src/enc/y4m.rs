// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Write;

use color_eyre::eyre::Result;
use vp8::decode::DecodedFrame;

use super::yuv::write_planes;

/// A single-frame YUV4MPEG2 stream.
pub fn to_y4m(frame: &DecodedFrame) -> Result<Vec<u8>> {
    let mut ret = vec![];
    write!(
        &mut ret,
        "YUV4MPEG2 W{} H{} F25:1 Ip A1:1 C420jpeg\nFRAME\n",
        frame.width(),
        frame.height()
    )?;
    write_planes(frame, &mut ret)?;
    Ok(ret)
}
