// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod pnm;
pub mod y4m;
pub mod yuv;

use std::path::Path;

use color_eyre::eyre::{Result, eyre};
use vp8::decode::DecodedFrame;

/// Serializes `frame` in the format named by the extension of `path`.
pub fn encode_for_path(frame: &DecodedFrame, path: &Path) -> Result<Vec<u8>> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("yuv") => yuv::to_i420(frame),
        Some("y4m") => y4m::to_y4m(frame),
        Some("pgm") => pnm::to_pgm(frame),
        _ => Err(eyre!(
            "Output format not supported for {}, expected .yuv, .y4m or .pgm",
            path.display()
        )),
    }
}

/// A frame of skipped DC macroblocks, uniformly 128.
#[cfg(test)]
pub(crate) fn test_frame(width: u16, height: u16) -> DecodedFrame {
    use vp8::entropy_coding::{probabilities::*, tree::*};
    use vp8_test_utils::{BoolEncoder, KeyFrameWriter};

    let mut writer = KeyFrameWriter::new(width, height);
    writer.prob_skip_false = Some(128);
    let mut enc = BoolEncoder::new();
    writer.write_header(&mut enc, &COEFF_UPDATE_PROBS);
    let macroblocks = (width as usize).div_ceil(16) * (height as usize).div_ceil(16);
    for _ in 0..macroblocks {
        enc.write_bool(true, 128);
        enc.write_tree(KEYFRAME_YMODE_TREE.nodes(), &KEYFRAME_YMODE_PROBS, 0, 0);
        enc.write_tree(KEYFRAME_UV_MODE_TREE.nodes(), &KEYFRAME_UV_MODE_PROBS, 0, 0);
    }
    let payload = writer.assemble(&enc.finish(), &[vec![]]);
    vp8::decode::decode_key_frame(&payload).unwrap()
}
