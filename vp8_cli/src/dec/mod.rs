// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::path::Path;

use color_eyre::eyre::{Result, WrapErr};
use vp8::{
    decode::{DecodedFrame, Decoder, DecoderOptions},
    headers::FrameHeader,
};

pub fn read_payload(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).wrap_err_with(|| format!("Cannot read {}", path.display()))
}

/// Decodes the raw VP8 key frame stored in `path`.
pub fn decode_file(path: &Path, options: DecoderOptions) -> Result<DecodedFrame> {
    let payload = read_payload(path)?;
    let mut decoder = Decoder::new(options);
    let frame = decoder
        .decode(&payload)
        .wrap_err_with(|| format!("Failed to decode {}", path.display()))?;
    Ok(frame.clone())
}

pub fn read_header(path: &Path) -> Result<FrameHeader> {
    let payload = read_payload(path)?;
    vp8::decode::read_frame_info(&payload)
        .wrap_err_with(|| format!("Failed to parse the frame header of {}", path.display()))
}
