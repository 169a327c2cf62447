// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::{
    entropy_coding::probabilities::DEFAULT_COEFF_PROBS,
    error::Result,
    frame::Frame,
    headers::FrameHeader,
    image::Plane,
    util::tracing_wrappers::*,
};

/// Default upper bound on `width * height` of a decoded frame.
pub const DEFAULT_MAX_PIXELS: usize = 1 << 28;

#[derive(Debug, Clone)]
pub struct DecoderOptions {
    /// Frames with more pixels than this are rejected before the
    /// macroblock grid is allocated. `None` disables the check.
    pub max_pixels: Option<usize>,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        DecoderOptions {
            max_pixels: Some(DEFAULT_MAX_PIXELS),
        }
    }
}

/// Planar 4:2:0 output of a key frame.
///
/// Planes are padded to whole macroblocks: luma is
/// `(mb_cols * 16) x (mb_rows * 16)` and chroma half that in each
/// direction. [`Self::width`] and [`Self::height`] give the visible size.
#[derive(Debug, Clone)]
pub struct DecodedFrame {
    header: FrameHeader,
    y: Plane,
    u: Plane,
    v: Plane,
}

impl DecodedFrame {
    pub(crate) fn new(header: FrameHeader, y: Plane, u: Plane, v: Plane) -> DecodedFrame {
        DecodedFrame { header, y, u, v }
    }

    pub fn width(&self) -> u32 {
        self.header.width as u32
    }

    pub fn height(&self) -> u32 {
        self.header.height as u32
    }

    /// Visible size of the luma plane.
    pub fn luma_size(&self) -> (usize, usize) {
        (self.width() as usize, self.height() as usize)
    }

    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    pub fn luma(&self, x: usize, y: usize) -> u8 {
        self.y.get(x, y)
    }

    pub fn chroma_u(&self, x: usize, y: usize) -> u8 {
        self.u.get(x, y)
    }

    pub fn chroma_v(&self, x: usize, y: usize) -> u8 {
        self.v.get(x, y)
    }

    pub fn y_plane(&self) -> &Plane {
        &self.y
    }

    pub fn u_plane(&self) -> &Plane {
        &self.u
    }

    pub fn v_plane(&self) -> &Plane {
        &self.v
    }

    /// Visible size of the chroma planes.
    pub fn chroma_size(&self) -> (usize, usize) {
        let (width, height) = self.luma_size();
        (width.div_ceil(2), height.div_ceil(2))
    }
}

/// Decodes key frames one at a time and keeps the most recent result.
#[derive(Debug, Default)]
pub struct Decoder {
    options: DecoderOptions,
    frame: Option<DecodedFrame>,
    frames_decoded: usize,
}

impl Decoder {
    pub fn new(options: DecoderOptions) -> Decoder {
        Decoder {
            options,
            frame: None,
            frames_decoded: 0,
        }
    }

    /// Decodes one VP8 key frame payload. On error the previously decoded
    /// frame is dropped.
    pub fn decode(&mut self, payload: &[u8]) -> Result<&DecodedFrame> {
        self.frame = None;
        info!(len = payload.len(), "decoding key frame");
        let decoded = Frame::new(payload, &self.options)?.decode()?;
        info!(
            width = decoded.width(),
            height = decoded.height(),
            "decoded key frame"
        );
        self.frames_decoded += 1;
        Ok(self.frame.insert(decoded))
    }

    pub fn frame(&self) -> Option<&DecodedFrame> {
        self.frame.as_ref()
    }

    pub fn width(&self) -> Option<u32> {
        self.frame.as_ref().map(DecodedFrame::width)
    }

    pub fn height(&self) -> Option<u32> {
        self.frame.as_ref().map(DecodedFrame::height)
    }

    pub fn frames_decoded(&self) -> usize {
        self.frames_decoded
    }
}

/// Decodes a single key frame with default options.
pub fn decode_key_frame(payload: &[u8]) -> Result<DecodedFrame> {
    Frame::new(payload, &DecoderOptions::default())?.decode()
}

/// Parses the frame header, including the coefficient probability updates,
/// without decoding any macroblock.
pub fn read_frame_info(payload: &[u8]) -> Result<FrameHeader> {
    let mut coeff_probs = DEFAULT_COEFF_PROBS;
    let (header, _) = FrameHeader::read(payload, &mut coeff_probs)?;
    Ok(header)
}
