// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::collections::TryReserveError;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Only key frames are supported")]
    UnsupportedFrameType,
    #[error("Payload truncated")]
    TruncatedPayload,
    #[error("Invalid start code {0:02x}{1:02x}{2:02x}, expected 9d012a")]
    InvalidStartCode(u8, u8, u8),
    #[error("Invalid image size: {0}x{1}")]
    InvalidImageSize(u32, u32),
    #[error("Image size too large: {0}x{1}")]
    ImageSizeTooLarge(u32, u32),
    #[error("Malformed partition table: {size} bytes at offset {offset} exceed {len} byte payload")]
    MalformedPartitionTable {
        offset: usize,
        size: usize,
        len: usize,
    },
    #[error("Unsupported {0} prediction mode {1}")]
    UnsupportedPredictionMode(&'static str, u8),
    #[error("Out of memory: {0}")]
    OutOfMemory(#[from] TryReserveError),
}

pub type Result<T> = std::result::Result<T, Error>;
