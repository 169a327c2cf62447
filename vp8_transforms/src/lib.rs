// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Fixed-point 4x4 inverse transforms used by VP8 reconstruction.
//!
//! Blocks are 16 coefficients in raster order (`y * 4 + x`). Both transforms
//! run a vertical pass over the columns followed by a horizontal pass over the
//! rows, and work in place.

pub mod idct;
pub mod iwht;

pub use idct::idct4x4;
pub use iwht::iwht4x4;

pub const BLOCK_DIM: usize = 4;
pub const BLOCK_SIZE: usize = BLOCK_DIM * BLOCK_DIM;

#[cfg(test)]
mod tests;
