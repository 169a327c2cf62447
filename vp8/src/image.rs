// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::{
    error::{Error, Result},
    util::tracing_wrappers::*,
};

/// A single 8-bit sample plane stored row-major without padding.
#[derive(Clone, PartialEq, Eq)]
pub struct Plane {
    size: (usize, usize),
    data: Vec<u8>,
}

impl Debug for Plane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Plane {}x{}", self.size.0, self.size.1)
    }
}

impl Plane {
    #[instrument(err)]
    pub fn new(size: (usize, usize)) -> Result<Plane> {
        let (xsize, ysize) = size;
        if xsize == 0 || ysize == 0 {
            return Err(Error::InvalidImageSize(xsize as u32, ysize as u32));
        }
        let total_size = xsize
            .checked_mul(ysize)
            .ok_or(Error::ImageSizeTooLarge(xsize as u32, ysize as u32))?;
        debug!("trying to allocate plane");
        let mut data = vec![];
        data.try_reserve_exact(total_size)?;
        data.resize(total_size, 0);
        Ok(Plane { size, data })
    }

    pub fn size(&self) -> (usize, usize) {
        self.size
    }

    pub fn row(&self, row: usize) -> &[u8] {
        debug_assert!(row < self.size.1);
        let start = row * self.size.0;
        &self.data[start..start + self.size.0]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [u8] {
        debug_assert!(row < self.size.1);
        let start = row * self.size.0;
        &mut self.data[start..start + self.size.0]
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.row(y)[x]
    }

    /// Copies a 4x4 raster block with its top-left sample at `origin`.
    pub fn write_block(&mut self, origin: (usize, usize), block: &[u8; 16]) {
        for (y, src) in block.chunks_exact(4).enumerate() {
            self.row_mut(origin.1 + y)[origin.0..origin.0 + 4].copy_from_slice(src);
        }
    }

    /// The top-left `size` samples, row by row.
    pub fn cropped_rows(&self, size: (usize, usize)) -> impl Iterator<Item = &[u8]> + '_ {
        debug_assert!(size.0 <= self.size.0 && size.1 <= self.size.1);
        (0..size.1).map(move |y| &self.row(y)[..size.0])
    }

    #[cfg(test)]
    pub fn check_uniform(&self, value: u8) {
        for y in 0..self.size.1 {
            for (x, &v) in self.row(y).iter().enumerate() {
                assert_eq!(v, value, "mismatch at position {x}x{y}");
            }
        }
    }
}
