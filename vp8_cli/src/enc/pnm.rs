// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::io::Write;

use color_eyre::eyre::Result;
use vp8::decode::DecodedFrame;

/// The visible luma plane as a binary 8-bit PGM.
pub fn to_pgm(frame: &DecodedFrame) -> Result<Vec<u8>> {
    let size = frame.luma_size();
    let mut ret = vec![];
    write!(&mut ret, "P5\n{} {}\n255\n", size.0, size.1)?;
    ret.extend(frame.y_plane().cropped_rows(size).flatten());
    Ok(ret)
}

#[cfg(test)]
mod test {
    use super::to_pgm;
    use crate::enc::test_frame;

    #[test]
    fn convert_to_pgm() {
        let frame = test_frame(20, 3);
        let data = to_pgm(&frame).unwrap();
        assert!(data.starts_with(b"P5\n20 3\n255\n"));
        assert_eq!(data.len(), b"P5\n20 3\n255\n".len() + 60);
    }
}
