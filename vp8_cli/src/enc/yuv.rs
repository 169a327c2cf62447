// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use color_eyre::eyre::Result;
use vp8::decode::DecodedFrame;

/// Appends the visible part of the three planes in I420 order.
pub(crate) fn write_planes(frame: &DecodedFrame, out: &mut Vec<u8>) -> Result<()> {
    let luma_size = frame.luma_size();
    let chroma_size = frame.chroma_size();
    out.try_reserve(luma_size.0 * luma_size.1 + 2 * chroma_size.0 * chroma_size.1)?;
    for row in frame.y_plane().cropped_rows(luma_size) {
        out.extend_from_slice(row);
    }
    for plane in [frame.u_plane(), frame.v_plane()] {
        for row in plane.cropped_rows(chroma_size) {
            out.extend_from_slice(row);
        }
    }
    Ok(())
}

/// Raw planar 4:2:0 samples cropped to the visible frame size.
pub fn to_i420(frame: &DecodedFrame) -> Result<Vec<u8>> {
    let mut ret = vec![];
    write_planes(frame, &mut ret)?;
    Ok(ret)
}

#[cfg(test)]
mod test {
    use super::to_i420;
    use crate::enc::test_frame;

    #[test]
    fn cropped_sizes() {
        let frame = test_frame(17, 9);
        let data = to_i420(&frame).unwrap();
        assert_eq!(data.len(), 17 * 9 + 2 * 9 * 5);
        assert!(data.iter().all(|&v| v == 128));
    }
}
