// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

pub mod macroblock;
pub mod modes;
pub mod neighbors;
pub mod predict;
pub mod quantizer;
pub mod subblock;

use crate::{
    bool_decoder::BoolDecoder,
    decode::{DecodedFrame, DecoderOptions},
    entropy_coding::probabilities::{CoeffProbs, DEFAULT_COEFF_PROBS},
    error::{Error, Result},
    headers::FrameHeader,
    image::Plane,
    util::tracing_wrappers::*,
};

use macroblock::{DecodeState, MacroBlock};
use quantizer::{DequantFactors, MAX_SEGMENTS};
use subblock::PlaneType;

/// Sample value of the border row above the frame.
pub const SENTINEL_ABOVE: u8 = 127;
/// Sample value of the border columns left and right of the frame, and of
/// the border row below it.
pub const SENTINEL_LEFT: u8 = 129;

/// Decoding state of one key frame.
///
/// Macroblocks live in a grid with a one-macroblock border on every side.
/// Real macroblocks occupy grid columns `1..=mb_cols` and rows
/// `1..=mb_rows`.
pub struct Frame<'a> {
    header: FrameHeader,
    coeff_probs: CoeffProbs,
    first_partition: BoolDecoder<'a>,
    partitions: Vec<BoolDecoder<'a>>,
    dequant: [DequantFactors; MAX_SEGMENTS],
    macroblocks: Vec<MacroBlock>,
    mb_cols: usize,
    mb_rows: usize,
}

impl<'a> Frame<'a> {
    /// Parses the frame header, splits the token partitions and allocates
    /// the macroblock grid.
    #[instrument(level = "debug", skip_all, err)]
    pub fn new(payload: &'a [u8], options: &DecoderOptions) -> Result<Frame<'a>> {
        let mut coeff_probs = DEFAULT_COEFF_PROBS;
        let (header, first_partition) = FrameHeader::read(payload, &mut coeff_probs)?;
        let (width, height) = (header.width as u32, header.height as u32);
        if let Some(max_pixels) = options.max_pixels {
            if width as usize * height as usize > max_pixels {
                return Err(Error::ImageSizeTooLarge(width, height));
            }
        }
        let partitions = header.token_partitions(payload)?;
        let dequant = DequantFactors::for_segments(&header.quant, &header.segmentation);

        let (mb_cols, mb_rows) = (header.mb_cols(), header.mb_rows());
        let (grid_cols, grid_rows) = (mb_cols + 2, mb_rows + 2);
        let mut macroblocks = Vec::new();
        macroblocks.try_reserve_exact(grid_cols * grid_rows)?;
        for row in 0..grid_rows {
            for column in 0..grid_cols {
                macroblocks.push(if row == 0 {
                    MacroBlock::sentinel(column, row, SENTINEL_ABOVE)
                } else if column == 0 || column == grid_cols - 1 || row == grid_rows - 1 {
                    MacroBlock::sentinel(column, row, SENTINEL_LEFT)
                } else {
                    MacroBlock::new(column, row)
                });
            }
        }
        debug!(mb_cols, mb_rows, partitions = partitions.len(), "allocated frame");

        Ok(Frame {
            header,
            coeff_probs,
            first_partition,
            partitions,
            dequant,
            macroblocks,
            mb_cols,
            mb_rows,
        })
    }

    pub fn header(&self) -> &FrameHeader {
        &self.header
    }

    /// Reads the modes of every macroblock in raster order.
    #[instrument(level = "debug", skip_all, err)]
    pub fn read_modes(&mut self) -> Result<()> {
        for row in 1..=self.mb_rows {
            for column in 1..=self.mb_cols {
                self.read_macro_block_modes(self.mb_index(column, row))?;
            }
        }
        Ok(())
    }

    /// Decodes tokens and reconstructs every macroblock, row by row. Row
    /// `r` reads its tokens from partition `r % num_partitions`.
    #[instrument(level = "debug", skip_all, err)]
    pub fn reconstruct(&mut self) -> Result<()> {
        for row in 1..=self.mb_rows {
            let partition = (row - 1) % self.partitions.len();
            for column in 1..=self.mb_cols {
                let mb = self.mb_index(column, row);
                self.decode_macro_block(mb, partition)?;
                self.dequant_macro_block(mb)?;
            }
        }
        Ok(())
    }

    /// Runs both passes and copies the reconstructed samples out.
    pub fn decode(mut self) -> Result<DecodedFrame> {
        self.read_modes()?;
        self.reconstruct()?;
        let y = self.plane(PlaneType::Y1)?;
        let u = self.plane(PlaneType::U)?;
        let v = self.plane(PlaneType::V)?;
        Ok(DecodedFrame::new(self.header, y, u, v))
    }

    /// Gathers one plane of the real macroblocks into an image padded to
    /// whole macroblocks.
    fn plane(&self, plane: PlaneType) -> Result<Plane> {
        let block_size = plane.blocks_per_row() * 4;
        let mut out = Plane::new((self.mb_cols * block_size, self.mb_rows * block_size))?;
        for row in 1..=self.mb_rows {
            for column in 1..=self.mb_cols {
                let block = &self.macroblocks[self.mb_index(column, row)];
                debug_assert_eq!(block.state, DecodeState::Reconstructed);
                let origin = ((block.column - 1) * block_size, (block.row - 1) * block_size);
                let dim = plane.blocks_per_row();
                for index in 0..dim * dim {
                    let sub_block = block.sub_block(plane, index);
                    let pixels = sub_block.reconstructed.unwrap_or([0; 16]);
                    out.write_block(
                        (origin.0 + index % dim * 4, origin.1 + index / dim * 4),
                        &pixels,
                    );
                }
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entropy_coding::probabilities::COEFF_UPDATE_PROBS;
    use test_log::test;
    use vp8_test_utils::{BoolEncoder, KeyFrameWriter};

    fn payload(width: u16, height: u16) -> Vec<u8> {
        let writer = KeyFrameWriter::new(width, height);
        let mut enc = BoolEncoder::new();
        writer.write_header(&mut enc, &COEFF_UPDATE_PROBS);
        writer.assemble(&enc.finish(), &[vec![]])
    }

    #[test]
    fn grid_layout() -> Result<()> {
        let data = payload(40, 20);
        let frame = Frame::new(&data, &DecoderOptions::default())?;
        assert_eq!((frame.mb_cols, frame.mb_rows), (3, 2));
        assert_eq!(frame.macroblocks.len(), 5 * 4);
        for (i, mb) in frame.macroblocks.iter().enumerate() {
            assert_eq!(frame.mb_index(mb.column, mb.row), i);
            let border = mb.row == 0 || mb.row == 3 || mb.column == 0 || mb.column == 4;
            assert_eq!(border, mb.state == DecodeState::Reconstructed);
            if mb.row == 0 {
                assert_eq!(mb.y[0].pixel(0, 0), SENTINEL_ABOVE);
            } else if border {
                assert_eq!(mb.v[0].pixel(0, 0), SENTINEL_LEFT);
            }
        }
        Ok(())
    }

    #[test]
    fn neighbor_steps() -> Result<()> {
        let data = payload(32, 32);
        let frame = Frame::new(&data, &DecoderOptions::default())?;
        let mb = frame.mb_index(1, 1);
        assert_eq!(frame.relative_sub_block(mb, PlaneType::Y1, 5, 0, -1), (mb, 1));
        assert_eq!(frame.relative_sub_block(mb, PlaneType::Y1, 1, 0, -1), (mb - 4, 13));
        assert_eq!(frame.relative_sub_block(mb, PlaneType::Y1, 4, -1, 0), (mb - 1, 7));
        assert_eq!(frame.relative_sub_block(mb, PlaneType::Y1, 0, -1, -1), (mb - 5, 15));
        assert_eq!(frame.relative_sub_block(mb, PlaneType::U, 2, 1, -1), (mb, 1));
        assert_eq!(frame.relative_sub_block(mb, PlaneType::V, 1, 1, 0), (mb + 1, 0));
        Ok(())
    }

    #[test]
    fn first_macroblock_edges() -> Result<()> {
        let data = payload(32, 32);
        let frame = Frame::new(&data, &DecoderOptions::default())?;
        let edges = frame.block_edges::<16>(frame.mb_index(1, 1), PlaneType::Y1);
        assert_eq!(edges.above, [SENTINEL_ABOVE; 16]);
        assert_eq!(edges.left, [SENTINEL_LEFT; 16]);
        assert_eq!(edges.corner, SENTINEL_ABOVE);
        assert!(!edges.have_above && !edges.have_left);
        let dc = predict::predict_block(modes::LumaMode::Dc, &edges)?;
        assert_eq!(dc, [[128; 16]; 16]);

        let edges = frame.sub_block_edges(frame.mb_index(1, 1), 0);
        assert_eq!(edges.above, [SENTINEL_ABOVE; 8]);
        assert_eq!(edges.left, [SENTINEL_LEFT; 4]);
        assert_eq!(edges.corner, SENTINEL_ABOVE);
        // Rightmost macroblock of the top row reads above-right from the border.
        assert_eq!(frame.above_right_edge(frame.mb_index(2, 1), 3), [SENTINEL_ABOVE; 4]);
        Ok(())
    }

    #[test]
    fn pixel_limit() {
        let data = payload(1000, 1000);
        let options = DecoderOptions {
            max_pixels: Some(999_999),
        };
        assert!(matches!(
            Frame::new(&data, &options),
            Err(Error::ImageSizeTooLarge(1000, 1000))
        ));
        assert!(Frame::new(&data, &DecoderOptions { max_pixels: None }).is_ok());
    }
}
