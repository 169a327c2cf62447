// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use byteorder::{ByteOrder, LittleEndian};

use crate::{
    bool_decoder::BoolDecoder,
    entropy_coding::probabilities::{COEFF_UPDATE_PROBS, CoeffProbs},
    error::{Error, Result},
    util::tracing_wrappers::*,
};

use super::{LoopFilterParams, QuantIndices, Segmentation, Vp8Header};

/// Size of the frame tag, start code and dimensions preceding the first
/// partition of a key frame.
pub const UNCOMPRESSED_HEADER_SIZE: usize = 10;
pub const START_CODE: [u8; 3] = [0x9d, 0x01, 0x2a];
pub const MAX_PARTITIONS: usize = 8;
const DIMENSION_MASK: u16 = 0x3fff;

/// The 3-byte tag that starts every VP8 frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameTag {
    pub key_frame: bool,
    pub version: u8,
    pub show_frame: bool,
    pub first_partition_size: usize,
}

impl FrameTag {
    pub fn read(payload: &[u8]) -> Result<FrameTag> {
        if payload.len() < 3 {
            return Err(Error::TruncatedPayload);
        }
        let tag = LittleEndian::read_u24(payload);
        Ok(FrameTag {
            key_frame: tag & 1 == 0,
            version: ((tag >> 1) & 7) as u8,
            show_frame: (tag >> 4) & 1 != 0,
            first_partition_size: (tag >> 5) as usize,
        })
    }
}

/// Everything a key frame declares before its macroblock data.
#[derive(Debug, Clone)]
pub struct FrameHeader {
    pub tag: FrameTag,
    pub width: u16,
    pub horizontal_scale: u8,
    pub height: u16,
    pub vertical_scale: u8,
    pub color_space: bool,
    pub clamping_type: bool,
    pub segmentation: Segmentation,
    pub loop_filter: LoopFilterParams,
    pub num_partitions: usize,
    pub quant: QuantIndices,
    pub refresh_entropy_probs: bool,
    /// Probability that a macroblock has coefficients; `None` when the
    /// per-macroblock skip flag is not coded.
    pub prob_skip_false: Option<u8>,
}

impl FrameHeader {
    /// Parses the uncompressed chunk and the frame header in the first
    /// partition, applying coefficient probability updates to
    /// `coeff_probs`. Returns the first partition's decoder positioned at
    /// the per-macroblock modes.
    #[instrument(level = "debug", skip_all, err)]
    pub fn read<'a>(
        payload: &'a [u8],
        coeff_probs: &mut CoeffProbs,
    ) -> Result<(FrameHeader, BoolDecoder<'a>)> {
        let tag = FrameTag::read(payload)?;
        if !tag.key_frame {
            return Err(Error::UnsupportedFrameType);
        }
        if payload.len() < UNCOMPRESSED_HEADER_SIZE {
            return Err(Error::TruncatedPayload);
        }
        if payload[3..6] != START_CODE {
            return Err(Error::InvalidStartCode(payload[3], payload[4], payload[5]));
        }
        let width = LittleEndian::read_u16(&payload[6..8]);
        let height = LittleEndian::read_u16(&payload[8..10]);
        let (horizontal_scale, width) = ((width >> 14) as u8, width & DIMENSION_MASK);
        let (vertical_scale, height) = ((height >> 14) as u8, height & DIMENSION_MASK);
        if width == 0 || height == 0 {
            return Err(Error::InvalidImageSize(width as u32, height as u32));
        }

        let first_partition_end = UNCOMPRESSED_HEADER_SIZE + tag.first_partition_size;
        if first_partition_end > payload.len() {
            return Err(Error::MalformedPartitionTable {
                offset: UNCOMPRESSED_HEADER_SIZE,
                size: tag.first_partition_size,
                len: payload.len(),
            });
        }
        let mut bd = BoolDecoder::new(&payload[UNCOMPRESSED_HEADER_SIZE..first_partition_end])?;

        let color_space = bd.read_flag()?;
        let clamping_type = bd.read_flag()?;
        let segmentation = Segmentation::read(&mut bd)?;
        let loop_filter = LoopFilterParams::read(&mut bd)?;
        let num_partitions = 1 << bd.read_literal(2)?;
        let quant = QuantIndices::read(&mut bd)?;
        let refresh_entropy_probs = bd.read_flag()?;
        read_coeff_prob_updates(&mut bd, coeff_probs)?;
        let prob_skip_false = if bd.read_flag()? {
            Some(bd.read_literal(8)? as u8)
        } else {
            None
        };

        let header = FrameHeader {
            tag,
            width,
            horizontal_scale,
            height,
            vertical_scale,
            color_space,
            clamping_type,
            segmentation,
            loop_filter,
            num_partitions,
            quant,
            refresh_entropy_probs,
            prob_skip_false,
        };
        debug!(?header, header_bytes = bd.position());
        Ok((header, bd))
    }

    pub fn mb_cols(&self) -> usize {
        (self.width as usize).div_ceil(16)
    }

    pub fn mb_rows(&self) -> usize {
        (self.height as usize).div_ceil(16)
    }

    pub fn mb_no_coeff_skip(&self) -> bool {
        self.prob_skip_false.is_some()
    }

    /// Splits the data after the first partition into one decoder per token
    /// partition. All but the last partition size are stored as 3-byte
    /// little-endian values right after the first partition; the last
    /// partition takes the rest of the payload.
    pub fn token_partitions<'a>(&self, payload: &'a [u8]) -> Result<Vec<BoolDecoder<'a>>> {
        debug_assert!(self.num_partitions >= 1 && self.num_partitions <= MAX_PARTITIONS);
        let table_offset = UNCOMPRESSED_HEADER_SIZE + self.tag.first_partition_size;
        let table_size = 3 * (self.num_partitions - 1);
        let malformed = |offset, size| Error::MalformedPartitionTable {
            offset,
            size,
            len: payload.len(),
        };
        if table_offset + table_size > payload.len() {
            return Err(malformed(table_offset, table_size));
        }
        let sizes = &payload[table_offset..table_offset + table_size];

        let mut partitions = Vec::with_capacity(self.num_partitions);
        let mut offset = table_offset + table_size;
        for i in 0..self.num_partitions {
            let size = if i + 1 < self.num_partitions {
                LittleEndian::read_u24(&sizes[3 * i..]) as usize
            } else {
                payload.len() - offset
            };
            if size > payload.len() - offset {
                return Err(malformed(offset, size));
            }
            trace!(partition = i, offset, size);
            partitions.push(BoolDecoder::new(&payload[offset..offset + size])?);
            offset += size;
        }
        Ok(partitions)
    }
}

/// Reads the per-entry update flags of the coefficient probabilities and
/// replaces the entries that are updated.
fn read_coeff_prob_updates(bd: &mut BoolDecoder, coeff_probs: &mut CoeffProbs) -> Result<()> {
    #[cfg_attr(not(feature = "tracing"), allow(unused))]
    let mut updates = 0;
    for (probs, update_probs) in coeff_probs
        .as_flattened_mut()
        .as_flattened_mut()
        .iter_mut()
        .zip(COEFF_UPDATE_PROBS.as_flattened().as_flattened())
    {
        for (prob, &update_prob) in probs.iter_mut().zip(update_probs) {
            if bd.read_bool(update_prob)? {
                *prob = bd.read_literal(8)? as u8;
                updates += 1;
            }
        }
    }
    debug!(updates, "coefficient probability updates");
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entropy_coding::probabilities::DEFAULT_COEFF_PROBS;
    use test_log::test;
    use vp8_test_utils::{BoolEncoder, KeyFrameWriter, SegmentationParams};

    fn encode(writer: &KeyFrameWriter) -> Vec<u8> {
        let mut enc = BoolEncoder::new();
        writer.write_header(&mut enc, &COEFF_UPDATE_PROBS);
        let first = enc.finish();
        let partitions = vec![vec![0u8; 4]; 1 << writer.log2_partitions];
        writer.assemble(&first, &partitions)
    }

    #[test]
    fn frame_tag() -> Result<()> {
        // Key frame, version 2, shown, first partition of 0x1234 bytes.
        let tag = (0x1234 << 5) | (1 << 4) | (2 << 1);
        let bytes = [tag as u8, (tag >> 8) as u8, (tag >> 16) as u8];
        let tag = FrameTag::read(&bytes)?;
        assert!(tag.key_frame);
        assert_eq!(tag.version, 2);
        assert!(tag.show_frame);
        assert_eq!(tag.first_partition_size, 0x1234);
        Ok(())
    }

    #[test]
    fn inter_frame_rejected() {
        let mut payload = encode(&KeyFrameWriter::new(16, 16));
        payload[0] |= 1;
        let mut probs = DEFAULT_COEFF_PROBS;
        assert!(matches!(
            FrameHeader::read(&payload, &mut probs),
            Err(Error::UnsupportedFrameType)
        ));
        // Rejected from the tag alone.
        assert!(matches!(
            FrameHeader::read(&payload[..3], &mut probs),
            Err(Error::UnsupportedFrameType)
        ));
    }

    #[test]
    fn truncated_and_bad_start_code() {
        let payload = encode(&KeyFrameWriter::new(16, 16));
        let mut probs = DEFAULT_COEFF_PROBS;
        for len in 0..UNCOMPRESSED_HEADER_SIZE {
            assert!(matches!(
                FrameHeader::read(&payload[..len], &mut probs),
                Err(Error::TruncatedPayload)
            ));
        }
        let mut bad = payload.clone();
        bad[4] = 0x02;
        assert!(matches!(
            FrameHeader::read(&bad, &mut probs),
            Err(Error::InvalidStartCode(0x9d, 0x02, 0x2a))
        ));
    }

    #[test]
    fn zero_dimension_rejected() {
        let payload = encode(&KeyFrameWriter::new(0, 16));
        let mut probs = DEFAULT_COEFF_PROBS;
        assert!(matches!(
            FrameHeader::read(&payload, &mut probs),
            Err(Error::InvalidImageSize(0, 16))
        ));
    }

    #[test]
    fn first_partition_overrun() {
        let mut payload = encode(&KeyFrameWriter::new(16, 16));
        let oversized = (payload.len() as u32) << 5;
        payload[0] = oversized as u8;
        payload[1] = (oversized >> 8) as u8;
        payload[2] = (oversized >> 16) as u8;
        let mut probs = DEFAULT_COEFF_PROBS;
        assert!(matches!(
            FrameHeader::read(&payload, &mut probs),
            Err(Error::MalformedPartitionTable { offset: 10, .. })
        ));
    }

    #[test]
    fn all_fields_round_trip() -> Result<()> {
        let mut writer = KeyFrameWriter::new(1000, 333);
        writer.horizontal_scale = 1;
        writer.vertical_scale = 3;
        writer.clamping_type = true;
        writer.segmentation = Some(SegmentationParams {
            update_map: true,
            data: Some((true, [10, -20, 0, 127], [-63, 0, 5, 1])),
            tree_probs: [Some(1), None, Some(200)],
        });
        writer.filter_type = true;
        writer.filter_level = 42;
        writer.sharpness = 5;
        writer.loop_filter_deltas = Some(([1, -2, 3, -4], [0, 63, -63, 7]));
        writer.log2_partitions = 2;
        writer.q_index = 99;
        writer.q_deltas = [1, -2, 15, -15, 0];
        writer.refresh_entropy_probs = true;
        writer.coeff_updates = vec![(0, 1, 0, 0, 17), (3, 7, 2, 10, 250)];
        writer.prob_skip_false = Some(77);
        let payload = encode(&writer);

        let mut probs = DEFAULT_COEFF_PROBS;
        let (header, _) = FrameHeader::read(&payload, &mut probs)?;
        assert_eq!((header.width, header.height), (1000, 333));
        assert_eq!((header.horizontal_scale, header.vertical_scale), (1, 3));
        assert_eq!((header.mb_cols(), header.mb_rows()), (63, 21));
        assert!(!header.color_space);
        assert!(header.clamping_type);
        let seg = &header.segmentation;
        assert!(seg.enabled && seg.update_map && seg.update_data && seg.absolute_values);
        assert_eq!(seg.quantizer, [10, -20, 0, 127]);
        assert_eq!(seg.loop_filter_level, [-63, 0, 5, 1]);
        assert_eq!(seg.tree_probs, [1, 255, 200]);
        let lf = &header.loop_filter;
        assert_eq!(lf.filter_type, super::super::FilterType::Simple);
        assert_eq!((lf.level, lf.sharpness), (42, 5));
        assert!(lf.deltas_enabled && lf.deltas_updated);
        assert_eq!(lf.ref_deltas, [1, -2, 3, -4]);
        assert_eq!(lf.mode_deltas, [0, 63, -63, 7]);
        assert_eq!(header.num_partitions, 4);
        assert_eq!(
            header.quant,
            QuantIndices {
                y_ac_index: 99,
                y1_dc_delta: 1,
                y2_dc_delta: -2,
                y2_ac_delta: 15,
                uv_dc_delta: -15,
                uv_ac_delta: 0,
            }
        );
        assert!(header.refresh_entropy_probs);
        assert_eq!(header.prob_skip_false, Some(77));

        let mut expected = DEFAULT_COEFF_PROBS;
        expected[0][1][0][0] = 17;
        expected[3][7][2][10] = 250;
        assert_eq!(probs, expected);

        assert_eq!(header.token_partitions(&payload)?.len(), 4);
        Ok(())
    }

    #[test]
    fn partition_sizes() -> Result<()> {
        let mut writer = KeyFrameWriter::new(16, 64);
        writer.log2_partitions = 1;
        let mut enc = BoolEncoder::new();
        writer.write_header(&mut enc, &COEFF_UPDATE_PROBS);
        let first = enc.finish();
        let payload = writer.assemble(&first, &[vec![1, 2, 3], vec![4, 5]]);
        let mut probs = DEFAULT_COEFF_PROBS;
        let (header, _) = FrameHeader::read(&payload, &mut probs)?;
        let partitions = header.token_partitions(&payload)?;
        assert_eq!(partitions.len(), 2);

        // Declare a first token partition longer than what follows it.
        let mut bad = payload.clone();
        let table = UNCOMPRESSED_HEADER_SIZE + first.len();
        bad[table] = 200;
        assert!(matches!(
            header.token_partitions(&bad),
            Err(Error::MalformedPartitionTable { size: 200, .. })
        ));

        // Cut the payload inside the size table.
        assert!(matches!(
            header.token_partitions(&payload[..table + 2]),
            Err(Error::MalformedPartitionTable { size: 3, .. })
        ));
        Ok(())
    }

    #[test]
    fn coefficient_updates_only_touch_flagged_entries() -> Result<()> {
        let mut writer = KeyFrameWriter::new(16, 16);
        writer.coeff_updates = vec![(2, 0, 1, 3, 1), (2, 0, 1, 4, 255)];
        let payload = encode(&writer);
        let mut probs = DEFAULT_COEFF_PROBS;
        FrameHeader::read(&payload, &mut probs)?;
        let mut expected = DEFAULT_COEFF_PROBS;
        expected[2][0][1][3] = 1;
        expected[2][0][1][4] = 255;
        assert_eq!(probs, expected);
        Ok(())
    }
}
