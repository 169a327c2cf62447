// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Helpers for producing VP8 bitstreams in tests.
//!
//! [`BoolEncoder`] is the boolean entropy encoder of RFC 6386 section 7.3 and
//! [`KeyFrameWriter`] assembles the uncompressed chunk and partitions of a
//! key frame around data written with it.

use byteorder::{ByteOrder, LittleEndian};

pub type CoeffProbs = [[[[u8; 11]; 3]; 8]; 4];

/// Arithmetic encoder producing bytes that a VP8 boolean decoder reads back.
#[derive(Debug, Clone)]
pub struct BoolEncoder {
    output: Vec<u8>,
    range: u32,
    bottom: u32,
    bit_count: i32,
}

impl Default for BoolEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl BoolEncoder {
    pub fn new() -> Self {
        BoolEncoder {
            output: Vec::new(),
            range: 255,
            bottom: 0,
            bit_count: 24,
        }
    }

    fn add_one_to_output(&mut self) {
        for byte in self.output.iter_mut().rev() {
            if *byte == 255 {
                *byte = 0;
            } else {
                *byte += 1;
                return;
            }
        }
    }

    pub fn write_bool(&mut self, bit: bool, probability: u8) {
        let split = 1 + (((self.range - 1) * probability as u32) >> 8);
        if bit {
            self.bottom = self.bottom.wrapping_add(split);
            self.range -= split;
        } else {
            self.range = split;
        }
        while self.range < 128 {
            self.range <<= 1;
            if self.bottom & (1 << 31) != 0 {
                self.add_one_to_output();
            }
            self.bottom <<= 1;
            self.bit_count -= 1;
            if self.bit_count == 0 {
                self.output.push((self.bottom >> 24) as u8);
                self.bottom &= (1 << 24) - 1;
                self.bit_count = 8;
            }
        }
    }

    pub fn write_bit(&mut self, bit: bool) {
        self.write_bool(bit, 128);
    }

    /// Writes the `num_bits` low bits of `value`, most significant first.
    pub fn write_literal(&mut self, value: u32, num_bits: usize) {
        for bit in (0..num_bits).rev() {
            self.write_bit((value >> bit) & 1 != 0);
        }
    }

    /// Flag, then magnitude and sign when `value` is nonzero.
    pub fn write_optional_signed(&mut self, value: i32, num_bits: usize) {
        self.write_bit(value != 0);
        if value != 0 {
            self.write_literal(value.unsigned_abs(), num_bits);
            self.write_bit(value < 0);
        }
    }

    /// Writes the branch decisions leading to `symbol` in a flat signed-index
    /// tree, starting at node `2 * skip_branches`.
    ///
    /// Panics if the symbol is not reachable.
    pub fn write_tree(&mut self, tree: &[i8], probs: &[u8], symbol: u8, skip_branches: usize) {
        let mut path = Vec::new();
        assert!(
            find_path(tree, 2 * skip_branches, symbol, &mut path),
            "symbol {symbol} not in tree"
        );
        for (node, bit) in path {
            self.write_bool(bit, probs[node >> 1]);
        }
    }

    /// Flushes the pending bits and returns the encoded bytes.
    pub fn finish(mut self) -> Vec<u8> {
        let mut c = self.bit_count;
        let mut v = self.bottom;
        if v & (1 << (32 - c)) != 0 {
            self.add_one_to_output();
        }
        v <<= c & 7;
        c >>= 3;
        while c > 0 {
            v <<= 8;
            c -= 1;
        }
        for _ in 0..4 {
            self.output.push((v >> 24) as u8);
            v <<= 8;
        }
        self.output
    }
}

fn find_path(tree: &[i8], node: usize, symbol: u8, path: &mut Vec<(usize, bool)>) -> bool {
    for bit in [false, true] {
        let entry = tree[node + bit as usize];
        path.push((node, bit));
        if entry <= 0 {
            if -(entry as i32) == symbol as i32 {
                return true;
            }
        } else if find_path(tree, entry as usize, symbol, path) {
            return true;
        }
        path.pop();
    }
    false
}

/// Segmentation fields of the compressed header.
#[derive(Debug, Clone, Default)]
pub struct SegmentationParams {
    pub update_map: bool,
    /// `(absolute, quantizer, loop filter level)` when segment data is sent.
    pub data: Option<(bool, [i8; 4], [i8; 4])>,
    pub tree_probs: [Option<u8>; 3],
}

/// Header fields of a key frame, written in bitstream order.
#[derive(Debug, Clone)]
pub struct KeyFrameWriter {
    pub width: u16,
    pub height: u16,
    pub horizontal_scale: u8,
    pub vertical_scale: u8,
    pub color_space: bool,
    pub clamping_type: bool,
    pub segmentation: Option<SegmentationParams>,
    pub filter_type: bool,
    pub filter_level: u8,
    pub sharpness: u8,
    /// `(ref deltas, mode deltas)` when the deltas are enabled and updated.
    pub loop_filter_deltas: Option<([i8; 4], [i8; 4])>,
    pub log2_partitions: u8,
    pub q_index: u8,
    /// y1dc, y2dc, y2ac, uvdc, uvac.
    pub q_deltas: [i8; 5],
    pub refresh_entropy_probs: bool,
    /// `(block type, band, context, node, new value)` updates.
    pub coeff_updates: Vec<(usize, usize, usize, usize, u8)>,
    pub prob_skip_false: Option<u8>,
}

impl KeyFrameWriter {
    pub fn new(width: u16, height: u16) -> Self {
        KeyFrameWriter {
            width,
            height,
            horizontal_scale: 0,
            vertical_scale: 0,
            color_space: false,
            clamping_type: false,
            segmentation: None,
            filter_type: false,
            filter_level: 0,
            sharpness: 0,
            loop_filter_deltas: None,
            log2_partitions: 0,
            q_index: 0,
            q_deltas: [0; 5],
            refresh_entropy_probs: false,
            coeff_updates: Vec::new(),
            prob_skip_false: None,
        }
    }

    /// Writes the compressed frame header into the first partition.
    /// `update_probs` must be the decoder's coefficient update probabilities.
    pub fn write_header(&self, enc: &mut BoolEncoder, update_probs: &CoeffProbs) {
        enc.write_bit(self.color_space);
        enc.write_bit(self.clamping_type);
        enc.write_bit(self.segmentation.is_some());
        if let Some(segmentation) = &self.segmentation {
            enc.write_bit(segmentation.update_map);
            enc.write_bit(segmentation.data.is_some());
            if let Some((absolute, quantizer, filter_level)) = segmentation.data {
                enc.write_bit(absolute);
                for q in quantizer {
                    enc.write_optional_signed(q as i32, 7);
                }
                for lf in filter_level {
                    enc.write_optional_signed(lf as i32, 6);
                }
            }
            if segmentation.update_map {
                for prob in segmentation.tree_probs {
                    enc.write_bit(prob.is_some());
                    if let Some(prob) = prob {
                        enc.write_literal(prob as u32, 8);
                    }
                }
            }
        }
        enc.write_bit(self.filter_type);
        enc.write_literal(self.filter_level as u32, 6);
        enc.write_literal(self.sharpness as u32, 3);
        enc.write_bit(self.loop_filter_deltas.is_some());
        if let Some((ref_deltas, mode_deltas)) = self.loop_filter_deltas {
            enc.write_bit(true);
            for delta in ref_deltas.into_iter().chain(mode_deltas) {
                enc.write_optional_signed(delta as i32, 6);
            }
        }
        enc.write_literal(self.log2_partitions as u32, 2);
        enc.write_literal(self.q_index as u32, 7);
        for delta in self.q_deltas {
            enc.write_optional_signed(delta as i32, 4);
        }
        enc.write_bit(self.refresh_entropy_probs);
        for (t, bands) in update_probs.iter().enumerate() {
            for (b, contexts) in bands.iter().enumerate() {
                for (c, nodes) in contexts.iter().enumerate() {
                    for (n, &prob) in nodes.iter().enumerate() {
                        let update = self
                            .coeff_updates
                            .iter()
                            .find(|u| (u.0, u.1, u.2, u.3) == (t, b, c, n));
                        enc.write_bool(update.is_some(), prob);
                        if let Some(update) = update {
                            enc.write_literal(update.4 as u32, 8);
                        }
                    }
                }
            }
        }
        enc.write_bit(self.prob_skip_false.is_some());
        if let Some(prob) = self.prob_skip_false {
            enc.write_literal(prob as u32, 8);
        }
    }

    /// Builds the full payload: frame tag, start code, dimensions, the first
    /// partition, the partition size table and the token partitions.
    pub fn assemble(&self, first_partition: &[u8], token_partitions: &[Vec<u8>]) -> Vec<u8> {
        assert_eq!(token_partitions.len(), 1 << self.log2_partitions);
        let mut out = vec![0u8; 10];
        let tag = (first_partition.len() as u32) << 5 | 1 << 4;
        LittleEndian::write_u24(&mut out[0..3], tag);
        out[3..6].copy_from_slice(&[0x9d, 0x01, 0x2a]);
        LittleEndian::write_u16(
            &mut out[6..8],
            self.width | (self.horizontal_scale as u16) << 14,
        );
        LittleEndian::write_u16(
            &mut out[8..10],
            self.height | (self.vertical_scale as u16) << 14,
        );
        out.extend_from_slice(first_partition);
        for partition in &token_partitions[..token_partitions.len() - 1] {
            let mut size = [0u8; 3];
            LittleEndian::write_u24(&mut size, partition.len() as u32);
            out.extend_from_slice(&size);
        }
        for partition in token_partitions {
            out.extend_from_slice(partition);
        }
        out
    }
}
