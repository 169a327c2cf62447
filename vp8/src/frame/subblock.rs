// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use vp8_transforms::{idct4x4, iwht4x4};

use crate::{
    bool_decoder::BoolDecoder,
    entropy_coding::{
        probabilities::CoeffProbs,
        tokens::*,
        tree::COEFF_TOKEN_TREE,
    },
    error::Result,
};

use super::modes::IntraMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneType {
    /// Luma.
    Y1,
    /// Second-order luma DC block.
    Y2,
    U,
    V,
}

impl PlaneType {
    /// Sub-blocks per row of a macroblock in this plane.
    pub fn blocks_per_row(self) -> usize {
        match self {
            PlaneType::Y1 => 4,
            PlaneType::U | PlaneType::V => 2,
            PlaneType::Y2 => 1,
        }
    }
}

/// One 4x4 block of a macroblock. All arrays are in raster order.
#[derive(Debug, Clone)]
pub struct SubBlock {
    pub tokens: [i32; 16],
    pub residual: Option<[i32; 16]>,
    pub predicted: Option<[u8; 16]>,
    pub reconstructed: Option<[u8; 16]>,
    pub mode: IntraMode,
    pub plane: PlaneType,
}

impl SubBlock {
    pub fn new(plane: PlaneType) -> SubBlock {
        SubBlock {
            tokens: [0; 16],
            residual: None,
            predicted: None,
            reconstructed: None,
            mode: IntraMode::Dc,
            plane,
        }
    }

    /// A border block whose samples are all `fill`.
    pub fn sentinel(plane: PlaneType, fill: u8) -> SubBlock {
        SubBlock {
            reconstructed: Some([fill; 16]),
            ..SubBlock::new(plane)
        }
    }

    /// Reads the coefficient tokens of this block. `context` is the number
    /// of neighboring blocks (left and above) with a nonzero token. With
    /// `with_y2` the DC position is skipped, since it is carried by the Y2
    /// block.
    pub fn decode_tokens(
        &mut self,
        bd: &mut BoolDecoder,
        coeff_probs: &CoeffProbs,
        context: usize,
        block_type: BlockType,
        with_y2: bool,
    ) -> Result<()> {
        debug_assert!(context <= 2);
        let probs = &coeff_probs[block_type as usize];
        let mut context = context;
        let mut skip_branches = 0;
        for i in (with_y2 as usize)..16 {
            let token = bd.read_tree(
                &COEFF_TOKEN_TREE,
                &probs[COEFF_BANDS[i]][context],
                skip_branches,
            )? as i8;
            let magnitude = match token {
                DCT_EOB => break,
                DCT_0 => {
                    // EOB cannot directly follow a zero.
                    context = 0;
                    skip_branches = 1;
                    continue;
                }
                DCT_1..=DCT_4 => token as i32,
                _ => {
                    let category = (token - DCT_CAT1) as usize;
                    DCT_CAT_BASE[category] + dct_extra(bd, &PROB_DCT_CAT[category])?
                }
            };
            context = if magnitude == 1 { 1 } else { 2 };
            skip_branches = 0;
            self.tokens[ZIGZAG[i]] = if bd.read_bit()? {
                -magnitude
            } else {
                magnitude
            };
        }
        Ok(())
    }

    pub fn has_nonzero_token(&self) -> bool {
        self.tokens.iter().any(|&t| t != 0)
    }

    /// Scales the tokens by `factors` (`[dc, ac]`) and inverse transforms
    /// them into the residual. `external_dc` replaces the scaled DC token
    /// for luma blocks whose DC comes from the Y2 block.
    pub fn dequantize(&mut self, factors: [i32; 2], external_dc: Option<i32>) -> [i32; 16] {
        let mut coeffs: [i32; 16] =
            std::array::from_fn(|i| self.tokens[i] * factors[(i != 0) as usize]);
        if let Some(dc) = external_dc {
            coeffs[0] = dc;
        }
        match self.plane {
            PlaneType::Y2 => iwht4x4(&mut coeffs),
            _ => idct4x4(&mut coeffs),
        }
        self.residual = Some(coeffs);
        coeffs
    }

    /// Adds the residual to `predicted`, saturating to 8 bits. A block
    /// without residual reconstructs to its prediction.
    pub fn reconstruct(&mut self, predicted: [u8; 16]) {
        let residual = self.residual.unwrap_or([0; 16]);
        self.predicted = Some(predicted);
        self.reconstructed = Some(std::array::from_fn(|i| {
            (residual[i] + predicted[i] as i32).clamp(0, 255) as u8
        }));
    }

    /// Reconstructed sample at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        debug_assert!(self.reconstructed.is_some(), "{:?} not reconstructed", self.plane);
        self.reconstructed.map_or(0, |r| r[y * 4 + x])
    }

    pub fn bottom_row(&self) -> [u8; 4] {
        std::array::from_fn(|x| self.pixel(x, 3))
    }

    pub fn right_column(&self) -> [u8; 4] {
        std::array::from_fn(|y| self.pixel(3, y))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::entropy_coding::probabilities::DEFAULT_COEFF_PROBS;
    use arbtest::arbtest;
    use rand::{Rng, SeedableRng};
    use rand_xorshift::XorShiftRng;
    use test_log::test;
    use vp8_test_utils::BoolEncoder;

    /// Encodes `values` (in scan order) as a token sequence with the given
    /// starting context, ending with EOB unless all 16 positions are used.
    fn encode_tokens(
        enc: &mut BoolEncoder,
        probs: &CoeffProbs,
        block_type: BlockType,
        first: usize,
        context: usize,
        values: &[i32],
    ) {
        let probs = &probs[block_type as usize];
        let tree = COEFF_TOKEN_TREE.nodes();
        let mut context = context;
        let mut skip = 0;
        let mut last = values.len();
        while last > 0 && values[last - 1] == 0 {
            last -= 1;
        }
        for (i, &v) in values[..last].iter().enumerate() {
            let pos = first + i;
            let p = &probs[COEFF_BANDS[pos]][context];
            let magnitude = v.unsigned_abs() as i32;
            if magnitude == 0 {
                enc.write_tree(tree, p, DCT_0 as u8, skip);
                context = 0;
                skip = 1;
                continue;
            }
            if magnitude <= 4 {
                enc.write_tree(tree, p, magnitude as u8, skip);
            } else {
                let category = DCT_CAT_BASE.iter().rposition(|&b| b <= magnitude).unwrap();
                enc.write_tree(tree, p, (DCT_CAT1 as usize + category) as u8, skip);
                let extra = magnitude - DCT_CAT_BASE[category];
                let bits: Vec<u8> = PROB_DCT_CAT[category]
                    .iter()
                    .copied()
                    .take_while(|&p| p != 0)
                    .collect();
                for (j, &prob) in bits.iter().enumerate() {
                    enc.write_bool((extra >> (bits.len() - 1 - j)) & 1 != 0, prob);
                }
            }
            enc.write_bit(v < 0);
            context = if magnitude == 1 { 1 } else { 2 };
            skip = 0;
        }
        if first + last < 16 {
            enc.write_tree(tree, &probs[COEFF_BANDS[first + last]][context], DCT_EOB as u8, skip);
        }
    }

    #[test]
    fn tokens_land_in_zigzag_order() -> Result<()> {
        let values = [3, 0, -1, 0, 0, 70, -2000];
        let mut enc = BoolEncoder::new();
        encode_tokens(&mut enc, &DEFAULT_COEFF_PROBS, BlockType::YWithDc, 0, 1, &values);
        let data = enc.finish();
        let mut bd = BoolDecoder::new(&data)?;
        let mut block = SubBlock::new(PlaneType::Y1);
        block.decode_tokens(&mut bd, &DEFAULT_COEFF_PROBS, 1, BlockType::YWithDc, false)?;
        let mut expected = [0; 16];
        for (i, &v) in values.iter().enumerate() {
            expected[ZIGZAG[i]] = v;
        }
        assert_eq!(block.tokens, expected);
        assert!(block.has_nonzero_token());
        Ok(())
    }

    #[test]
    fn y2_skips_dc_position() -> Result<()> {
        let mut enc = BoolEncoder::new();
        encode_tokens(&mut enc, &DEFAULT_COEFF_PROBS, BlockType::YAfterY2, 1, 0, &[5]);
        let data = enc.finish();
        let mut bd = BoolDecoder::new(&data)?;
        let mut block = SubBlock::new(PlaneType::Y1);
        block.decode_tokens(&mut bd, &DEFAULT_COEFF_PROBS, 0, BlockType::YAfterY2, true)?;
        assert_eq!(block.tokens[0], 0);
        assert_eq!(block.tokens[ZIGZAG[1]], 5);
        Ok(())
    }

    #[test]
    fn immediate_eob_is_empty() -> Result<()> {
        let mut enc = BoolEncoder::new();
        encode_tokens(&mut enc, &DEFAULT_COEFF_PROBS, BlockType::Chroma, 0, 2, &[]);
        let data = enc.finish();
        let mut bd = BoolDecoder::new(&data)?;
        let mut block = SubBlock::new(PlaneType::U);
        block.decode_tokens(&mut bd, &DEFAULT_COEFF_PROBS, 2, BlockType::Chroma, false)?;
        assert!(!block.has_nonzero_token());
        Ok(())
    }

    #[test]
    fn full_block_without_eob() -> Result<()> {
        let values: Vec<i32> = (1..=16).map(|v| if v % 2 == 0 { -v } else { v }).collect();
        let mut enc = BoolEncoder::new();
        encode_tokens(&mut enc, &DEFAULT_COEFF_PROBS, BlockType::YWithDc, 0, 0, &values);
        let data = enc.finish();
        let mut bd = BoolDecoder::new(&data)?;
        let mut block = SubBlock::new(PlaneType::Y1);
        block.decode_tokens(&mut bd, &DEFAULT_COEFF_PROBS, 0, BlockType::YWithDc, false)?;
        for (i, &v) in values.iter().enumerate() {
            assert_eq!(block.tokens[ZIGZAG[i]], v);
        }
        Ok(())
    }

    #[test]
    fn random_block_sequence() -> Result<()> {
        let mut rng = XorShiftRng::seed_from_u64(0);
        let blocks: Vec<Vec<i32>> = (0..64)
            .map(|_| {
                let len = rng.random_range(0..=16);
                (0..len)
                    .map(|_| match rng.random_range(0..4) {
                        0 => 0,
                        1 => rng.random_range(-4..=4),
                        _ => rng.random_range(-2048..=2048),
                    })
                    .collect()
            })
            .collect();

        let mut enc = BoolEncoder::new();
        for (i, values) in blocks.iter().enumerate() {
            encode_tokens(&mut enc, &DEFAULT_COEFF_PROBS, BlockType::Chroma, 0, i % 3, values);
        }
        let data = enc.finish();
        let mut bd = BoolDecoder::new(&data)?;
        for (i, values) in blocks.iter().enumerate() {
            let mut block = SubBlock::new(PlaneType::V);
            block.decode_tokens(&mut bd, &DEFAULT_COEFF_PROBS, i % 3, BlockType::Chroma, false)?;
            let mut expected = [0; 16];
            for (j, &v) in values.iter().enumerate() {
                expected[ZIGZAG[j]] = v;
            }
            assert_eq!(block.tokens, expected, "block {i}");
        }
        Ok(())
    }

    #[test]
    fn dequantize_dc_only() {
        let mut block = SubBlock::new(PlaneType::Y1);
        block.tokens[0] = 2;
        assert_eq!(block.dequantize([20, 30], None), [5; 16]);
        assert_eq!(block.dequantize([20, 30], Some(-80)), [-10; 16]);

        let mut y2 = SubBlock::new(PlaneType::Y2);
        y2.tokens[0] = 2;
        // (2 * 157 * 2 + 3) >> 3
        assert_eq!(y2.dequantize([314, 434], None), [78; 16]);
    }

    #[test]
    fn reconstruction_clamps() {
        arbtest(|u| {
            let mut block = SubBlock::new(PlaneType::Y1);
            for t in block.tokens.iter_mut() {
                *t = u.int_in_range(-2048..=2048)?;
            }
            let factors = [u.int_in_range(4..=314)?, u.int_in_range(4..=440)?];
            let residual = block.dequantize(factors, None);
            let predicted: [u8; 16] = u.arbitrary()?;
            block.reconstruct(predicted);
            let reconstructed = block.reconstructed.unwrap();
            for i in 0..16 {
                let expected = (residual[i] + predicted[i] as i32).clamp(0, 255);
                assert_eq!(reconstructed[i] as i32, expected);
            }
            Ok(())
        });
    }

    #[test]
    fn edges() {
        let mut block = SubBlock::new(PlaneType::Y1);
        block.reconstruct(std::array::from_fn(|i| i as u8));
        assert_eq!(block.bottom_row(), [12, 13, 14, 15]);
        assert_eq!(block.right_column(), [3, 7, 11, 15]);
        assert_eq!(SubBlock::sentinel(PlaneType::U, 129).pixel(2, 1), 129);
    }
}
