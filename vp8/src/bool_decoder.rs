// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::fmt::Debug;

use crate::{
    entropy_coding::tree::Tree,
    error::{Error, Result},
};

/// Number of zero bytes a decoder may shift in past the end of its buffer
/// before further reads fail. Encoders flush fewer bytes than the decoder's
/// look-ahead, so a well-formed partition can be read slightly past its end.
pub const MAX_PADDING_BYTES: usize = 8;

/// Left shift that brings a range in `1..=255` back into `128..=255`.
const NORM: [u8; 256] = {
    let mut norm = [0u8; 256];
    let mut range = 1;
    while range < 256 {
        norm[range] = (range as u8).leading_zeros() as u8;
        range += 1;
    }
    norm
};

/// Boolean entropy decoder (RFC 6386, section 7).
#[derive(Clone)]
pub struct BoolDecoder<'a> {
    data: &'a [u8],
    position: usize,
    value: u32,
    range: u32,
    bit_count: i32,
    padding: usize,
}

impl Debug for BoolDecoder<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BoolDecoder{{ data: [{} bytes], position: {}, value: {:04x}, range: {}, bit_count: {} }}",
            self.data.len(),
            self.position,
            self.value,
            self.range,
            self.bit_count,
        )
    }
}

impl<'a> BoolDecoder<'a> {
    /// Constructs a BoolDecoder over one partition.
    pub fn new(data: &'a [u8]) -> Result<BoolDecoder<'a>> {
        let mut decoder = BoolDecoder {
            data,
            position: 0,
            value: 0,
            range: 255,
            bit_count: 0,
            padding: 0,
        };
        decoder.value = decoder.next_byte()? << 8;
        Ok(decoder)
    }

    fn next_byte(&mut self) -> Result<u32> {
        match self.data.get(self.position) {
            Some(&byte) => {
                self.position += 1;
                Ok(byte as u32)
            }
            None if self.padding < MAX_PADDING_BYTES => {
                self.padding += 1;
                Ok(0)
            }
            None => Err(Error::TruncatedPayload),
        }
    }

    /// Reads one bit that is 0 with probability `probability / 256`.
    /// ```
    /// # use vp8::bool_decoder::BoolDecoder;
    /// let mut bd = BoolDecoder::new(&[0, 0])?;
    /// assert!(!bd.read_bool(1)?);
    /// assert_eq!(bd.range(), 128);
    /// # Ok::<(), vp8::error::Error>(())
    /// ```
    pub fn read_bool(&mut self, probability: u8) -> Result<bool> {
        let split = 1 + (((self.range - 1) * probability as u32) >> 8);
        let big_split = split << 8;
        let bit = if self.value >= big_split {
            self.range -= split;
            self.value -= big_split;
            true
        } else {
            self.range = split;
            false
        };
        let shift = NORM[self.range as usize];
        self.range <<= shift;
        self.value <<= shift;
        self.bit_count -= shift as i32;
        if self.bit_count <= 0 {
            self.value |= self.next_byte()? << -self.bit_count;
            self.bit_count += 8;
        }
        debug_assert!((128..=255).contains(&self.range));
        Ok(bit)
    }

    pub fn read_bit(&mut self) -> Result<bool> {
        self.read_bool(128)
    }

    /// Same as [`Self::read_bit`]; names a one-bit header field.
    pub fn read_flag(&mut self) -> Result<bool> {
        self.read_bit()
    }

    /// Reads an unsigned `num_bits` value, most significant bit first.
    /// ```
    /// # use vp8::bool_decoder::BoolDecoder;
    /// let mut bd = BoolDecoder::new(&[0x5f, 0, 0])?;
    /// assert_eq!(bd.read_literal(2)?, 1);
    /// # Ok::<(), vp8::error::Error>(())
    /// ```
    pub fn read_literal(&mut self, num_bits: usize) -> Result<u32> {
        debug_assert!(num_bits <= 32);
        let mut value = 0;
        for _ in 0..num_bits {
            value = (value << 1) | self.read_bit()? as u32;
        }
        Ok(value)
    }

    /// Reads a flag and, if set, a `num_bits` magnitude followed by a sign bit.
    /// Returns 0 when the flag is unset.
    pub fn read_optional_signed(&mut self, num_bits: usize) -> Result<i32> {
        if !self.read_flag()? {
            return Ok(0);
        }
        let magnitude = self.read_literal(num_bits)? as i32;
        Ok(if self.read_bit()? { -magnitude } else { magnitude })
    }

    /// Walks `tree` from node `2 * skip_branches` and returns the leaf symbol.
    pub fn read_tree(&mut self, tree: &Tree, probs: &[u8], skip_branches: usize) -> Result<u8> {
        tree.walk_from(self, probs, skip_branches)
    }

    /// Current range; `1..=255` between calls.
    pub fn range(&self) -> u32 {
        self.range
    }

    /// Bytes consumed from the buffer so far.
    pub fn position(&self) -> usize {
        self.position
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use arbtest::arbtest;
    use test_log::test;
    use vp8_test_utils::BoolEncoder;

    #[test]
    fn norm_table() {
        assert_eq!(NORM[1], 7);
        assert_eq!(NORM[2], 6);
        assert_eq!(NORM[127], 1);
        assert_eq!(NORM[128], 0);
        assert_eq!(NORM[255], 0);
    }

    #[test]
    fn literal_round_trip() -> Result<()> {
        for num_bits in 1..=16 {
            let values = [0, 1, (1u32 << num_bits) - 1, 0x5a5a & ((1 << num_bits) - 1)];
            let mut enc = BoolEncoder::new();
            for v in values {
                enc.write_literal(v, num_bits);
            }
            let data = enc.finish();
            let mut bd = BoolDecoder::new(&data)?;
            for v in values {
                assert_eq!(bd.read_literal(num_bits)?, v, "{num_bits} bits");
            }
        }
        Ok(())
    }

    #[test]
    fn literal_round_trip_arbitrary() {
        arbtest(|u| {
            let num_bits = u.int_in_range(1..=16)?;
            let count = u.int_in_range(1..=64)?;
            let mut values = Vec::with_capacity(count);
            for _ in 0..count {
                values.push(u.int_in_range(0..=(1u32 << num_bits) - 1)?);
            }
            let mut enc = BoolEncoder::new();
            for &v in &values {
                enc.write_literal(v, num_bits);
            }
            let data = enc.finish();
            let mut bd = BoolDecoder::new(&data).unwrap();
            for &v in &values {
                assert_eq!(bd.read_literal(num_bits).unwrap(), v);
            }
            Ok(())
        });
    }

    #[test]
    fn skewed_probabilities_round_trip() {
        arbtest(|u| {
            let count = u.int_in_range(1..=256)?;
            let mut bits = Vec::with_capacity(count);
            for _ in 0..count {
                bits.push((u.arbitrary::<bool>()?, u.int_in_range(1..=255u8)?));
            }
            let mut enc = BoolEncoder::new();
            for &(bit, prob) in &bits {
                enc.write_bool(bit, prob);
            }
            let data = enc.finish();
            let mut bd = BoolDecoder::new(&data).unwrap();
            for &(bit, prob) in &bits {
                assert_eq!(bd.read_bool(prob).unwrap(), bit);
            }
            Ok(())
        });
    }

    #[test]
    fn deterministic_and_range_bounded() {
        arbtest(|u| {
            let data: Vec<u8> = u.arbitrary()?;
            let probs: Vec<u8> = u.arbitrary()?;
            let mut first = BoolDecoder::new(&data).unwrap();
            let mut second = BoolDecoder::new(&data).unwrap();
            for &p in &probs {
                let a = first.read_bool(p);
                let b = second.read_bool(p);
                match (a, b) {
                    (Ok(a), Ok(b)) => assert_eq!(a, b),
                    (Err(_), Err(_)) => break,
                    _ => panic!("decoders diverged"),
                }
                assert!((1..=255).contains(&first.range()));
                assert_eq!(first.range(), second.range());
            }
            Ok(())
        });
    }

    #[test]
    fn zero_fill_then_truncated() -> Result<()> {
        let mut bd = BoolDecoder::new(&[])?;
        // Each bit at probability 128 consumes one bit of input.
        for _ in 0..8 * (MAX_PADDING_BYTES - 1) {
            assert!(!bd.read_bit()?);
        }
        let mut result = Ok(false);
        for _ in 0..16 {
            result = bd.read_bit();
            if result.is_err() {
                break;
            }
        }
        assert!(matches!(result, Err(Error::TruncatedPayload)));
        Ok(())
    }

    #[test]
    fn optional_signed() -> Result<()> {
        let mut enc = BoolEncoder::new();
        enc.write_optional_signed(0, 4);
        enc.write_optional_signed(-7, 4);
        enc.write_optional_signed(63, 6);
        let data = enc.finish();
        let mut bd = BoolDecoder::new(&data)?;
        assert_eq!(bd.read_optional_signed(4)?, 0);
        assert_eq!(bd.read_optional_signed(4)?, -7);
        assert_eq!(bd.read_optional_signed(6)?, 63);
        Ok(())
    }
}
