// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.
use super::*;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use test_log::test;

const HADAMARD: [[i32; 4]; 4] = [[1, 1, 1, 1], [1, 1, -1, -1], [1, -1, -1, 1], [1, -1, 1, -1]];

/// Straightforward `H * X * H^T` with the final rounding applied.
fn slow_iwht(input: &[i32; 16]) -> [i32; 16] {
    let mut out = [0; 16];
    for r in 0..4 {
        for c in 0..4 {
            let mut sum = 0;
            for i in 0..4 {
                for j in 0..4 {
                    sum += HADAMARD[r][i] * input[i * 4 + j] * HADAMARD[c][j];
                }
            }
            out[r * 4 + c] = (sum + 3) >> 3;
        }
    }
    out
}

#[test]
fn zero_in_zero_out() {
    let mut block = [0; BLOCK_SIZE];
    idct4x4(&mut block);
    assert_eq!(block, [0; BLOCK_SIZE]);
    iwht4x4(&mut block);
    assert_eq!(block, [0; BLOCK_SIZE]);
}

#[test]
fn dc_only_is_uniform() {
    for k in [-2048, -317, -9, -1, 1, 4, 5, 12, 100, 2047, 314 * 2048] {
        let mut block = [0; BLOCK_SIZE];
        block[0] = k;
        idct4x4(&mut block);
        assert_eq!(block, [(k + 4) >> 3; BLOCK_SIZE], "idct dc {k}");

        let mut block = [0; BLOCK_SIZE];
        block[0] = k;
        iwht4x4(&mut block);
        assert_eq!(block, [(k + 3) >> 3; BLOCK_SIZE], "iwht dc {k}");
    }
}

#[test]
fn idct_first_horizontal_coefficient() {
    let mut block = [0; BLOCK_SIZE];
    block[1] = 100;
    idct4x4(&mut block);
    for y in 0..BLOCK_DIM {
        assert_eq!(block[y * 4..y * 4 + 4], [16, 7, -7, -16]);
    }
}

#[test]
fn idct_first_vertical_coefficient() {
    let mut block = [0; BLOCK_SIZE];
    block[4] = 100;
    idct4x4(&mut block);
    let expected = [16, 7, -7, -16];
    for y in 0..BLOCK_DIM {
        assert_eq!(block[y * 4..y * 4 + 4], [expected[y]; 4]);
    }
}

#[test]
fn iwht_matches_hadamard_product() {
    let mut rng = ChaCha12Rng::seed_from_u64(0);
    for _ in 0..1000 {
        let mut block = [0; BLOCK_SIZE];
        for v in block.iter_mut() {
            *v = rng.random_range(-2048 * 157..=2048 * 157);
        }
        let expected = slow_iwht(&block);
        iwht4x4(&mut block);
        assert_eq!(block, expected);
    }
}

#[test]
fn idct_is_deterministic_and_bounded() {
    let mut rng = ChaCha12Rng::seed_from_u64(1);
    for _ in 0..1000 {
        let mut block = [0i32; BLOCK_SIZE];
        for v in block.iter_mut() {
            *v = rng.random_range(-2048 * 157..=2048 * 157);
        }
        let max_in = block.iter().map(|v| v.unsigned_abs() as u64).sum::<u64>();
        let mut copy = block;
        idct4x4(&mut block);
        idct4x4(&mut copy);
        assert_eq!(block, copy);
        for v in block {
            assert!((v.unsigned_abs() as u64) <= max_in);
        }
    }
}
