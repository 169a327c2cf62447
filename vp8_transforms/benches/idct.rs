// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use vp8_transforms::{idct4x4, iwht4x4};

fn bench_transforms(c: &mut Criterion) {
    let mut group = c.benchmark_group("transforms");
    let input: [i32; 16] = std::array::from_fn(|i| (i as i32 * 37 - 200) * 13);

    group.bench_function("idct4x4", |b| {
        b.iter(|| {
            let mut block = black_box(input);
            idct4x4(&mut block);
            block
        })
    });
    group.bench_function("iwht4x4", |b| {
        b.iter(|| {
            let mut block = black_box(input);
            iwht4x4(&mut block);
            block
        })
    });
    group.finish();
}

criterion_group!(benches, bench_transforms);
criterion_main!(benches);
