// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use vp8::decode::DecoderOptions;
use vp8_cli::{dec::decode_file, enc::encode_for_path};

#[derive(Parser)]
struct Opt {
    /// Input file holding one raw VP8 key frame
    input: PathBuf,

    /// Output file, should end in .yuv, .y4m or .pgm
    output: PathBuf,

    /// Decode frames of any size
    #[clap(long)]
    no_pixel_limit: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    #[cfg(feature = "tracing-subscriber")]
    {
        use tracing_subscriber::{EnvFilter, fmt, prelude::*};
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(EnvFilter::from_default_env())
            .init();
    }

    let opt = Opt::parse();
    let mut options = DecoderOptions::default();
    if opt.no_pixel_limit {
        options.max_pixels = None;
    }
    let frame = decode_file(&opt.input, options)?;
    println!("Image size: {} x {}", frame.width(), frame.height());
    let output = encode_for_path(&frame, &opt.output)?;
    std::fs::write(&opt.output, output)
        .wrap_err_with(|| format!("Cannot write {}", opt.output.display()))
}
