// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use std::path::PathBuf;

use clap::{Arg, ArgAction, Command, value_parser};
use vp8::headers::FrameHeader;
use vp8_cli::dec::read_header;

fn print_header(header: &FrameHeader, verbose: bool) {
    if verbose {
        println!("{header:#?}");
        return;
    }
    print!(
        "{}x{}, version {}, scale {}x{}",
        header.width,
        header.height,
        header.tag.version,
        header.horizontal_scale,
        header.vertical_scale,
    );
    if !header.tag.show_frame {
        print!(", hidden");
    }
    println!();

    let q = &header.quant;
    println!(
        "quantizer: {} (y1 dc {:+}, y2 dc {:+}, y2 ac {:+}, uv dc {:+}, uv ac {:+})",
        q.y_ac_index, q.y1_dc_delta, q.y2_dc_delta, q.y2_ac_delta, q.uv_dc_delta, q.uv_ac_delta
    );
    let lf = &header.loop_filter;
    println!(
        "loop filter: {:?}, level {}, sharpness {}",
        lf.filter_type, lf.level, lf.sharpness
    );
    let segmentation = &header.segmentation;
    if segmentation.enabled {
        println!(
            "segmentation: {} quantizer {:?}, loop filter {:?}",
            if segmentation.absolute_values {
                "absolute"
            } else {
                "delta"
            },
            segmentation.quantizer,
            segmentation.loop_filter_level
        );
    } else {
        println!("segmentation: off");
    }
    println!("token partitions: {}", header.num_partitions);
}

fn main() {
    let matches = Command::new("vp8info")
        .about("Provides info about a raw VP8 key frame")
        .arg(
            Arg::new("filename")
                .help("The VP8 frame to analyze")
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .index(1),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Provides more verbose output")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let Some(filename) = matches.get_one::<PathBuf>("filename") else {
        return;
    };
    let verbose = matches.get_flag("verbose");
    if verbose {
        println!("Processing file: {}", filename.display());
    }

    match read_header(filename) {
        Ok(header) => print_header(&header, verbose),
        Err(err) => {
            println!("Error parsing VP8 frame: {err:#}");
            std::process::exit(1);
        }
    }
}
