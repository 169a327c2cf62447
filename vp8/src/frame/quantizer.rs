// Copyright (c) the vp8-rs Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

use crate::headers::{QuantIndices, Segmentation};

use super::subblock::PlaneType;

pub const MAX_SEGMENTS: usize = 4;
const MAX_QUANT_INDEX: i32 = 127;

#[rustfmt::skip]
const DC_QUANT: [i32; 128] = [
      4,   5,   6,   7,   8,   9,  10,  10,
     11,  12,  13,  14,  15,  16,  17,  17,
     18,  19,  20,  20,  21,  21,  22,  22,
     23,  23,  24,  25,  25,  26,  27,  28,
     29,  30,  31,  32,  33,  34,  35,  36,
     37,  37,  38,  39,  40,  41,  42,  43,
     44,  45,  46,  46,  47,  48,  49,  50,
     51,  52,  53,  54,  55,  56,  57,  58,
     59,  60,  61,  62,  63,  64,  65,  66,
     67,  68,  69,  70,  71,  72,  73,  74,
     75,  76,  76,  77,  78,  79,  80,  81,
     82,  83,  84,  85,  86,  87,  88,  89,
     91,  93,  95,  96,  98, 100, 101, 102,
    104, 106, 108, 110, 112, 114, 116, 118,
    122, 124, 126, 128, 130, 132, 134, 136,
    138, 140, 143, 145, 148, 151, 154, 157,
];

#[rustfmt::skip]
const AC_QUANT: [i32; 128] = [
      4,   5,   6,   7,   8,    9,  10,  11,
      12,  13,  14,  15,  16,  17,  18,  19,
      20,  21,  22,  23,  24,  25,  26,  27,
      28,  29,  30,  31,  32,  33,  34,  35,
      36,  37,  38,  39,  40,  41,  42,  43,
      44,  45,  46,  47,  48,  49,  50,  51,
      52,  53,  54,  55,  56,  57,  58,  60,
      62,  64,  66,  68,  70,  72,  74,  76,
      78,  80,  82,  84,  86,  88,  90,  92,
      94,  96,  98, 100, 102, 104, 106, 108,
     110, 112, 114, 116, 119, 122, 125, 128,
     131, 134, 137, 140, 143, 146, 149, 152,
     155, 158, 161, 164, 167, 170, 173, 177,
     181, 185, 189, 193, 197, 201, 205, 209,
     213, 217, 221, 225, 229, 234, 239, 245,
     249, 254, 259, 264, 269, 274, 279, 284,
];

fn dc_quant(index: i32) -> i32 {
    DC_QUANT[index.clamp(0, MAX_QUANT_INDEX) as usize]
}

fn ac_quant(index: i32) -> i32 {
    AC_QUANT[index.clamp(0, MAX_QUANT_INDEX) as usize]
}

/// Multipliers turning tokens into transform coefficients, as
/// `[dc, ac]` pairs per block kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DequantFactors {
    pub y1: [i32; 2],
    pub y2: [i32; 2],
    pub uv: [i32; 2],
}

impl DequantFactors {
    pub fn new(quant: &QuantIndices, index: i32) -> DequantFactors {
        DequantFactors {
            y1: [dc_quant(index + quant.y1_dc_delta as i32), ac_quant(index)],
            y2: [
                dc_quant(index + quant.y2_dc_delta as i32) * 2,
                (ac_quant(index + quant.y2_ac_delta as i32) * 155 / 100).max(8),
            ],
            uv: [
                dc_quant(index + quant.uv_dc_delta as i32).min(132),
                ac_quant(index + quant.uv_ac_delta as i32),
            ],
        }
    }

    /// Factors for every segment. Without segmentation all four are the
    /// base factors.
    pub fn for_segments(
        quant: &QuantIndices,
        segmentation: &Segmentation,
    ) -> [DequantFactors; MAX_SEGMENTS] {
        std::array::from_fn(|segment| {
            let index = if !segmentation.enabled {
                quant.y_ac_index as i32
            } else if segmentation.absolute_values {
                segmentation.quantizer[segment] as i32
            } else {
                quant.y_ac_index as i32 + segmentation.quantizer[segment] as i32
            };
            DequantFactors::new(quant, index.clamp(0, MAX_QUANT_INDEX))
        })
    }

    pub fn for_plane(&self, plane: PlaneType) -> [i32; 2] {
        match plane {
            PlaneType::Y1 => self.y1,
            PlaneType::Y2 => self.y2,
            PlaneType::U | PlaneType::V => self.uv,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn reference_factors() {
        let quant = QuantIndices::default();
        let f = DequantFactors::new(&quant, 0);
        assert_eq!(f.y1, [4, 4]);
        assert_eq!(f.y2, [8, 8]);
        assert_eq!(f.uv, [4, 4]);

        let f = DequantFactors::new(&quant, 127);
        assert_eq!(f.y1, [157, 284]);
        assert_eq!(f.y2, [314, 284 * 155 / 100]);
        assert_eq!(f.uv, [132, 284]);
    }

    #[test]
    fn deltas_clamp_to_table() {
        let quant = QuantIndices {
            y_ac_index: 120,
            y1_dc_delta: 15,
            y2_dc_delta: -15,
            y2_ac_delta: 0,
            uv_dc_delta: 0,
            uv_ac_delta: -15,
        };
        let f = DequantFactors::new(&quant, 120);
        assert_eq!(f.y1[0], DC_QUANT[127]);
        assert_eq!(f.y2[0], DC_QUANT[105] * 2);
        assert_eq!(f.uv[1], AC_QUANT[105]);
    }

    #[test]
    fn segment_quantizers() {
        let quant = QuantIndices {
            y_ac_index: 60,
            ..Default::default()
        };
        let mut segmentation = Segmentation {
            enabled: true,
            quantizer: [0, 10, -70, 100],
            ..Default::default()
        };
        let factors = DequantFactors::for_segments(&quant, &segmentation);
        assert_eq!(factors[0], DequantFactors::new(&quant, 60));
        assert_eq!(factors[1], DequantFactors::new(&quant, 70));
        assert_eq!(factors[2], DequantFactors::new(&quant, 0));
        assert_eq!(factors[3], DequantFactors::new(&quant, 127));

        segmentation.absolute_values = true;
        let factors = DequantFactors::for_segments(&quant, &segmentation);
        assert_eq!(factors[1], DequantFactors::new(&quant, 10));
        assert_eq!(factors[2], DequantFactors::new(&quant, 0));
    }
}
