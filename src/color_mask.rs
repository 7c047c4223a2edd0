// src/color_mask.rs
//
// Color-range masking over HSV channel planes.
//
// A pixel is selected when its hue, saturation and value each fall inside
// the band around a target color. Saturation and value are linear, so their
// bounds are clamped to [0, 255]. Hue is circular (179 sits next to 0): its
// bounds are left as computed and the membership test wraps modulo 180, so a
// band of [-5, 5] selects 175..179 as well as 0..5.

use crate::color_units::{InternalColor, ToleranceBand};
use crate::hsv_planes::{ChannelPlane, HsvPlanes, Mask};

/// Number of distinct hue steps in the working encoding.
pub const HUE_MODULUS: i32 = 180;

const CHANNEL_MAX: i32 = 255;

// ============================================================================
// RANGE TESTS
// ============================================================================

/// Whether `value` lies in the closed interval `[lower, upper]` taken modulo
/// `modulus`. Bounds may be negative or exceed the modulus.
#[inline]
pub fn in_cyclic_range(value: i32, lower: i32, upper: i32, modulus: i32) -> bool {
    if upper < lower {
        return false;
    }
    if upper - lower >= modulus - 1 {
        return true;
    }
    let offset = (value - lower).rem_euclid(modulus);
    offset <= upper - lower
}

#[inline]
pub fn in_linear_range(value: i32, lower: i32, upper: i32) -> bool {
    lower <= value && value <= upper
}

// ============================================================================
// BOUNDS
// ============================================================================

/// Resolved per-channel bounds for one target color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorBounds {
    /// Unclamped, may leave [0, 180]
    pub hue_lower: i32,
    pub hue_upper: i32,
    pub sat_lower: i32,
    pub sat_upper: i32,
    pub val_lower: i32,
    pub val_upper: i32,
}

impl ColorBounds {
    pub fn new(center: InternalColor, band: ToleranceBand) -> Self {
        Self {
            hue_lower: center.hue - band.hue_lower,
            hue_upper: center.hue + band.hue_upper,
            sat_lower: (center.saturation - band.saturation).clamp(0, CHANNEL_MAX),
            sat_upper: (center.saturation + band.saturation).clamp(0, CHANNEL_MAX),
            val_lower: (center.value - band.value).clamp(0, CHANNEL_MAX),
            val_upper: (center.value + band.value).clamp(0, CHANNEL_MAX),
        }
    }
}

// ============================================================================
// MASKS
// ============================================================================

pub fn hue_mask(plane: &ChannelPlane, lower: i32, upper: i32) -> Mask {
    plane.map(|h| in_cyclic_range(h as i32, lower, upper, HUE_MODULUS))
}

pub fn linear_mask(plane: &ChannelPlane, lower: i32, upper: i32) -> Mask {
    plane.map(|v| in_linear_range(v as i32, lower, upper))
}

/// Mask of pixels within `band` of `center` on all three channels.
pub fn color_range_mask(planes: &HsvPlanes, center: InternalColor, band: ToleranceBand) -> Mask {
    let bounds = ColorBounds::new(center, band);

    let hue = hue_mask(&planes.hue, bounds.hue_lower, bounds.hue_upper);
    let saturation = linear_mask(&planes.saturation, bounds.sat_lower, bounds.sat_upper);
    let value = linear_mask(&planes.value, bounds.val_lower, bounds.val_upper);

    hue.zip_with(&saturation, |h, s| h && s)
        .zip_with(&value, |hs, v| hs && v)
}

// ============================================================================
// TESTS
// ============================================================================
