// src/color_units.rs
//
// Color-picker units → working HSV units.
//
// Map colors are sampled with an image editor's color picker, which reports
// H: 0-360, S: 0-100, V: 0-100. The channel planes the masks run on use the
// 8-bit encoding H: 0-180, S: 0-255, V: 0-255. Nothing here clamps: hue is
// circular and its bounds are allowed to leave [0, 180], the linear channels
// are clamped later when the band is built.

use serde::{Deserialize, Serialize};

#[inline]
pub fn hue_to_internal(hue: i32) -> i32 {
    (hue as f64 / 360.0 * 180.0).round() as i32
}

#[inline]
pub fn saturation_to_internal(saturation: i32) -> i32 {
    (saturation as f64 / 100.0 * 255.0).round() as i32
}

#[inline]
pub fn value_to_internal(value: i32) -> i32 {
    (value as f64 / 100.0 * 255.0).round() as i32
}

/// Color as read off a color picker (H 0-360, S/V 0-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoredColor {
    pub hue: i32,
    pub saturation: i32,
    pub value: i32,
}

/// Color in working units (H 0-180, S/V 0-255).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct InternalColor {
    pub hue: i32,
    pub saturation: i32,
    pub value: i32,
}

impl AuthoredColor {
    pub const fn new(hue: i32, saturation: i32, value: i32) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }

    pub fn to_internal(&self) -> InternalColor {
        InternalColor {
            hue: hue_to_internal(self.hue),
            saturation: saturation_to_internal(self.saturation),
            value: value_to_internal(self.value),
        }
    }
}

/// Tolerances in color-picker units. Unsigned, so a negative radius cannot be
/// configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoredTolerance {
    pub hue_lower: u16,
    pub hue_upper: u16,
    pub saturation: u16,
    pub value: u16,
}

/// Tolerances in working units: asymmetric on hue, a single radius on
/// saturation and value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToleranceBand {
    pub hue_lower: i32,
    pub hue_upper: i32,
    pub saturation: i32,
    pub value: i32,
}

impl AuthoredTolerance {
    pub const fn new(hue_lower: u16, hue_upper: u16, saturation: u16, value: u16) -> Self {
        Self {
            hue_lower,
            hue_upper,
            saturation,
            value,
        }
    }

    pub fn to_internal(&self) -> ToleranceBand {
        ToleranceBand {
            hue_lower: hue_to_internal(self.hue_lower as i32),
            hue_upper: hue_to_internal(self.hue_upper as i32),
            saturation: saturation_to_internal(self.saturation as i32),
            value: value_to_internal(self.value as i32),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hue_stays_in_working_range() {
        for h in 0..=360 {
            let internal = hue_to_internal(h);
            assert!((0..=180).contains(&internal), "hue {} -> {}", h, internal);
        }
        assert_eq!(hue_to_internal(360), 180);
        assert_eq!(hue_to_internal(90), 45);
    }

    #[test]
    fn test_saturation_and_value_stay_in_working_range() {
        for s in 0..=100 {
            assert!((0..=255).contains(&saturation_to_internal(s)));
            assert!((0..=255).contains(&value_to_internal(s)));
        }
        assert_eq!(saturation_to_internal(100), 255);
        assert_eq!(value_to_internal(0), 0);
    }

    #[test]
    fn test_conversion_rounds_to_nearest() {
        // 29 / 2 = 14.5 and 30 * 2.55 = 76.5 both round up
        assert_eq!(hue_to_internal(29), 15);
        assert_eq!(saturation_to_internal(30), 77);
        assert_eq!(value_to_internal(94), 240);
    }

    #[test]
    fn test_out_of_domain_is_not_clamped() {
        assert_eq!(hue_to_internal(400), 200);
        assert_eq!(hue_to_internal(-20), -10);
        assert_eq!(saturation_to_internal(120), 306);
    }

    #[test]
    fn test_color_and_tolerance_to_internal() {
        let color = AuthoredColor::new(30, 99, 94).to_internal();
        assert_eq!(
            color,
            InternalColor {
                hue: 15,
                saturation: 252,
                value: 240
            }
        );

        let band = AuthoredTolerance::new(14, 30, 30, 30).to_internal();
        assert_eq!(band.hue_lower, 7);
        assert_eq!(band.hue_upper, 15);
        assert_eq!(band.saturation, 77);
        assert_eq!(band.value, 77);
    }
}
