// src/hsv_planes.rs
//
// RGB screenshot → three 8-bit HSV channel planes.
//
// Encoding matches the usual 8-bit HSV convention:
//   H: 0-179 (degrees / 2), S: 0-255, V: 0-255
// Hue of achromatic pixels (max == min) is 0. The planes are produced once per
// image and only read afterwards, so every traffic class shares them.

use anyhow::{ensure, Result};
use image::RgbImage;

// ============================================================================
// GRID
// ============================================================================

/// Row-major 2-D grid of per-pixel values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

/// One color dimension of an image in working units.
pub type ChannelPlane = Plane<u8>;

/// Per-pixel selection produced by a color test.
pub type Mask = Plane<bool>;

impl<T: Copy> Plane<T> {
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn map<U: Copy>(&self, f: impl Fn(T) -> U) -> Plane<U> {
        Plane {
            width: self.width,
            height: self.height,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Combine two planes pixel by pixel. Both must have the same dimensions.
    pub fn zip_with<U: Copy, V: Copy>(&self, other: &Plane<U>, f: impl Fn(T, U) -> V) -> Plane<V> {
        assert_eq!(
            self.dimensions(),
            other.dimensions(),
            "plane dimensions differ"
        );
        Plane {
            width: self.width,
            height: self.height,
            data: self
                .data
                .iter()
                .zip(other.data.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }
}

#[cfg(test)]
impl<T: Copy> Plane<T> {
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    pub fn get(&self, x: usize, y: usize) -> T {
        self.data[y * self.width + x]
    }

    pub fn set(&mut self, x: usize, y: usize, value: T) {
        self.data[y * self.width + x] = value;
    }
}

impl Plane<bool> {
    pub fn count(&self) -> usize {
        self.data.iter().filter(|&&v| v).count()
    }
}

// ============================================================================
// HSV CONVERSION
// ============================================================================

/// Convert one RGB pixel to working-unit HSV.
/// Returns (H: 0-179, S: 0-255, V: 0-255).
#[inline]
pub fn rgb_to_hsv8(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = (max - min) as f32;

    let v = max;
    let s = if max == 0 {
        0
    } else {
        (255.0 * delta / max as f32).round() as u8
    };

    if delta == 0.0 {
        return (0, s, v);
    }

    let (r, g, b) = (r as f32, g as f32, b as f32);
    let mut h = if max as f32 == r {
        60.0 * (g - b) / delta
    } else if max as f32 == g {
        120.0 + 60.0 * (b - r) / delta
    } else {
        240.0 + 60.0 * (r - g) / delta
    };
    if h < 0.0 {
        h += 360.0;
    }

    // 359° rounds to 180, which is the same hue as 0
    let h = ((h / 2.0).round() as u32 % 180) as u8;
    (h, s, v)
}

/// The three channel planes of one image.
#[derive(Debug, Clone)]
pub struct HsvPlanes {
    pub hue: ChannelPlane,
    pub saturation: ChannelPlane,
    pub value: ChannelPlane,
}

impl HsvPlanes {
    /// Assemble planes produced elsewhere, checking they describe one image.
    pub fn from_planes(
        hue: ChannelPlane,
        saturation: ChannelPlane,
        value: ChannelPlane,
    ) -> Result<Self> {
        ensure!(!hue.is_empty(), "channel planes must not be empty");
        ensure!(
            hue.dimensions() == saturation.dimensions() && hue.dimensions() == value.dimensions(),
            "channel plane dimensions differ: hue {:?}, saturation {:?}, value {:?}",
            hue.dimensions(),
            saturation.dimensions(),
            value.dimensions()
        );
        Ok(Self {
            hue,
            saturation,
            value,
        })
    }

    pub fn from_rgb_image(image: &RgbImage) -> Result<Self> {
        let (width, height) = (image.width() as usize, image.height() as usize);
        ensure!(width > 0 && height > 0, "image has no pixels");

        let hsv = Plane::from_fn(width, height, |x, y| {
            let [r, g, b] = image.get_pixel(x as u32, y as u32).0;
            rgb_to_hsv8(r, g, b)
        });
        Self::from_planes(
            hsv.map(|(h, _, _)| h),
            hsv.map(|(_, s, _)| s),
            hsv.map(|(_, _, v)| v),
        )
    }

    pub fn width(&self) -> usize {
        self.hue.width()
    }

    pub fn height(&self) -> usize {
        self.hue.height()
    }
}

// ============================================================================
// TESTS
// ============================================================================
