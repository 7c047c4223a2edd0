// src/types.rs

use crate::line_extraction::HoughParams;
use crate::traffic_classifier::TrafficClassSpec;
use serde::{Deserialize, Serialize};

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-class target colors and tolerances, in evaluation order
    pub classes: Vec<TrafficClassSpec>,
    pub hough: HoughParams,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    /// Evaluate the classes on the rayon pool instead of one after another
    pub parallel: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub save_annotated: bool,
    pub output_dir: String,
    /// Overlay stroke width in pixels
    pub stroke_width: u32,
    pub write_json: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

// ============================================================================
// TRAFFIC CLASSES
// ============================================================================

/// Congestion color drawn by the map provider on top of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrafficClass {
    VeryGreen,
    Green,
    Red,
    VeryRed,
}

/// Color family used when drawing a class back onto the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorFamily {
    Green,
    Red,
}

impl TrafficClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrafficClass::VeryGreen => "very-green",
            TrafficClass::Green => "green",
            TrafficClass::Red => "red",
            TrafficClass::VeryRed => "very-red",
        }
    }

    pub fn family(&self) -> ColorFamily {
        match self {
            TrafficClass::VeryGreen | TrafficClass::Green => ColorFamily::Green,
            TrafficClass::Red | TrafficClass::VeryRed => ColorFamily::Red,
        }
    }
}

impl std::fmt::Display for TrafficClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// DETECTIONS
// ============================================================================

/// Straight segment between two pixel positions, as found by the line extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineSegment {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl LineSegment {
    pub fn new(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn length(&self) -> f32 {
        let dx = (self.x2 - self.x1) as f32;
        let dy = (self.y2 - self.y1) as f32;
        (dx * dx + dy * dy).sqrt()
    }

    /// Same segment with its endpoints in a canonical order, so segments can be
    /// compared regardless of the direction they were walked in.
    pub fn normalized(&self) -> Self {
        if (self.x1, self.y1) <= (self.x2, self.y2) {
            *self
        } else {
            Self::new(self.x2, self.y2, self.x1, self.y1)
        }
    }
}

/// Segments detected for one traffic class on one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficClassResult {
    pub class: TrafficClass,
    pub segments: Vec<LineSegment>,
    pub count: usize,
}

impl TrafficClassResult {
    pub fn new(class: TrafficClass, segments: Vec<LineSegment>) -> Self {
        let count = segments.len();
        Self {
            class,
            segments,
            count,
        }
    }
}

/// Per-image output: one result per configured class, in configuration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficReport {
    pub width: usize,
    pub height: usize,
    pub results: Vec<TrafficClassResult>,
}

impl TrafficReport {
    pub fn result(&self, class: TrafficClass) -> Option<&TrafficClassResult> {
        self.results.iter().find(|r| r.class == class)
    }

    /// Segment count for a class; zero when the class was not evaluated.
    pub fn count(&self, class: TrafficClass) -> usize {
        self.result(class).map(|r| r.count).unwrap_or(0)
    }

    /// Segments over every class drawn in the given color family.
    pub fn family_count(&self, family: ColorFamily) -> usize {
        self.results
            .iter()
            .filter(|r| r.class.family() == family)
            .map(|r| self.count(r.class))
            .sum()
    }

    /// Summed pixel length of a class's segments.
    pub fn total_length(&self, class: TrafficClass) -> f32 {
        self.result(class)
            .map(|r| r.segments.iter().map(LineSegment::length).sum())
            .unwrap_or(0.0)
    }

    pub fn total_segments(&self) -> usize {
        self.results.iter().map(|r| r.count).sum()
    }
}
