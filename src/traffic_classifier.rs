// src/traffic_classifier.rs
//
// Per-class traffic line detection.
//
// Signal flow, once per configured class:
//   authored color + tolerance → color_units → color_mask → line_extraction
//
// Every class reads the same HsvPlanes and owns its mask and segments, so
// the classes can run in any order or in parallel with identical results.
// The report only carries the raw per-class counts; no overall congestion
// level is derived from them.

use crate::color_mask::color_range_mask;
use crate::color_units::{AuthoredColor, AuthoredTolerance};
use crate::hsv_planes::HsvPlanes;
use crate::line_extraction::{extract_lines, HoughParams};
use crate::types::{TrafficClass, TrafficClassResult, TrafficReport};
use anyhow::{Context, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

// ============================================================================
// CLASS TABLE
// ============================================================================

/// Target color and tolerance for one traffic class, in color-picker units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrafficClassSpec {
    pub class: TrafficClass,
    pub color: AuthoredColor,
    pub tolerance: AuthoredTolerance,
}

/// Hand-tuned table for the stock map style, in report order.
pub const DEFAULT_CLASS_TABLE: [TrafficClassSpec; 4] = [
    TrafficClassSpec {
        class: TrafficClass::VeryGreen,
        color: AuthoredColor::new(90, 60, 79),
        tolerance: AuthoredTolerance::new(29, 50, 30, 30),
    },
    TrafficClassSpec {
        class: TrafficClass::Green,
        color: AuthoredColor::new(30, 99, 94),
        tolerance: AuthoredTolerance::new(14, 30, 30, 30),
    },
    TrafficClassSpec {
        class: TrafficClass::Red,
        color: AuthoredColor::new(0, 100, 90),
        tolerance: AuthoredTolerance::new(15, 15, 30, 30),
    },
    TrafficClassSpec {
        class: TrafficClass::VeryRed,
        color: AuthoredColor::new(0, 88, 62),
        tolerance: AuthoredTolerance::new(15, 15, 15, 15),
    },
];

pub fn default_class_table() -> Vec<TrafficClassSpec> {
    DEFAULT_CLASS_TABLE.to_vec()
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Detect the line segments of a single class.
pub fn evaluate_class(
    planes: &HsvPlanes,
    spec: &TrafficClassSpec,
    hough: &HoughParams,
) -> Result<TrafficClassResult> {
    let center = spec.color.to_internal();
    let band = spec.tolerance.to_internal();

    let mask = color_range_mask(planes, center, band);
    let segments = extract_lines(&mask, hough)
        .with_context(|| format!("Line extraction failed for class {}", spec.class))?;

    debug!(
        "{}: center H={} S={} V={}, {} mask pixels, {} segments",
        spec.class,
        center.hue,
        center.saturation,
        center.value,
        mask.count(),
        segments.len()
    );

    Ok(TrafficClassResult::new(spec.class, segments))
}

pub struct TrafficClassifier {
    classes: Vec<TrafficClassSpec>,
    hough: HoughParams,
    parallel: bool,
}

impl TrafficClassifier {
    pub fn new(classes: Vec<TrafficClassSpec>, hough: HoughParams) -> Self {
        Self {
            classes,
            hough,
            parallel: false,
        }
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Run every configured class over the planes. Results keep the order of
    /// the class table.
    pub fn classify(&self, planes: &HsvPlanes) -> Result<TrafficReport> {
        let results: Vec<TrafficClassResult> = if self.parallel {
            self.classes
                .par_iter()
                .map(|spec| evaluate_class(planes, spec, &self.hough))
                .collect::<Result<_>>()?
        } else {
            self.classes
                .iter()
                .map(|spec| evaluate_class(planes, spec, &self.hough))
                .collect::<Result<_>>()?
        };

        info!(
            "Detected: {}",
            results
                .iter()
                .map(|r| format!("{} {}", r.count, r.class))
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(TrafficReport {
            width: planes.width(),
            height: planes.height(),
            results,
        })
    }
}

impl Default for TrafficClassifier {
    fn default() -> Self {
        Self::new(default_class_table(), HoughParams::default())
    }
}

// ============================================================================
// TESTS
// ============================================================================
