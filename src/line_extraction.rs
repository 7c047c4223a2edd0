// src/line_extraction.rs
//
// Straight-segment extraction from a binary color mask.
//
// Uses the progressive probabilistic Hough transform (HoughLinesP): it
// returns finite segment endpoints instead of (rho, theta) peaks, which is
// what the overlay and the per-class counts need, and it stays cheap on the
// sparse masks thin route strokes produce. OpenCV seeds its point sampler
// with a fixed value, so the same mask always gives the same segments.

use crate::hsv_planes::Mask;
use crate::types::LineSegment;
use anyhow::{ensure, Result};
use opencv::{
    core::{self, Mat, Vector},
    imgproc,
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HoughParams {
    /// Distance resolution of the accumulator in pixels
    pub rho: f64,
    /// Angle resolution of the accumulator in degrees
    pub theta_step_degrees: f64,
    /// Votes a cell needs before its line is extracted
    pub threshold: i32,
    /// Minimum x- or y-extent of an accepted segment in pixels
    pub min_line_length: f64,
    /// Longest run of background pixels bridged inside one segment
    pub max_line_gap: f64,
}

impl Default for HoughParams {
    fn default() -> Self {
        Self {
            rho: 1.0,
            theta_step_degrees: 0.5,
            threshold: 100,
            min_line_length: 10.0,
            max_line_gap: 100.0,
        }
    }
}

/// Upper bound on `rho` accepted by the config. Anything coarser collapses
/// the distance axis of the accumulator on small screenshots.
pub const MAX_RHO: f64 = 16.0;

/// Number of distance bins HoughLinesP allocates for a `width` x `height` image.
pub fn rho_bins(width: usize, height: usize, rho: f64) -> i64 {
    (((width + height) * 2 + 1) as f64 / rho).round() as i64
}

// ============================================================================
// EXTRACTION
// ============================================================================

/// 8-bit single-channel copy of the mask (0 / 255).
fn mask_to_mat(mask: &Mask) -> Result<Mat> {
    let mut mat = Mat::new_rows_cols_with_default(
        mask.height() as i32,
        mask.width() as i32,
        core::CV_8UC1,
        core::Scalar::all(0.0),
    )?;
    let bytes = mat.data_bytes_mut()?;
    for (dst, &on) in bytes.iter_mut().zip(mask.as_slice()) {
        *dst = if on { 255 } else { 0 };
    }
    Ok(mat)
}

/// Extract straight segments from a binary mask.
///
/// # Arguments
/// * `mask` - Foreground pixels to fit lines through
/// * `params` - Accumulator resolution, vote threshold and segment geometry
pub fn extract_lines(mask: &Mask, params: &HoughParams) -> Result<Vec<LineSegment>> {
    let (width, height) = mask.dimensions();
    if width == 0 || height == 0 || mask.count() == 0 {
        return Ok(Vec::new());
    }

    ensure!(
        params.rho > 0.0 && rho_bins(width, height, params.rho) >= 1,
        "hough.rho {} leaves no distance bins for a {}x{} image",
        params.rho,
        width,
        height
    );
    ensure!(
        params.theta_step_degrees > 0.0,
        "hough.theta_step_degrees must be positive"
    );

    let image = mask_to_mat(mask)?;
    let mut lines = Vector::<core::Vec4i>::new();
    imgproc::hough_lines_p(
        &image,
        &mut lines,
        params.rho,
        params.theta_step_degrees.to_radians(),
        params.threshold,
        params.min_line_length,
        params.max_line_gap,
    )?;

    let segments: Vec<LineSegment> = lines
        .iter()
        .map(|l| LineSegment::new(l[0], l[1], l[2], l[3]).normalized())
        .collect();

    debug!(
        "Hough: {}x{} mask, {} foreground pixels, {} segments",
        width,
        height,
        mask.count(),
        segments.len()
    );
    Ok(segments)
}

// ============================================================================
// TESTS
// ============================================================================
