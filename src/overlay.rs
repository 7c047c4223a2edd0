// src/overlay.rs
//
// Draws detected traffic segments back onto the source screenshot and
// formats the per-class count summary.

use crate::types::{ColorFamily, LineSegment, TrafficReport};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_circle_mut, draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;

pub const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);

pub fn family_color(family: ColorFamily) -> Rgb<u8> {
    match family {
        ColorFamily::Green => GREEN,
        ColorFamily::Red => RED,
    }
}

/// Draw one segment with a round-capped stroke `stroke_width` pixels wide.
///
/// The body is a single filled quad offset along the segment normal; the caps
/// are filled circles at both endpoints.
pub fn draw_thick_segment(canvas: &mut RgbImage, segment: &LineSegment, stroke_width: u32, color: Rgb<u8>) {
    let radius = (stroke_width / 2) as i32;
    let start = (segment.x1 as f32, segment.y1 as f32);
    let end = (segment.x2 as f32, segment.y2 as f32);

    let length = segment.length();
    if radius == 0 || length == 0.0 {
        draw_line_segment_mut(canvas, start, end, color);
    } else {
        let nx = -(end.1 - start.1) / length * radius as f32;
        let ny = (end.0 - start.0) / length * radius as f32;
        let corner = |(x, y): (f32, f32), sign: f32| {
            Point::new((x + sign * nx).round() as i32, (y + sign * ny).round() as i32)
        };
        let quad = [
            corner(start, 1.0),
            corner(end, 1.0),
            corner(end, -1.0),
            corner(start, -1.0),
        ];
        draw_polygon_mut(canvas, &quad, color);
    }

    if radius > 0 {
        draw_filled_circle_mut(canvas, (segment.x1, segment.y1), radius, color);
        draw_filled_circle_mut(canvas, (segment.x2, segment.y2), radius, color);
    }
}

/// Copy of `image` with every detected segment drawn in its class family color.
pub fn draw_report(image: &RgbImage, report: &TrafficReport, stroke_width: u32) -> RgbImage {
    let mut annotated = image.clone();
    for result in &report.results {
        let color = family_color(result.class.family());
        for segment in &result.segments {
            draw_thick_segment(&mut annotated, segment, stroke_width, color);
        }
    }
    annotated
}

/// One line per class, e.g. `  green: 3 lines`.
pub fn summary_lines(report: &TrafficReport) -> Vec<String> {
    report
        .results
        .iter()
        .map(|r| {
            format!(
                "  {}: {} line{}",
                r.class,
                r.count,
                if r.count == 1 { "" } else { "s" }
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TrafficClass, TrafficClassResult};

    fn report() -> TrafficReport {
        TrafficReport {
            width: 40,
            height: 40,
            results: vec![
                TrafficClassResult::new(TrafficClass::Green, vec![LineSegment::new(5, 10, 35, 10)]),
                TrafficClassResult::new(TrafficClass::VeryRed, vec![LineSegment::new(20, 20, 20, 35)]),
                TrafficClassResult::new(TrafficClass::Red, vec![]),
            ],
        }
    }

    #[test]
    fn test_draw_report_colors_by_family() {
        let image = RgbImage::from_pixel(40, 40, Rgb([128, 128, 128]));
        let annotated = draw_report(&image, &report(), 5);

        assert_eq!(*annotated.get_pixel(20, 10), GREEN);
        // stroke is 5 wide, so two rows either side are covered
        assert_eq!(*annotated.get_pixel(20, 12), GREEN);
        assert_eq!(*annotated.get_pixel(20, 30), RED);
        assert_eq!(*annotated.get_pixel(2, 38), Rgb([128, 128, 128]));
        // source is untouched
        assert_eq!(*image.get_pixel(20, 10), Rgb([128, 128, 128]));
    }

    #[test]
    fn test_stroke_stays_within_width() {
        let background = Rgb([128, 128, 128]);
        let mut canvas = RgbImage::from_pixel(40, 40, background);
        draw_thick_segment(&mut canvas, &LineSegment::new(5, 20, 35, 20), 5, GREEN);
        for y in 18..=22 {
            assert_eq!(*canvas.get_pixel(20, y), GREEN, "row {}", y);
        }
        assert_eq!(*canvas.get_pixel(20, 17), background);
        assert_eq!(*canvas.get_pixel(20, 23), background);
        // round caps extend past the endpoints
        assert_eq!(*canvas.get_pixel(37, 20), GREEN);
        assert_eq!(*canvas.get_pixel(38, 20), background);
    }

    #[test]
    fn test_diagonal_stroke() {
        let mut canvas = RgbImage::new(40, 40);
        draw_thick_segment(&mut canvas, &LineSegment::new(5, 5, 35, 35), 5, RED);
        assert_eq!(*canvas.get_pixel(20, 20), RED);
        assert_eq!(*canvas.get_pixel(21, 19), RED);
        assert_eq!(*canvas.get_pixel(26, 14), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_zero_length_segment_is_a_dot() {
        let mut canvas = RgbImage::new(10, 10);
        draw_thick_segment(&mut canvas, &LineSegment::new(5, 5, 5, 5), 5, RED);
        assert_eq!(*canvas.get_pixel(5, 5), RED);
        assert_eq!(*canvas.get_pixel(5, 7), RED);
        assert_eq!(*canvas.get_pixel(5, 8), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_single_pixel_stroke() {
        let mut canvas = RgbImage::new(10, 10);
        draw_thick_segment(&mut canvas, &LineSegment::new(0, 5, 9, 5), 1, RED);
        assert_eq!(*canvas.get_pixel(4, 5), RED);
        assert_eq!(*canvas.get_pixel(4, 4), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_summary_lines() {
        let lines = summary_lines(&report());
        assert_eq!(
            lines,
            vec![
                "  green: 1 line".to_string(),
                "  very-red: 1 line".to_string(),
                "  red: 0 lines".to_string(),
            ]
        );
    }
}
