// src/main.rs

mod color_mask;
mod color_units;
mod config;
mod hsv_planes;
mod image_source;
mod line_extraction;
mod overlay;
mod traffic_classifier;
mod types;

use anyhow::{Context, Result};
use clap::Parser;
use hsv_planes::HsvPlanes;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use traffic_classifier::TrafficClassifier;
use types::{ColorFamily, Config, TrafficReport};

const DEFAULT_CONFIG: &str = "config.yaml";

/// Count congestion-colored route segments on map screenshots.
///
/// Usage:
///   1. zoom the map to the area of interest
///   2. save a screenshot as png
///   3. traffic-lines <screenshot or directory>
#[derive(Parser, Debug)]
#[command(name = "traffic-lines", version)]
struct Args {
    /// Screenshot files or directories containing screenshots
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// YAML config [default: config.yaml, built-in defaults when that file is absent]
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides output.output_dir
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Do not write annotated images
    #[arg(long)]
    no_annotate: bool,

    /// Write a JSON report per image
    #[arg(long)]
    json: bool,

    /// Evaluate the traffic classes one after another
    #[arg(long)]
    sequential: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (mut config, config_source) =
        Config::resolve(args.config.as_deref(), Path::new(DEFAULT_CONFIG))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("traffic_lines={}", config.logging.level)));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("🗺️  Traffic line detection starting");
    match &config_source {
        Some(path) => info!("✓ Configuration loaded from {}", path.display()),
        None => warn!("{} not found, using built-in defaults", DEFAULT_CONFIG),
    }

    if let Some(dir) = &args.output_dir {
        config.output.output_dir = dir.display().to_string();
    }
    if args.no_annotate {
        config.output.save_annotated = false;
    }
    if args.json {
        config.output.write_json = true;
    }
    if args.sequential {
        config.parallel = false;
    }

    info!(
        "Hough: theta={}°, threshold={}, min_length={}, max_gap={}",
        config.hough.theta_step_degrees,
        config.hough.threshold,
        config.hough.min_line_length,
        config.hough.max_line_gap
    );

    let classifier = TrafficClassifier::new(config.classes.clone(), config.hough.clone())
        .with_parallel(config.parallel);

    let images = image_source::find_image_files(&args.inputs)?;
    if images.is_empty() {
        error!("No images found in the given inputs");
        return Ok(());
    }

    let mut processed = 0usize;
    let mut failed = 0usize;

    for (idx, path) in images.iter().enumerate() {
        info!(
            "Processing image {}/{}: {}",
            idx + 1,
            images.len(),
            path.display()
        );

        match process_image(path, &classifier, &config) {
            Ok(report) => {
                processed += 1;
                info!(
                    "✓ {}x{}, {} segment(s) in total ({} green, {} red)",
                    report.width,
                    report.height,
                    report.total_segments(),
                    report.family_count(ColorFamily::Green),
                    report.family_count(ColorFamily::Red)
                );
            }
            Err(e) => {
                failed += 1;
                error!("✗ {}: {:#}", path.display(), e);
            }
        }
    }

    info!("Done: {} processed, {} failed", processed, failed);

    if failed > 0 {
        anyhow::bail!("{} image(s) could not be processed", failed);
    }
    Ok(())
}

fn process_image(path: &Path, classifier: &TrafficClassifier, config: &Config) -> Result<TrafficReport> {
    let start = Instant::now();

    let image = image_source::load_rgb(path)?;
    let planes = HsvPlanes::from_rgb_image(&image)
        .with_context(|| format!("Cannot analyse {}", path.display()))?;

    let report = classifier.classify(&planes)?;

    info!("Detected:");
    for line in overlay::summary_lines(&report) {
        info!("{}", line);
    }
    for result in &report.results {
        debug!("{}: {:.0} px of route", result.class, report.total_length(result.class));
    }

    let output_dir = Path::new(&config.output.output_dir);
    if config.output.save_annotated || config.output.write_json {
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;
    }

    if config.output.save_annotated {
        let annotated = overlay::draw_report(&image, &report, config.output.stroke_width);
        let out = image_source::output_path(output_dir, path, "_traffic.png");
        annotated
            .save(&out)
            .with_context(|| format!("Failed to write {}", out.display()))?;
        info!("Annotated image: {}", out.display());
    }

    if config.output.write_json {
        let out = image_source::output_path(output_dir, path, "_traffic.json");
        let json = serde_json::to_string_pretty(&report)?;
        fs::write(&out, json).with_context(|| format!("Failed to write {}", out.display()))?;
        info!("Report: {}", out.display());
    }

    info!("Processed in {:.1} ms", start.elapsed().as_secs_f64() * 1000.0);
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_args_parse() {
        let args = Args::try_parse_from(["traffic-lines", "a.png", "shots", "--json", "-o", "out"]).unwrap();
        assert_eq!(args.inputs, vec![PathBuf::from("a.png"), PathBuf::from("shots")]);
        assert!(args.json);
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert_eq!(args.config, None);
    }

    #[test]
    fn test_args_explicit_config() {
        let args = Args::try_parse_from(["traffic-lines", "-c", "custom.yaml", "a.png"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("custom.yaml")));

        let err = Config::resolve(args.config.as_deref(), Path::new(DEFAULT_CONFIG)).unwrap_err();
        assert!(format!("{:#}", err).contains("custom.yaml"));
    }

    #[test]
    fn test_args_require_input() {
        assert!(Args::try_parse_from(["traffic-lines"]).is_err());
    }

    #[test]
    fn test_process_image_writes_outputs() {
        let dir = std::env::temp_dir().join("traffic_lines_process_test");
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();

        // Saturated red stroke on a gray background
        let mut image = RgbImage::from_pixel(200, 200, Rgb([128, 128, 128]));
        for x in 25..175 {
            image.put_pixel(x, 100, Rgb([240, 10, 10]));
        }
        let input = dir.join("map.png");
        image.save(&input).unwrap();

        let mut config = Config::default();
        config.output.output_dir = dir.join("out").display().to_string();
        config.output.write_json = true;

        let classifier = TrafficClassifier::new(config.classes.clone(), config.hough.clone());
        let report = process_image(&input, &classifier, &config).unwrap();

        assert_eq!(report.count(types::TrafficClass::Red), 1);
        assert!(dir.join("out/map_traffic.png").is_file());
        assert!(dir.join("out/map_traffic.json").is_file());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_process_image_rejects_undecodable_input() {
        let path = std::env::temp_dir().join("traffic_lines_garbage.png");
        fs::write(&path, b"garbage").unwrap();
        let mut config = Config::default();
        config.output.save_annotated = false;
        let result = process_image(&path, &TrafficClassifier::default(), &config);
        assert!(result.is_err());
        let _ = fs::remove_file(&path);
    }
}
