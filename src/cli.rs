// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for depth measurement
//!
//! This module provides command-line functionality for:
//! - Measuring region spatials in a depth image
//! - Estimating box fullness from calibration readings
//! - Watching a region over a stream of frames
//! - Writing synthetic test frames

use boxfill::backends::file_source::{load_depth_image, write_depth_image};
use boxfill::backends::{DepthSource, SyntheticScene, open_source};
use boxfill::session::{Measurement, Session};
use boxfill::{AveragingMethod, Config, DepthFrame, RegionOfInterest};
use clap::Args;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tracing::{debug, info, warn};

type CliResult = Result<(), Box<dyn std::error::Error>>;

/// Region given on the command line
#[derive(Args, Debug, Clone)]
pub struct RoiArg {
    /// Region: x,y for a point or x1,y1,x2,y2 for a rectangle
    #[arg(
        long,
        required = true,
        value_delimiter = ',',
        allow_negative_numbers = true
    )]
    pub roi: Vec<i32>,
}

impl RoiArg {
    fn region(&self) -> Result<RegionOfInterest, Box<dyn std::error::Error>> {
        Ok(RegionOfInterest::from_values(&self.roi)?)
    }
}

/// Calculator overrides shared by the measuring commands
#[derive(Args, Debug, Clone, Default)]
pub struct CalcArgs {
    /// Horizontal field of view in degrees
    #[arg(long)]
    pub hfov: Option<f32>,

    /// Lower depth threshold in millimeters
    #[arg(long)]
    pub low: Option<u16>,

    /// Upper depth threshold in millimeters
    #[arg(long)]
    pub high: Option<u16>,

    /// Half-width of the square sampled around a point
    #[arg(long)]
    pub delta: Option<u32>,

    /// Depth averaging: mean or median
    #[arg(long, value_parser = parse_averaging)]
    pub averaging: Option<AveragingMethod>,

    /// Box height in millimeters for the fill level
    #[arg(long)]
    pub box_height: Option<f32>,
}

impl CalcArgs {
    fn apply(&self, config: &mut Config) {
        if let Some(hfov) = self.hfov {
            config.hfov_deg = hfov;
        }
        if let Some(low) = self.low {
            config.thresh_low_mm = low;
        }
        if let Some(high) = self.high {
            config.thresh_high_mm = high;
        }
        if let Some(delta) = self.delta {
            config.point_delta = delta;
        }
        if let Some(averaging) = self.averaging {
            config.averaging = averaging;
        }
        if let Some(box_height) = self.box_height {
            config.box_height_mm = box_height;
        }
    }
}

fn parse_averaging(name: &str) -> Result<AveragingMethod, String> {
    AveragingMethod::from_name(name).ok_or_else(|| {
        format!(
            "unknown averaging method '{}' (expected mean or median)",
            name
        )
    })
}

/// Calibration reading: a known distance or a frame to measure it from
#[derive(Debug, Clone)]
pub enum Reference {
    Depth(f32),
    Frame(PathBuf),
}

impl Reference {
    pub fn from_args(depth_mm: Option<f32>, frame: Option<PathBuf>) -> Option<Self> {
        match (depth_mm, frame) {
            (Some(mm), _) => Some(Reference::Depth(mm)),
            (None, Some(path)) => Some(Reference::Frame(path)),
            (None, None) => None,
        }
    }

    fn resolve(
        &self,
        session: &Session,
        roi: RegionOfInterest,
    ) -> Result<f32, Box<dyn std::error::Error>> {
        match self {
            Reference::Depth(mm) => Ok(*mm),
            Reference::Frame(path) => {
                let frame = load_depth_image(path)?;
                let measurement = session.measure_roi(&frame, roi);
                info!(
                    reference = %path.display(),
                    depth_mm = measurement.spatials.z,
                    valid = measurement.spatials.valid_points,
                    "Measured calibration reference"
                );
                if !measurement.spatials.has_depth() {
                    return Err(format!(
                        "{}: no valid depth in {}",
                        path.display(),
                        measurement.roi
                    )
                    .into());
                }
                Ok(measurement.spatials.z)
            }
        }
    }
}

/// Options for the watch loop
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub frames: Option<u64>,
    pub interval_ms: u64,
    pub empty_mm: Option<f32>,
    pub full_mm: Option<f32>,
    pub json: bool,
}

/// Load the config file and apply command-line overrides
fn load_config(path: &Path, calc: &CalcArgs) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = Config::load_or_default(path);
    calc.apply(&mut config);
    config.validate()?;
    debug!(?config, "Effective configuration");
    Ok(config)
}

fn print_measurement(measurement: &Measurement, json: bool) -> CliResult {
    if json {
        println!("{}", serde_json::to_string(measurement)?);
    } else {
        println!(
            "ROI: {}  centroid ({}, {})",
            measurement.roi, measurement.centroid.x, measurement.centroid.y
        );
        for line in measurement.report_lines() {
            println!("  {}", line);
        }
    }
    Ok(())
}

/// Measure the spatial coordinates of a region in one depth image
pub fn measure(
    config_path: &Path,
    input: &Path,
    roi: &RoiArg,
    calc: &CalcArgs,
    json: bool,
) -> CliResult {
    let config = load_config(config_path, calc)?;
    let roi = roi.region()?;
    let frame = load_depth_image(input)?;
    info!(input = %input.display(), width = frame.width, height = frame.height, "Loaded depth image");

    let session = Session::new(&config);
    let measurement = session.measure_roi(&frame, roi);
    print_measurement(&measurement, json)
}

/// Estimate how full the box is in `input` from empty and full references
pub fn fill(
    config_path: &Path,
    input: &Path,
    roi: &RoiArg,
    empty: Option<Reference>,
    full: Option<Reference>,
    calc: &CalcArgs,
    json: bool,
) -> CliResult {
    let config = load_config(config_path, calc)?;
    let roi = roi.region()?;
    let mut session = Session::new(&config);

    let Some(empty) = empty else {
        return Err("an empty-box reference is required (--empty-mm or --empty-frame)".into());
    };
    let ground = empty.resolve(&session, roi)?;
    session.analyzer.calibrate_ground(ground)?;

    if let Some(full) = full {
        let full_depth = full.resolve(&session, roi)?;
        session.analyzer.calibrate_full_box(full_depth)?;
    } else {
        warn!("No full-box reference given, fullness is unavailable");
    }

    let frame = load_depth_image(input)?;
    let measurement = session.measure_roi(&frame, roi);
    print_measurement(&measurement, json)?;

    if !json && measurement.fullness.is_none() {
        println!("  Fullness: unavailable");
    }
    Ok(())
}

/// Measure a region on every frame of a source until stopped
pub fn watch(
    config_path: &Path,
    input: Option<&Path>,
    roi: &RoiArg,
    options: WatchOptions,
    calc: &CalcArgs,
) -> CliResult {
    let config = load_config(config_path, calc)?;
    let roi = roi.region()?;
    let mut source = open_source(input, &config)?;

    let mut session = Session::new(&config);
    if let Some(hfov) = source.hfov_degrees() {
        session.calculator.set_hfov_deg(hfov);
    }
    session.selector.set(roi);
    if let Some(empty) = options.empty_mm {
        session.analyzer.calibrate_ground(empty)?;
    }
    if let Some(full) = options.full_mm {
        session.analyzer.calibrate_full_box(full)?;
    }

    // Set up Ctrl+C handler
    let stop_flag = Arc::new(AtomicBool::new(false));
    let stop_flag_clone = stop_flag.clone();
    ctrlc::set_handler(move || {
        stop_flag_clone.store(true, Ordering::SeqCst);
    })?;

    if !options.json {
        println!("Watching {} from {} (Ctrl+C to stop)", roi, source.name());
    }

    let count = watch_frames(source.as_mut(), &session, &options, &stop_flag)?;
    info!(frames = count, "Watch finished");
    Ok(())
}

/// Measure frames until stopped or the frame limit is reached, returning the count
fn watch_frames(
    source: &mut dyn DepthSource,
    session: &Session,
    options: &WatchOptions,
    stop_flag: &AtomicBool,
) -> Result<u64, Box<dyn std::error::Error>> {
    let interval = Duration::from_millis(options.interval_ms);
    let limit_reached = |count: u64| options.frames.is_some_and(|limit| count >= limit);

    let mut count = 0u64;
    while !stop_flag.load(Ordering::SeqCst) && !limit_reached(count) {
        let frame = source.next_frame()?;
        if let Some(measurement) = session.measure(&frame) {
            print_watch_line(count, &measurement, options.json)?;
        }
        count += 1;

        if !limit_reached(count) {
            std::thread::sleep(interval);
        }
    }
    Ok(count)
}

fn print_watch_line(index: u64, measurement: &Measurement, json: bool) -> CliResult {
    if json {
        println!("{}", serde_json::to_string(measurement)?);
        return Ok(());
    }

    let s = &measurement.spatials;
    let fullness = measurement
        .fullness
        .map(|f| format!("{:.1}%", f))
        .unwrap_or_else(|| "--".to_string());
    println!(
        "[{:>5}] Z {:>8}  X {:>8}  Y {:>8}  valid {}/{}  fullness {}",
        index,
        boxfill::session::format_mm(s.z),
        boxfill::session::format_mm(s.x),
        boxfill::session::format_mm(s.y),
        s.valid_points,
        s.total_points,
        fullness
    );
    Ok(())
}

/// Start the interactive terminal viewer
pub fn terminal(
    config_path: &Path,
    input: Option<&Path>,
    roi: &[i32],
    calc: &CalcArgs,
) -> CliResult {
    let config = load_config(config_path, calc)?;
    let initial_roi = if roi.is_empty() {
        None
    } else {
        Some(RegionOfInterest::from_values(roi)?)
    };
    let source = open_source(input, &config)?;
    boxfill::terminal::run(source, &config, initial_roi)
}

/// Write frames of the synthetic fill cycle as 16-bit PNGs
pub fn synth(config_path: &Path, output: &Path, start: u64, count: u64) -> CliResult {
    let config = Config::load_or_default(config_path);
    let scene = SyntheticScene {
        hfov_deg: config.hfov_deg,
        box_height_mm: config.box_height_mm,
        ..SyntheticScene::default()
    };

    if count <= 1 {
        let frame = scene.render(start)?;
        write_depth_image(&frame, output)?;
        print_synth_frame(output, &scene, start, &frame);
        return Ok(());
    }

    let end = start
        .checked_add(count)
        .ok_or_else(|| format!("frame range {} + {} is out of range", start, count))?;

    std::fs::create_dir_all(output)?;
    for index in start..end {
        let frame = scene.render(index)?;
        let path = output.join(format!("depth_{:05}.png", index));
        write_depth_image(&frame, &path)?;
        print_synth_frame(&path, &scene, index, &frame);
    }
    println!("Wrote {} frames to {}", count, output.display());
    Ok(())
}

fn print_synth_frame(path: &Path, scene: &SyntheticScene, index: u64, frame: &DepthFrame) {
    println!(
        "{} ({}x{}, surface {:.0}mm, fill {:.0}%)",
        path.display(),
        frame.width,
        frame.height,
        scene.surface_mm(index),
        scene.fill_fraction(index) * 100.0
    );
}

/// Print the config file location and contents, optionally resetting it
pub fn show_config(config_path: &Path, reset: bool) -> CliResult {
    if reset {
        Config::default().save_to(config_path)?;
        println!("Reset {}", config_path.display());
    }

    let config = Config::load_or_default(config_path);
    println!("Config file: {}", config_path.display());
    if !config_path.exists() {
        println!("(not written yet, showing defaults)");
    }
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use boxfill::backends::SyntheticSource;

    #[test]
    fn test_parse_averaging() {
        assert_eq!(parse_averaging("median"), Ok(AveragingMethod::Median));
        assert_eq!(parse_averaging("avg"), Ok(AveragingMethod::Mean));
        assert!(parse_averaging("mode").is_err());
    }

    #[test]
    fn test_calc_args_override_config() {
        let args = CalcArgs {
            hfov: Some(90.0),
            low: Some(300),
            averaging: Some(AveragingMethod::Median),
            ..CalcArgs::default()
        };
        let mut config = Config::default();
        args.apply(&mut config);

        assert_eq!(config.hfov_deg, 90.0);
        assert_eq!(config.thresh_low_mm, 300);
        assert_eq!(config.thresh_high_mm, Config::default().thresh_high_mm);
        assert_eq!(config.averaging, AveragingMethod::Median);
    }

    #[test]
    fn test_reference_prefers_depth() {
        let reference = Reference::from_args(Some(1500.0), Some(PathBuf::from("x.png")));
        assert!(matches!(reference, Some(Reference::Depth(d)) if d == 1500.0));
        assert!(Reference::from_args(None, None).is_none());
    }

    #[test]
    fn test_roi_arg_shapes() {
        let point = RoiArg { roi: vec![10, 20] };
        assert_eq!(point.region().unwrap(), RegionOfInterest::point(10, 20));
        let bad = RoiArg { roi: vec![1, 2, 3] };
        assert!(bad.region().is_err());
    }

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("boxfill_cli_{}_{}", tag, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_frame_reference_measures_region() {
        let dir = temp_dir("reference");
        let path = dir.join("empty.png");
        write_depth_image(&DepthFrame::filled(40, 30, 1400), &path).unwrap();

        let session = Session::new(&Config::default());
        let depth = Reference::Frame(path)
            .resolve(&session, RegionOfInterest::point(20, 15))
            .unwrap();
        assert_eq!(depth, 1400.0);
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_frame_reference_without_depth_is_rejected() {
        let dir = temp_dir("blank_reference");
        let path = dir.join("blank.png");
        write_depth_image(&DepthFrame::filled(40, 30, 0), &path).unwrap();

        let session = Session::new(&Config::default());
        let result = Reference::Frame(path).resolve(&session, RegionOfInterest::point(20, 15));
        assert!(result.is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_config_reset_writes_defaults() {
        let dir = temp_dir("reset");
        let path = dir.join("config.json");
        let custom = Config {
            point_delta: 9,
            ..Config::default()
        };
        custom.save_to(&path).unwrap();

        show_config(&path, true).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_synth_rejects_overflowing_range() {
        let dir = temp_dir("synth_overflow");
        let result = synth(&dir.join("config.json"), &dir.join("frames"), u64::MAX, 2);
        assert!(result.is_err());
        assert!(!dir.join("frames").exists());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_watch_stops_at_frame_limit_without_trailing_pause() {
        let mut source = SyntheticSource::new(SyntheticScene::default());
        let mut session = Session::new(&Config::default());
        session.selector.set(RegionOfInterest::point(320, 200));
        let options = WatchOptions {
            frames: Some(1),
            interval_ms: 5_000,
            empty_mm: None,
            full_mm: None,
            json: true,
        };

        let started = std::time::Instant::now();
        let stop_flag = AtomicBool::new(false);
        let count = watch_frames(&mut source, &session, &options, &stop_flag).unwrap();
        assert_eq!(count, 1);
        assert!(started.elapsed() < Duration::from_millis(2_500));
    }

    #[test]
    fn test_watch_honours_stop_flag() {
        let mut source = SyntheticSource::new(SyntheticScene::default());
        let session = Session::new(&Config::default());
        let options = WatchOptions {
            frames: None,
            interval_ms: 0,
            empty_mm: None,
            full_mm: None,
            json: true,
        };

        let stop_flag = AtomicBool::new(true);
        let count = watch_frames(&mut source, &session, &options, &stop_flag).unwrap();
        assert_eq!(count, 0);
    }
}
