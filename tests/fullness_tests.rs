// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for box fullness estimation

use boxfill::backends::file_source::{load_depth_image, write_depth_image};
use boxfill::depth::{DepthFrame, RegionOfInterest};
use boxfill::errors::{AppError, CalibrationError};
use boxfill::session::{CalibrationTarget, Session};
use boxfill::{BoxAnalyzer, CalibrationState, Config};

fn calibrated(ground_mm: f32, full_mm: f32) -> BoxAnalyzer {
    let mut analyzer = BoxAnalyzer::default();
    analyzer.calibrate_ground(ground_mm).unwrap();
    analyzer.calibrate_full_box(full_mm).unwrap();
    analyzer
}

#[test]
fn test_fullness_unavailable_until_calibrated() {
    let mut analyzer = BoxAnalyzer::default();
    assert_eq!(analyzer.calculate_fullness(1000.0), None);

    analyzer.calibrate_ground(1500.0).unwrap();
    assert_eq!(analyzer.calculate_fullness(1000.0), None);

    analyzer.calibrate_full_box(800.0).unwrap();
    assert!(analyzer.calculate_fullness(1000.0).is_some());
}

#[test]
fn test_fullness_endpoints() {
    let analyzer = calibrated(1500.0, 800.0);
    assert_eq!(analyzer.calculate_fullness(1500.0), Some(0.0));
    assert_eq!(analyzer.calculate_fullness(800.0), Some(100.0));
    assert_eq!(analyzer.calculate_fullness(1150.0), Some(50.0));
}

#[test]
fn test_fullness_is_clamped() {
    let analyzer = calibrated(1500.0, 800.0);
    assert_eq!(analyzer.calculate_fullness(2000.0), Some(0.0));
    assert_eq!(analyzer.calculate_fullness(100.0), Some(100.0));
}

#[test]
fn test_fullness_decreases_with_depth() {
    let analyzer = calibrated(1500.0, 800.0);
    let mut previous = f32::INFINITY;
    for depth in (700..=1600).step_by(50) {
        let fullness = analyzer.calculate_fullness(depth as f32).unwrap();
        assert!(fullness <= previous, "fullness rose at {}mm", depth);
        assert!((0.0..=100.0).contains(&fullness));
        previous = fullness;
    }
}

#[test]
fn test_full_before_ground_is_rejected() {
    let mut analyzer = BoxAnalyzer::default();
    assert_eq!(
        analyzer.calibrate_full_box(800.0),
        Err(CalibrationError::GroundNotCalibrated)
    );
    assert_eq!(analyzer.state(), CalibrationState::Uncalibrated);
}

#[test]
fn test_equal_readings_make_fullness_unavailable() {
    let analyzer = calibrated(1200.0, 1200.0);
    assert_eq!(analyzer.calculate_fullness(1200.0), None);
}

#[test]
fn test_session_calibrates_from_frames() {
    let mut session = Session::new(&Config::default());
    session.selector.set(RegionOfInterest::rect(10, 10, 30, 30));

    let empty = DepthFrame::filled(64, 48, 1500);
    let full = DepthFrame::filled(64, 48, 800);
    let half = DepthFrame::filled(64, 48, 1150);

    assert_eq!(
        session.calibrate(&empty, CalibrationTarget::Ground).unwrap(),
        Some(1500.0)
    );
    assert_eq!(
        session.calibrate(&full, CalibrationTarget::Full).unwrap(),
        Some(800.0)
    );

    let measurement = session.measure(&half).unwrap();
    assert_eq!(measurement.fullness, Some(50.0));
    assert_eq!(measurement.ground_mm, Some(1500.0));
    assert_eq!(measurement.full_mm, Some(800.0));
}

#[test]
fn test_session_rejects_reading_without_signal() {
    let mut session = Session::new(&Config::default());
    session.selector.set(RegionOfInterest::point(20, 20));

    let blank = DepthFrame::filled(64, 48, 0);
    let err = session.calibrate(&blank, CalibrationTarget::Ground).unwrap_err();
    assert!(matches!(
        err,
        AppError::Calibration(CalibrationError::InvalidReading(_))
    ));
    assert_eq!(session.analyzer.state(), CalibrationState::Uncalibrated);
}

#[test]
fn test_session_calibrates_from_saved_images() {
    let dir = std::env::temp_dir().join(format!("boxfill_fullness_{}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    write_depth_image(&DepthFrame::filled(64, 48, 1600), &dir.join("empty.png")).unwrap();
    write_depth_image(&DepthFrame::filled(64, 48, 900), &dir.join("full.png")).unwrap();
    write_depth_image(&DepthFrame::filled(64, 48, 1425), &dir.join("current.png")).unwrap();

    let mut session = Session::new(&Config::default());
    session.selector.set(RegionOfInterest::point(32, 24));

    let empty = load_depth_image(&dir.join("empty.png")).unwrap();
    let full = load_depth_image(&dir.join("full.png")).unwrap();
    session.calibrate(&empty, CalibrationTarget::Ground).unwrap();
    session.calibrate(&full, CalibrationTarget::Full).unwrap();

    let current = load_depth_image(&dir.join("current.png")).unwrap();
    let measurement = session.measure(&current).unwrap();
    assert_eq!(measurement.fullness, Some(25.0));
    assert_eq!(measurement.fill_level_mm, Some(730.0 * 0.25));

    let _ = std::fs::remove_dir_all(&dir);
}
