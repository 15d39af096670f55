// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for configuration module

use boxfill::{AveragingMethod, Config};

fn temp_config_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir()
        .join(format!("boxfill_config_{}_{}", name, std::process::id()))
        .join("config.json")
}

#[test]
fn test_config_default() {
    // Defaults mirror the measurement constants
    let config = Config::default();

    assert_eq!(config.thresh_low_mm, 200);
    assert_eq!(config.thresh_high_mm, 30_000);
    assert_eq!(config.point_delta, 5);
    assert_eq!(config.averaging, AveragingMethod::Mean);
    assert!(config.validate().is_ok(), "Default config should be valid");
}

#[test]
fn test_config_save_and_load() {
    let path = temp_config_path("roundtrip");
    let config = Config {
        hfov_deg: 68.7,
        averaging: AveragingMethod::Median,
        grayscale: true,
        ..Config::default()
    };

    config.save_to(&path).unwrap();
    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded, config);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn test_config_partial_file_uses_defaults() {
    // Missing fields fall back to defaults
    let path = temp_config_path("partial");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, r#"{ "thresh_low_mm": 400 }"#).unwrap();

    let loaded = Config::load_from(&path).unwrap();
    assert_eq!(loaded.thresh_low_mm, 400);
    assert_eq!(loaded.thresh_high_mm, Config::default().thresh_high_mm);

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn test_config_invalid_file_falls_back() {
    let path = temp_config_path("invalid");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, r#"{ "thresh_low_mm": 5000, "thresh_high_mm": 100 }"#).unwrap();

    assert!(Config::load_from(&path).is_err());
    assert_eq!(Config::load_or_default(&path), Config::default());

    let _ = std::fs::remove_dir_all(path.parent().unwrap());
}

#[test]
fn test_config_missing_file_falls_back() {
    let path = temp_config_path("missing");
    assert!(Config::load_from(&path).is_err());
    assert_eq!(Config::load_or_default(&path), Config::default());
}

#[test]
fn test_config_rejects_bad_fov() {
    for hfov_deg in [0.0, -10.0, 180.0, f32::NAN] {
        let config = Config {
            hfov_deg,
            ..Config::default()
        };
        assert!(config.validate().is_err(), "hfov {} should be rejected", hfov_deg);
    }
}

#[test]
fn test_config_rejects_empty_point_window() {
    let config = Config {
        point_delta: 0,
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_config_rejects_bad_box_height() {
    for box_height_mm in [0.0, -5.0, f32::NAN, f32::INFINITY] {
        let config = Config {
            box_height_mm,
            ..Config::default()
        };
        assert!(
            config.validate().is_err(),
            "box height {} should be rejected",
            box_height_mm
        );
    }
}
