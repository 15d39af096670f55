// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use boxfill::constants::{self, AveragingMethod};

#[test]
fn test_thresholds_ordered() {
    assert!(constants::depth::THRESH_LOW_MM < constants::depth::THRESH_HIGH_MM);
    assert!(constants::depth::INVALID_MM < constants::depth::THRESH_LOW_MM);
}

#[test]
fn test_averaging_method_names() {
    // Every method has a name that parses back to itself
    for method in AveragingMethod::ALL {
        assert!(!method.display_name().is_empty());
        assert_eq!(
            AveragingMethod::from_name(method.display_name()),
            Some(method),
            "{} should parse from its display name",
            method
        );
    }
    assert_eq!(AveragingMethod::from_name("bogus"), None);
}

#[test]
fn test_averaging_method_apply() {
    let samples = [1000u16, 1000, 4000];
    assert_eq!(AveragingMethod::Mean.apply(&samples), 2000.0);
    assert_eq!(AveragingMethod::Median.apply(&samples), 1000.0);
    assert!(AveragingMethod::Mean.apply(&[]).is_nan());
}

#[test]
fn test_depth_image_extensions() {
    assert!(constants::file_formats::is_depth_image_extension("png"));
    assert!(constants::file_formats::is_depth_image_extension("TIFF"));
    assert!(!constants::file_formats::is_depth_image_extension("jpg"));
}

#[test]
fn test_version_not_empty() {
    assert!(!constants::app_info::version().is_empty());
}
