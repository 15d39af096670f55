// SPDX-License-Identifier: GPL-3.0-only

//! Depth visualization helpers
//!
//! Maps millimeter depths to colours for the terminal viewer and snapshots:
//! - Turbo colormap (blue=near, red=far)
//! - Grayscale (bright=near, dark=far)
//!
//! Samples outside the valid range render black.

use crate::depth::{DepthFrame, DepthRange};

/// Colour mapping settings
#[derive(Debug, Clone, Copy)]
pub struct DepthColorizer {
    /// Depth mapped to the start of the scale
    pub near_mm: f32,
    /// Depth mapped to the end of the scale
    pub far_mm: f32,
    /// Samples outside this range are drawn black
    pub valid: DepthRange,
    pub grayscale: bool,
}

impl DepthColorizer {
    pub fn new(valid: DepthRange, grayscale: bool) -> Self {
        Self {
            near_mm: valid.low as f32,
            far_mm: valid.high as f32,
            valid,
            grayscale,
        }
    }

    /// Stretch the scale over the valid samples actually present in `frame`
    ///
    /// The default range (20 cm to 30 m) makes indoor scenes a single colour.
    pub fn fit_to_frame(mut self, frame: &DepthFrame) -> Self {
        let mut near = u16::MAX;
        let mut far = 0u16;
        for &d in frame.samples() {
            if self.valid.contains(d) {
                near = near.min(d);
                far = far.max(d);
            }
        }
        if far > near {
            self.near_mm = near as f32;
            self.far_mm = far as f32;
        }
        self
    }

    /// Colour of a single sample
    pub fn color(&self, depth: u16) -> [u8; 3] {
        if !self.valid.contains(depth) {
            return [0, 0, 0];
        }
        let span = (self.far_mm - self.near_mm).max(1.0);
        let t = ((depth as f32 - self.near_mm) / span).clamp(0.0, 1.0);
        if self.grayscale {
            let gray = ((1.0 - t) * 255.0) as u8;
            [gray, gray, gray]
        } else {
            turbo(t)
        }
    }

    /// Colourise a full frame to RGBA (4 bytes per pixel)
    pub fn frame_to_rgba(&self, frame: &DepthFrame) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(frame.samples().len() * 4);
        for &depth in frame.samples() {
            let [r, g, b] = self.color(depth);
            rgba.extend_from_slice(&[r, g, b, 255]);
        }
        rgba
    }
}

/// Turbo colormap: perceptually uniform rainbow (blue=near, red=far)
///
/// Based on: https://ai.googleblog.com/2019/08/turbo-improved-rainbow-colormap-for.html
/// Simplified version with polynomial approximation.
#[inline]
fn turbo(t: f32) -> [u8; 3] {
    let r = (0.13572138
        + t * (4.6153926 + t * (-42.66032 + t * (132.13108 + t * (-152.54825 + t * 59.28144)))))
        .clamp(0.0, 1.0);
    let g = (0.09140261
        + t * (2.19418 + t * (4.84296 + t * (-14.18503 + t * (4.27805 + t * 2.53377)))))
        .clamp(0.0, 1.0);
    let b = (0.1066733
        + t * (12.64194 + t * (-60.58204 + t * (109.99648 + t * (-82.52904 + t * 20.43388)))))
        .clamp(0.0, 1.0);
    [(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8]
}
