// SPDX-License-Identifier: GPL-3.0-only

//! Synthetic depth scene
//!
//! A camera looking straight down at a floor with an open box in the middle.
//! The box content rises and falls over time so the fullness readout can be
//! exercised without hardware. The frame border and a sparse speckle pattern
//! are left invalid (0), as a stereo matcher would.

use super::DepthSource;
use crate::constants;
use crate::depth::DepthFrame;
use crate::errors::AppResult;
use std::f32::consts::TAU;

/// Scene geometry, all distances in millimeters
#[derive(Debug, Clone)]
pub struct SyntheticScene {
    pub width: u32,
    pub height: u32,
    /// Distance from the camera to the inside floor of the box
    pub ground_mm: f32,
    /// Usable depth of the box
    pub box_height_mm: f32,
    /// Distance to the floor around the box
    pub floor_mm: f32,
    /// Box footprint in pixels `(xmin, ymin, xmax, ymax)`, exclusive max
    pub box_rect: (u32, u32, u32, u32),
    /// Frames per full empty-full-empty cycle
    pub period_frames: u32,
    /// Invalid margin width in pixels
    pub border_px: u32,
    pub hfov_deg: f32,
}

impl Default for SyntheticScene {
    fn default() -> Self {
        let (width, height) = (640, 400);
        Self {
            width,
            height,
            ground_mm: 1500.0,
            box_height_mm: constants::fullness::DEFAULT_BOX_HEIGHT_MM,
            floor_mm: 1600.0,
            box_rect: (width / 3, height / 3, 2 * width / 3, 2 * height / 3),
            period_frames: 300,
            border_px: 4,
            hfov_deg: constants::camera::DEFAULT_HFOV_DEG,
        }
    }
}

impl SyntheticScene {
    /// Content level as a fraction of the box height, in [0, 1]
    pub fn fill_fraction(&self, frame_index: u64) -> f32 {
        let period = self.period_frames.max(1) as u64;
        let phase = (frame_index % period) as f32 / period as f32;
        (1.0 - (phase * TAU).cos()) / 2.0
    }

    /// Distance to the content surface inside the box
    pub fn surface_mm(&self, frame_index: u64) -> f32 {
        self.ground_mm - self.fill_fraction(frame_index) * self.box_height_mm
    }

    /// Render one frame
    pub fn render(&self, frame_index: u64) -> AppResult<DepthFrame> {
        let surface = self.surface_mm(frame_index).round().max(0.0) as u16;
        let floor = self.floor_mm.round().max(0.0) as u16;
        let (bx0, by0, bx1, by1) = self.box_rect;
        let b = self.border_px;

        let mut data = Vec::with_capacity(self.width as usize * self.height as usize);
        for y in 0..self.height {
            for x in 0..self.width {
                let in_border =
                    x < b || y < b || x + b >= self.width || y + b >= self.height;
                let speckle = (x as u64 * 31 + y as u64 * 17 + frame_index % 97) % 97 == 0;
                let depth = if in_border || speckle {
                    constants::depth::INVALID_MM
                } else if (bx0..bx1).contains(&x) && (by0..by1).contains(&y) {
                    surface
                } else {
                    floor
                };
                data.push(depth);
            }
        }

        Ok(DepthFrame::new(self.width, self.height, data)?.with_hfov(self.hfov_deg))
    }
}

/// Endless source over a synthetic scene
pub struct SyntheticSource {
    scene: SyntheticScene,
    frame_index: u64,
}

impl SyntheticSource {
    pub fn new(scene: SyntheticScene) -> Self {
        Self {
            scene,
            frame_index: 0,
        }
    }
}

impl DepthSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn next_frame(&mut self) -> AppResult<DepthFrame> {
        let frame = self.scene.render(self.frame_index)?;
        self.frame_index += 1;
        Ok(frame)
    }

    fn hfov_degrees(&self) -> Option<f32> {
        Some(self.scene.hfov_deg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_cycle_endpoints() {
        let scene = SyntheticScene::default();
        assert!(scene.fill_fraction(0).abs() < 1e-6);
        assert!((scene.fill_fraction(150) - 1.0).abs() < 1e-6);
        assert!((scene.surface_mm(150) - (1500.0 - 730.0)).abs() < 1e-3);
    }

    #[test]
    fn test_render_layout() {
        let scene = SyntheticScene::default();
        let frame = scene.render(0).unwrap();
        assert_eq!(frame.width, 640);
        assert_eq!(frame.height, 400);
        assert_eq!(frame.get(0, 0), Some(0));
        assert_eq!(frame.hfov_deg, Some(scene.hfov_deg));
        // (320, 201) is inside the box and not on the speckle lattice
        assert_eq!(frame.get(320, 201), Some(1500));
        assert_eq!(frame.get(20, 20), Some(1600));
    }

    #[test]
    fn test_render_far_frame_index() {
        let scene = SyntheticScene::default();
        let frame = scene.render(u64::MAX).unwrap();
        assert_eq!(frame.get(0, 0), Some(0));
        assert_eq!(frame.get(20, 21).map(|d| d > 0), Some(true));
    }
}
