// SPDX-License-Identifier: GPL-3.0-only

//! Region of interest parsing and resolution against a frame
//!
//! A region is either a box given by four bounds or a single point. Points
//! are expanded to a small square so the depth is averaged over a
//! neighbourhood instead of a single noisy pixel.

use crate::errors::RoiError;
use serde::{Deserialize, Serialize};

/// Region of interest as given by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegionOfInterest {
    /// Single pixel, expanded to a square of half-width `delta`
    Point { x: i32, y: i32 },
    /// Box with exclusive upper bounds
    Rect {
        xmin: i32,
        ymin: i32,
        xmax: i32,
        ymax: i32,
    },
}

impl RegionOfInterest {
    /// Box from two corners in any order
    pub fn rect(x1: i32, y1: i32, x2: i32, y2: i32) -> Self {
        RegionOfInterest::Rect {
            xmin: x1.min(x2),
            ymin: y1.min(y2),
            xmax: x1.max(x2),
            ymax: y1.max(y2),
        }
    }

    pub fn point(x: i32, y: i32) -> Self {
        RegionOfInterest::Point { x, y }
    }

    /// Parse a flat list: 2 values are a point, 4 values a box
    pub fn from_values(values: &[i32]) -> Result<Self, RoiError> {
        match *values {
            [x, y] => Ok(Self::point(x, y)),
            [x1, y1, x2, y2] => Ok(Self::rect(x1, y1, x2, y2)),
            _ => Err(RoiError::InvalidShape(values.len())),
        }
    }

    /// Resolve to concrete pixel bounds inside a `width` x `height` frame
    ///
    /// Points are clamped so the `2 * delta` square stays inside the frame,
    /// boxes are clipped to the frame.
    pub fn resolve(&self, width: u32, height: u32, delta: u32) -> RoiBounds {
        let (w, h, d) = (width as i64, height as i64, delta as i64);
        let (xmin, ymin, xmax, ymax) = match *self {
            RegionOfInterest::Point { x, y } => {
                let cx = (x as i64).max(d).min(w - d);
                let cy = (y as i64).max(d).min(h - d);
                (cx - d, cy - d, cx + d, cy + d)
            }
            RegionOfInterest::Rect {
                xmin,
                ymin,
                xmax,
                ymax,
            } => (
                (xmin as i64).min(xmax as i64),
                (ymin as i64).min(ymax as i64),
                (xmin as i64).max(xmax as i64),
                (ymin as i64).max(ymax as i64),
            ),
        };

        RoiBounds {
            xmin: xmin.clamp(0, w) as u32,
            ymin: ymin.clamp(0, h) as u32,
            xmax: xmax.clamp(0, w) as u32,
            ymax: ymax.clamp(0, h) as u32,
        }
    }
}

impl std::fmt::Display for RegionOfInterest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegionOfInterest::Point { x, y } => write!(f, "point({}, {})", x, y),
            RegionOfInterest::Rect {
                xmin,
                ymin,
                xmax,
                ymax,
            } => write!(f, "rect({}, {})-({}, {})", xmin, ymin, xmax, ymax),
        }
    }
}

/// Pixel bounds inside a frame, `[xmin, xmax) x [ymin, ymax)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoiBounds {
    pub xmin: u32,
    pub ymin: u32,
    pub xmax: u32,
    pub ymax: u32,
}

impl RoiBounds {
    pub fn width(&self) -> u32 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> u32 {
        self.ymax - self.ymin
    }

    /// Number of samples covered
    pub fn area(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Integer center of the bounds
    pub fn centroid(&self) -> Centroid {
        Centroid {
            x: (self.xmin + self.xmax) / 2,
            y: (self.ymin + self.ymax) / 2,
        }
    }
}

/// Integer pixel center of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Centroid {
    pub x: u32,
    pub y: u32,
}
