// SPDX-License-Identifier: GPL-3.0-only

//! Drag-to-select region state
//!
//! Press starts a selection, drag updates the live corner, release commits an
//! ordered box. Coordinates are frame pixels.

use crate::depth::RegionOfInterest;

#[derive(Debug, Clone, Default)]
pub struct RoiSelector {
    roi: Option<RegionOfInterest>,
    drawing: bool,
    start_point: Option<(i32, i32)>,
    end_point: Option<(i32, i32)>,
}

impl RoiSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed region, if any
    pub fn roi(&self) -> Option<RegionOfInterest> {
        self.roi
    }

    pub fn is_drawing(&self) -> bool {
        self.drawing
    }

    /// Box being dragged, for preview while the button is held
    pub fn pending(&self) -> Option<RegionOfInterest> {
        if !self.drawing {
            return None;
        }
        let ((x1, y1), (x2, y2)) = (self.start_point?, self.end_point?);
        Some(RegionOfInterest::rect(x1, y1, x2, y2))
    }

    pub fn press(&mut self, x: i32, y: i32) {
        self.drawing = true;
        self.start_point = Some((x, y));
        self.end_point = Some((x, y));
    }

    pub fn drag(&mut self, x: i32, y: i32) {
        if self.drawing {
            self.end_point = Some((x, y));
        }
    }

    /// Commit the selection; a release without a press is ignored
    pub fn release(&mut self, x: i32, y: i32) {
        if !self.drawing {
            return;
        }
        self.drawing = false;
        self.end_point = Some((x, y));
        if let Some((x1, y1)) = self.start_point {
            self.roi = Some(RegionOfInterest::rect(x1, y1, x, y));
        }
    }

    /// Set a region directly (from the command line)
    pub fn set(&mut self, roi: RegionOfInterest) {
        self.roi = Some(roi);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_order_independent() {
        let mut selector = RoiSelector::new();
        selector.press(40, 30);
        selector.drag(20, 25);
        assert!(selector.is_drawing());
        assert_eq!(
            selector.pending(),
            Some(RegionOfInterest::rect(20, 25, 40, 30))
        );
        selector.release(10, 50);
        assert!(!selector.is_drawing());
        assert_eq!(
            selector.roi(),
            Some(RegionOfInterest::Rect {
                xmin: 10,
                ymin: 30,
                xmax: 40,
                ymax: 50
            })
        );
    }

    #[test]
    fn test_release_without_press_ignored() {
        let mut selector = RoiSelector::new();
        selector.release(5, 5);
        assert_eq!(selector.roi(), None);
    }

    #[test]
    fn test_clear() {
        let mut selector = RoiSelector::new();
        selector.press(0, 0);
        selector.release(5, 5);
        selector.clear();
        assert_eq!(selector.roi(), None);
        assert!(!selector.is_drawing());
        assert_eq!(selector.pending(), None);
    }
}
