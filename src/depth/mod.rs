// SPDX-License-Identifier: GPL-3.0-only

//! Depth frames, regions and region statistics

pub mod frame;
pub mod roi;
pub mod stats;

pub use frame::DepthFrame;
pub use roi::{Centroid, RegionOfInterest, RoiBounds};
pub use stats::{DepthRange, RegionStats, mean, median, region_stats};
