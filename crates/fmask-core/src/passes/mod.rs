//! The six-pass pipeline plus the all-cloud shortcut.
//!
//! Each submodule owns one pass. Passes are deliberately kept sequential and
//! un-collapsed — later passes depend on scene-wide
//! statistics only a prior full scan can produce.

pub mod p1_classify;
pub mod p2_temperature;
pub mod p3_probability;
pub mod p4_threshold;
pub mod p5_background;
pub mod p6_shadow;

pub use p1_classify::{P1Counters, P1Stats};
pub use p2_temperature::P2Stats;
pub use p4_threshold::P4Thresholds;
pub use p5_background::{P5Boundaries, P5Rasters};
