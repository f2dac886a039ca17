//! Binary-stable bit layouts for the three scene-wide masks.
//!
//! Callers may persist `pixel_mask` and `conf_mask` values, so the numeric
//! values here are fixed within a release. `clear_mask` is
//! engine-internal scratch and never leaves the crate.

/// `pixel_mask` bit layout: non-overlapping semantic flags, though several
/// may be set transiently before a later pass resolves conflicts (e.g.
/// `WATER` and `CLOUD` are mutually exclusive only from P6 onward).
pub mod pixel {
    /// Pixel lies outside the sensor footprint or was flagged invalid
    /// upstream. Implies no other bit is set.
    pub const FILL: u8 = 0b0000_0001;
    /// Pixel is classified as cloud.
    pub const CLOUD: u8 = 0b0000_0010;
    /// Pixel is classified as cloud shadow.
    pub const SHADOW: u8 = 0b0000_0100;
    /// Pixel is classified as snow/ice.
    pub const SNOW: u8 = 0b0000_1000;
    /// Pixel is classified as water.
    pub const WATER: u8 = 0b0001_0000;
}

/// `conf_mask` enum values.
pub mod conf {
    /// No confidence assigned yet (only valid before P4 runs, or during the
    /// all-cloud shortcut where `conf_mask` is left undefined by design).
    pub const NONE: u8 = 0;
    /// Low cloud confidence.
    pub const LOW: u8 = 1;
    /// Medium cloud confidence.
    pub const MED: u8 = 2;
    /// High cloud confidence.
    pub const HIGH: u8 = 3;
    /// Sentinel for fill pixels.
    pub const FILL_PIXEL: u8 = 255;
}

/// `clear_mask` scratch bit layout.
///
/// Mutually consistent: a pixel has at most one of (`CLEAR_FILL`,
/// `CLEAR ∧ LAND`, `CLEAR ∧ WATER`, none = cloud). `LAND` here is modeled as
/// the *absence* of `CLEAR_WATER` alongside `CLEAR`, matching how P1 sets it
///: `CLEAR` is always set together with exactly one of
/// `CLEAR_LAND` / `CLEAR_WATER`.
pub mod clear {
    /// Pixel is a fill pixel (mirrors `pixel::FILL`).
    pub const CLEAR_FILL: u8 = 0b0001;
    /// Pixel is not cloud.
    pub const CLEAR: u8 = 0b0010;
    /// Pixel is clear and classified as land.
    pub const CLEAR_LAND: u8 = 0b0100;
    /// Pixel is clear and classified as water.
    pub const CLEAR_WATER: u8 = 0b1000;
}

/// Returns `true` if `value & flag == flag`.
#[inline]
#[must_use]
pub fn has(value: u8, flag: u8) -> bool {
    value & flag == flag
}
