//! Spectral index and derived-quantity helpers shared by P1 and P3.
//!
//! Both passes recompute NDVI, NDSI, and whiteness from the same raw bands
//!; factoring them out keeps the two passes from drifting
//! out of sync with each other.

use crate::constants::{MINSIGMA, ZERO_DENOM_DEFAULT};

/// Normalized Difference Vegetation Index, `(NIR-RED)/(NIR+RED)`.
///
/// Falls back to [`ZERO_DENOM_DEFAULT`] when the denominator is
/// (numerically) zero.
#[inline]
#[must_use]
pub fn ndvi(nir: f64, red: f64) -> f64 {
    let denom = nir + red;
    if denom.abs() < MINSIGMA {
        ZERO_DENOM_DEFAULT
    } else {
        (nir - red) / denom
    }
}

/// Normalized Difference Snow Index, `(GREEN-SWIR1)/(GREEN+SWIR1)`.
///
/// Falls back to [`ZERO_DENOM_DEFAULT`] when the denominator is
/// (numerically) zero.
#[inline]
#[must_use]
pub fn ndsi(green: f64, swir1: f64) -> f64 {
    let denom = green + swir1;
    if denom.abs() < MINSIGMA {
        ZERO_DENOM_DEFAULT
    } else {
        (green - swir1) / denom
    }
}

/// Mean of the three visible bands.
#[inline]
#[must_use]
pub fn visi_mean(blue: f64, green: f64, red: f64) -> f64 {
    (blue + green + red) / 3.0
}

/// Mean absolute deviation of the visible bands from their mean, normalized
/// by the mean. Low values indicate achromatic bright surfaces (clouds).
///
/// Returns `100.0` (maximally "non-white") when `visi_mean` is exactly zero
/// — deliberately `100.0`, not [`ZERO_DENOM_DEFAULT`].
#[inline]
#[must_use]
pub fn whiteness(blue: f64, green: f64, red: f64, visi_mean: f64) -> f64 {
    if visi_mean == 0.0 {
        100.0
    } else {
        ((blue - visi_mean).abs() + (green - visi_mean).abs() + (red - visi_mean).abs()) / visi_mean
    }
}

/// Haze Optimized Transformation, `BLUE - 0.5*RED - 800`.
#[inline]
#[must_use]
pub fn hot(blue: f64, red: f64) -> f64 {
    blue - 0.5 * red - 800.0
}

/// `true` if any of blue/green/red is at or above `satu_value_max - 1` for
/// its band — the saturated-bright-visible test that also forces
/// `whiteness` to `0.0` when true.
#[inline]
#[must_use]
pub fn saturated_visible(
    blue: i16,
    green: i16,
    red: i16,
    satu_value_max_blue: i16,
    satu_value_max_green: i16,
    satu_value_max_red: i16,
) -> bool {
    blue >= satu_value_max_blue - 1
        || green >= satu_value_max_green - 1
        || red >= satu_value_max_red - 1
}

/// Approximate strict less-than, using [`MINSIGMA`] to stay safely away from
/// equality on boundary pixels.
#[inline]
#[must_use]
pub fn approx_lt(a: f64, b: f64) -> bool {
    a < b - MINSIGMA
}

/// Approximate strict greater-than, using [`MINSIGMA`].
#[inline]
#[must_use]
pub fn approx_gt(a: f64, b: f64) -> bool {
    a > b + MINSIGMA
}
