//! P6 — shadow assignment and water/cloud disambiguation.
//!
//! Derives a shadow probability surface from how far the observed NIR/SWIR1
//! fall below their reconstructed backgrounds and thresholds it to set
//! `SHADOW` on every non-fill pixel, cloud or not. Independently of that,
//! resolves pixels the earlier passes left marked both `WATER` and `CLOUD`
//! in favor of cloud.

use crate::mask::pixel;

/// Per-pixel shadow probability: the background-minus-observed gap, taking
/// the more conservative (smaller) of the NIR and SWIR1 channels.
#[must_use]
pub fn shadow_probability(nir: i16, filled_nir: i16, swir1: i16, filled_swir1: i16) -> f64 {
    let new_nir = (filled_nir - nir) as f64;
    let new_swir1 = (filled_swir1 - swir1) as f64;
    new_nir.min(new_swir1)
}

/// The fixed shadow-probability threshold (DN units) above which a non-cloud
/// pixel is classified `SHADOW`.
pub const SHADOW_PROB_THRESHOLD: f64 = 200.0;

/// Applies shadow assignment and water/cloud disambiguation to every
/// non-fill pixel in one pass over the in-memory rasters.
///
/// `nir`/`swir1` are the saturation-substituted observed rasters (reused
/// from [`super::p5_background::P5Rasters`]); `filled_nir`/`filled_swir1`
/// are their flood-fill reconstructions. All four plus `pixel_mask` must be
/// `pixel_count()` long.
pub fn run(pixel_mask: &mut [u8], nir: &[i16], filled_nir: &[i16], swir1: &[i16], filled_swir1: &[i16]) {
    for idx in 0..pixel_mask.len() {
        if pixel_mask[idx] & pixel::FILL != 0 {
            continue;
        }

        let prob = shadow_probability(nir[idx], filled_nir[idx], swir1[idx], filled_swir1[idx]);
        if prob > SHADOW_PROB_THRESHOLD {
            pixel_mask[idx] |= pixel::SHADOW;
        }

        if pixel_mask[idx] & pixel::WATER != 0 && pixel_mask[idx] & pixel::CLOUD != 0 {
            // Ambiguous pixels resolve to cloud; water was only ever a
            // provisional P1 call.
            pixel_mask[idx] &= !pixel::WATER;
        }
    }
}
