//! P4 — dynamic thresholds and confidence assignment.
//!
//! Gathers the compact `final_prob`/`wfinal_prob` samples at clear
//! land/water pixels, derives a dynamic threshold from their 82.5th
//! percentile plus `cloud_prob_threshold`, then makes the final per-pixel
//! confidence call — which also rewrites the `CLOUD` bit.

use crate::collaborators::{Percentile2Service, RowSource};
use crate::error::EngineError;
use crate::image::ImageDescriptor;
use crate::mask::{conf, pixel};

/// The two dynamic cloud-probability thresholds P4 derives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct P4Thresholds {
    /// Land cloud-probability threshold.
    pub clr_mask: f64,
    /// Water cloud-probability threshold.
    pub wclr_mask: f64,
}

fn gather(values: &[f32], mask: &[u8], bit: u8) -> (Vec<f32>, f32, f32) {
    let mut out = Vec::new();
    let mut min = f32::MAX;
    let mut max = f32::MIN;
    for (idx, &m) in mask.iter().enumerate() {
        if m & bit == bit {
            let v = values[idx];
            out.push(v);
            min = min.min(v);
            max = max.max(v);
        }
    }
    if out.is_empty() {
        min = 0.0;
        max = 0.0;
    }
    (out, min, max)
}

/// Derives `clr_mask`/`wclr_mask` from the compact land/water probability
/// samples.
pub fn thresholds<P: Percentile2Service>(
    final_prob: &[f32],
    wfinal_prob: &[f32],
    clear_mask: &[u8],
    land_bit: u8,
    water_bit: u8,
    cloud_prob_threshold: f64,
    percentile: &P,
) -> Result<P4Thresholds, EngineError> {
    let (prob, pmin, pmax) = gather(final_prob, clear_mask, land_bit);
    let (wprob, wmin, wmax) = gather(wfinal_prob, clear_mask, water_bit);

    let land_pct = percentile
        .prctile2(&prob, pmin, pmax, 82.5)
        .map_err(|_| EngineError::PercentileFailure { reason: "land probability percentile".into() })?;
    let water_pct = percentile
        .prctile2(&wprob, wmin, wmax, 82.5)
        .map_err(|_| EngineError::PercentileFailure { reason: "water probability percentile".into() })?;

    Ok(P4Thresholds {
        clr_mask: land_pct + cloud_prob_threshold,
        wclr_mask: water_pct + cloud_prob_threshold,
    })
}

/// Applies the three-tier confidence decision to every non-fill pixel,
/// rewriting `CLOUD` and writing `conf_mask`. Streams thermal
/// rows from `source`.
pub fn apply_confidence<R: RowSource>(
    desc: &ImageDescriptor,
    source: &mut R,
    pixel_mask: &mut [u8],
    conf_mask: &mut [u8],
    final_prob: &[f32],
    wfinal_prob: &[f32],
    thresholds: P4Thresholds,
    t_templ: f64,
) -> Result<(), EngineError> {
    let extreme_cold = t_templ + 400.0 - 3500.0;
    let mut thermal_buf = vec![0i16; desc.cols];

    for row in 0..desc.rows {
        source.get_input_therm_line(row, &mut thermal_buf)?;
        for col in 0..desc.cols {
            let idx = row * desc.cols + col;
            if pixel_mask[idx] & pixel::FILL != 0 {
                continue;
            }
            let thermal = desc.substitute_thermal(thermal_buf[col]) as f64;

            let is_cloud = pixel_mask[idx] & pixel::CLOUD != 0;
            let is_water = pixel_mask[idx] & pixel::WATER != 0;
            let fp = final_prob[idx] as f64;
            let wfp = wfinal_prob[idx] as f64;

            let high = (is_cloud && !is_water && fp > thresholds.clr_mask)
                || (is_cloud && is_water && wfp > thresholds.wclr_mask)
                || thermal < extreme_cold;

            if high {
                pixel_mask[idx] |= pixel::CLOUD;
                conf_mask[idx] = conf::HIGH;
                continue;
            }

            let med = (is_cloud && !is_water && fp > thresholds.clr_mask - 10.0)
                || (is_cloud && is_water && wfp > thresholds.wclr_mask - 10.0);

            pixel_mask[idx] &= !pixel::CLOUD;
            conf_mask[idx] = if med { conf::MED } else { conf::LOW };
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mask::clear;

    #[test]
    fn gather_defaults_to_zero_on_empty_selection() {
        let values = [1.0f32, 2.0, 3.0];
        let mask = [0u8, 0, 0];
        let (out, min, max) = gather(&values, &mask, clear::CLEAR_LAND);
        assert!(out.is_empty());
        assert_eq!(min, 0.0);
        assert_eq!(max, 0.0);
    }

    #[test]
    fn gather_collects_matching_pixels() {
        let values = [1.0f32, 2.0, 3.0];
        let mask = [clear::CLEAR_LAND, 0, clear::CLEAR_LAND];
        let (out, min, max) = gather(&values, &mask, clear::CLEAR_LAND);
        assert_eq!(out, vec![1.0, 3.0]);
        assert_eq!(min, 1.0);
        assert_eq!(max, 3.0);
    }
}
