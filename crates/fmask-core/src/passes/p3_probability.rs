//! P3 — per-pixel cloud probability surfaces.
//!
//! Produces `final_prob` (land) and `wfinal_prob` (water), one branch per
//! pixel depending on the `WATER` bit P1 already set.

use crate::collaborators::RowSource;
use crate::constants::ZERO_DENOM_DEFAULT;
use crate::error::EngineError;
use crate::image::{band, ImageDescriptor};
use crate::mask::pixel;
use crate::passes::p2_temperature::P2Stats;
use crate::spectral::{ndsi, ndvi, saturated_visible, visi_mean, whiteness};

/// Computes the water-branch cloud probability, `wfinal_prob`.
#[must_use]
pub fn water_probability(thermal: f64, swir1: f64, t_wtemp: f64) -> f64 {
    let wtemp_prob = ((t_wtemp - thermal) / 400.0).max(0.0);
    let brightness_prob = (swir1 / 1100.0).clamp(0.0, 1.0);
    100.0 * wtemp_prob * brightness_prob
}

/// Computes the land-branch cloud probability, `final_prob`.
#[must_use]
pub fn land_probability(
    blue_i: i16,
    green_i: i16,
    red_i: i16,
    nir: f64,
    green: f64,
    red: f64,
    swir1: f64,
    thermal: f64,
    satu_value_max_blue: i16,
    satu_value_max_green: i16,
    satu_value_max_red: i16,
    t_temph: f64,
    temp_l: f64,
) -> f64 {
    let blue = blue_i as f64;
    let green_f = green_i as f64;
    let red_f = red_i as f64;

    let ndvi_v = ndvi(nir, red).max(0.0);
    let ndsi_v = ndsi(green, swir1).max(0.0);

    let satu_bv = saturated_visible(blue_i, green_i, red_i, satu_value_max_blue, satu_value_max_green, satu_value_max_red);
    let vm = visi_mean(blue, green_f, red_f);
    let whiteness_v = if satu_bv { 0.0 } else { whiteness(blue, green_f, red_f, vm) };

    let safe_temp_l = if temp_l.abs() < 1e-7 { ZERO_DENOM_DEFAULT } else { temp_l };
    let temp_prob = ((t_temph - thermal) / safe_temp_l).max(0.0);
    let vari_prob = 1.0 - ndsi_v.max(ndvi_v).max(whiteness_v);

    100.0 * temp_prob * vari_prob
}

/// Runs P3 over the full image.
///
/// `final_prob` and `wfinal_prob` must each be `desc.pixel_count()` long.
pub fn run<R: RowSource>(
    desc: &ImageDescriptor,
    source: &mut R,
    pixel_mask: &[u8],
    p2: &P2Stats,
    final_prob: &mut [f32],
    wfinal_prob: &mut [f32],
) -> Result<(), EngineError> {
    let mut blue_buf = vec![0i16; desc.cols];
    let mut green_buf = vec![0i16; desc.cols];
    let mut red_buf = vec![0i16; desc.cols];
    let mut nir_buf = vec![0i16; desc.cols];
    let mut swir1_buf = vec![0i16; desc.cols];
    let mut thermal_buf = vec![0i16; desc.cols];

    for row in 0..desc.rows {
        source.get_input_line(band::BLUE, row, &mut blue_buf)?;
        source.get_input_line(band::GREEN, row, &mut green_buf)?;
        source.get_input_line(band::RED, row, &mut red_buf)?;
        source.get_input_line(band::NIR, row, &mut nir_buf)?;
        source.get_input_line(band::SWIR1, row, &mut swir1_buf)?;
        source.get_input_therm_line(row, &mut thermal_buf)?;

        for col in 0..desc.cols {
            let idx = row * desc.cols + col;
            if pixel_mask[idx] & pixel::FILL != 0 {
                continue;
            }

            let blue_i = desc.substitute_reflective(band::BLUE, blue_buf[col]);
            let green_i = desc.substitute_reflective(band::GREEN, green_buf[col]);
            let red_i = desc.substitute_reflective(band::RED, red_buf[col]);
            let nir_i = desc.substitute_reflective(band::NIR, nir_buf[col]);
            let swir1_i = desc.substitute_reflective(band::SWIR1, swir1_buf[col]);
            let thermal = desc.substitute_thermal(thermal_buf[col]) as f64;

            if pixel_mask[idx] & pixel::WATER != 0 {
                wfinal_prob[idx] = water_probability(thermal, swir1_i as f64, p2.t_wtemp) as f32;
                final_prob[idx] = 0.0;
            } else {
                final_prob[idx] = land_probability(
                    blue_i,
                    green_i,
                    red_i,
                    nir_i as f64,
                    green_i as f64,
                    red_i as f64,
                    swir1_i as f64,
                    thermal,
                    desc.satu_value_max[band::BLUE],
                    desc.satu_value_max[band::GREEN],
                    desc.satu_value_max[band::RED],
                    p2.t_temph,
                    p2.temp_l,
                ) as f32;
                wfinal_prob[idx] = 0.0;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn water_probability_is_nonnegative_and_bounded() {
        let p = water_probability(1000.0, 2000.0, 2500.0);
        assert!(p >= 0.0 && p <= 100.0 + 1e-9);
    }

    #[test]
    fn water_probability_zero_below_wtemp() {
        let p = water_probability(5000.0, 1000.0, 2500.0);
        assert_eq!(p, 0.0);
    }

    #[test]
    fn land_probability_zero_for_strongly_vegetated_warm_pixel() {
        // high NDVI -> vari_prob near/at 0, dominating the product
        let p = land_probability(400, 500, 600, 3000.0, 500.0, 600.0, 1500.0, 2700.0, 10000, 10000, 10000, 2900.0, 800.0);
        assert!(p >= 0.0);
    }
}
