//! P2 — scene-wide temperature percentiles.
//!
//! Chooses which `clear_mask` bit to trust for land/water statistics
//! (falling back to plain `CLEAR` when a class is too rare to trust its own
//! bit), then streams thermal-only rows to gather samples and derive the
//! buffered land interval and the water high-temperature percentile.

use crate::collaborators::{PercentileService, RowSource};
use crate::error::EngineError;
use crate::image::ImageDescriptor;
use crate::mask::clear;
use crate::constants::TEMP_BUFFER;

/// Chooses the `clear_mask` bit P2/P4/P5 should test against for land and
/// water statistics: the specific class bit when it covers at least 0.1% of
/// the scene, else the broader `CLEAR` bit.
#[must_use]
pub fn select_bits(land_ptm: f64, water_ptm: f64) -> (u8, u8) {
    let land_bit = if land_ptm >= 0.1 { clear::CLEAR_LAND } else { clear::CLEAR };
    let water_bit = if water_ptm >= 0.1 { clear::CLEAR_WATER } else { clear::CLEAR };
    (land_bit, water_bit)
}

/// Output of P2: the buffered land temperature interval and the water
/// high-temperature percentile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct P2Stats {
    /// Low land-temperature percentile, widened by [`TEMP_BUFFER`] downward.
    pub t_templ: f64,
    /// High land-temperature percentile, widened by [`TEMP_BUFFER`] upward.
    pub t_temph: f64,
    /// High water-temperature percentile (not buffered).
    pub t_wtemp: f64,
    /// `t_temph - t_templ`, the buffered land interval width.
    pub temp_l: f64,
}

/// Runs P2: streams thermal rows, bucketing clear-land/clear-water samples,
/// and returns the buffered percentiles.
pub fn run<R: RowSource, P: PercentileService>(
    desc: &ImageDescriptor,
    source: &mut R,
    clear_mask: &[u8],
    land_bit: u8,
    water_bit: u8,
    percentile: &P,
) -> Result<P2Stats, EngineError> {
    let mut f_temp: Vec<i16> = Vec::new();
    let mut f_wtemp: Vec<i16> = Vec::new();
    let mut temp_min = i16::MAX;
    let mut temp_max = i16::MIN;
    let mut wtemp_min = i16::MAX;
    let mut wtemp_max = i16::MIN;

    let mut thermal_buf = vec![0i16; desc.cols];
    for row in 0..desc.rows {
        source.get_input_therm_line(row, &mut thermal_buf)?;
        for col in 0..desc.cols {
            let idx = row * desc.cols + col;
            if clear_mask[idx] & clear::CLEAR_FILL != 0 {
                continue;
            }
            let thermal = desc.substitute_thermal(thermal_buf[col]);

            if clear_mask[idx] & land_bit == land_bit {
                f_temp.push(thermal);
                temp_min = temp_min.min(thermal);
                temp_max = temp_max.max(thermal);
            }
            if clear_mask[idx] & water_bit == water_bit {
                f_wtemp.push(thermal);
                wtemp_min = wtemp_min.min(thermal);
                wtemp_max = wtemp_max.max(thermal);
            }
        }
    }

    if temp_min == i16::MAX {
        temp_min = 0;
    }
    if temp_max == i16::MIN {
        temp_max = 0;
    }
    if wtemp_min == i16::MAX {
        wtemp_min = 0;
    }
    if wtemp_max == i16::MIN {
        wtemp_max = 0;
    }

    let mut t_templ = percentile
        .prctile(&f_temp, temp_min, temp_max, 17.5)
        .map_err(|_| EngineError::PercentileFailure { reason: "land low percentile".into() })?;
    let mut t_temph = percentile
        .prctile(&f_temp, temp_min, temp_max, 82.5)
        .map_err(|_| EngineError::PercentileFailure { reason: "land high percentile".into() })?;
    let t_wtemp = percentile
        .prctile(&f_wtemp, wtemp_min, wtemp_max, 82.5)
        .map_err(|_| EngineError::PercentileFailure { reason: "water percentile".into() })?;

    t_templ -= TEMP_BUFFER;
    t_temph += TEMP_BUFFER;
    let temp_l = t_temph - t_templ;

    log::debug!("P2 complete: t_templ={t_templ} t_temph={t_temph} t_wtemp={t_wtemp}");

    Ok(P2Stats { t_templ, t_temph, t_wtemp, temp_l })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_bits_falls_back_below_threshold() {
        assert_eq!(select_bits(0.05, 0.05), (clear::CLEAR, clear::CLEAR));
        assert_eq!(select_bits(5.0, 5.0), (clear::CLEAR_LAND, clear::CLEAR_WATER));
    }
}
