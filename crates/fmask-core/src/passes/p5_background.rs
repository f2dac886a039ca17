//! P5 — infrared background reconstruction.
//!
//! Gathers clear-land NIR/SWIR1 samples to derive background percentiles,
//! copies the full NIR/SWIR1 rasters, then runs flood-fill reconstruction on
//! each — the one place in the pipeline with a genuine parallel opportunity
//!: the two flood-fills share no mutable state and are dispatched
//! on separate threads.

use crate::collaborators::{FloodFillService, PercentileService, RowSource};
use crate::error::EngineError;
use crate::image::{band, ImageDescriptor};
use crate::mask::clear;

/// Background percentiles that seed the flood-fill border frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct P5Boundaries {
    /// 17.5th percentile of clear-land NIR.
    pub nir_boundary: f64,
    /// 17.5th percentile of clear-land SWIR1.
    pub swir1_boundary: f64,
}

/// Full-raster NIR/SWIR1 copies gathered alongside the background
/// percentiles, handed to the flood-fill stage.
pub struct P5Rasters {
    /// Background percentiles.
    pub boundaries: P5Boundaries,
    /// Full NIR raster (saturation-substituted), row-major, `L*S` long.
    pub nir_data: Vec<i16>,
    /// Full SWIR1 raster (saturation-substituted), row-major, `L*S` long.
    pub swir1_data: Vec<i16>,
}

/// Streams NIR/SWIR1 rows, gathering clear-land samples and the full
/// rasters in one pass.
pub fn run<R: RowSource, P: PercentileService>(
    desc: &ImageDescriptor,
    source: &mut R,
    clear_mask: &[u8],
    land_bit: u8,
    percentile: &P,
) -> Result<P5Rasters, EngineError> {
    let mut nir_data = vec![0i16; desc.pixel_count()];
    let mut swir1_data = vec![0i16; desc.pixel_count()];

    let mut nir_samples: Vec<i16> = Vec::new();
    let mut swir1_samples: Vec<i16> = Vec::new();
    let mut nir_min = i16::MAX;
    let mut nir_max = i16::MIN;
    let mut swir1_min = i16::MAX;
    let mut swir1_max = i16::MIN;

    let mut nir_buf = vec![0i16; desc.cols];
    let mut swir1_buf = vec![0i16; desc.cols];

    for row in 0..desc.rows {
        source.get_input_line(band::NIR, row, &mut nir_buf)?;
        source.get_input_line(band::SWIR1, row, &mut swir1_buf)?;

        for col in 0..desc.cols {
            let idx = row * desc.cols + col;
            let nir = desc.substitute_reflective(band::NIR, nir_buf[col]);
            let swir1 = desc.substitute_reflective(band::SWIR1, swir1_buf[col]);
            nir_data[idx] = nir;
            swir1_data[idx] = swir1;

            if clear_mask[idx] & clear::CLEAR_FILL != 0 {
                continue;
            }
            if clear_mask[idx] & land_bit == land_bit {
                nir_samples.push(nir);
                nir_min = nir_min.min(nir);
                nir_max = nir_max.max(nir);
                swir1_samples.push(swir1);
                swir1_min = swir1_min.min(swir1);
                swir1_max = swir1_max.max(swir1);
            }
        }
    }

    if nir_min == i16::MAX {
        nir_min = 0;
        nir_max = 0;
    }
    if swir1_min == i16::MAX {
        swir1_min = 0;
        swir1_max = 0;
    }

    let nir_boundary = percentile
        .prctile(&nir_samples, nir_min, nir_max, 17.5)
        .map_err(|_| EngineError::PercentileFailure { reason: "nir background percentile".into() })?;
    let swir1_boundary = percentile
        .prctile(&swir1_samples, swir1_min, swir1_max, 17.5)
        .map_err(|_| EngineError::PercentileFailure { reason: "swir1 background percentile".into() })?;

    Ok(P5Rasters {
        boundaries: P5Boundaries { nir_boundary, swir1_boundary },
        nir_data,
        swir1_data,
    })
}

/// Runs the two flood-fill reconstructions concurrently.
///
/// Returns `(filled_nir_data, filled_swir1_data)`. Both tasks' errors are
/// collected before returning; if either fails, the whole call fails.
pub fn flood_fill_background<F: FloodFillService + Sync>(
    floodfill: &F,
    rasters: &P5Rasters,
    rows: usize,
    cols: usize,
) -> Result<(Vec<i16>, Vec<i16>), EngineError> {
    let mut filled_nir = vec![0i16; rows * cols];
    let mut filled_swir1 = vec![0i16; rows * cols];

    let nir_result;
    let swir1_result;
    std::thread::scope(|scope| {
        let nir_handle = scope.spawn(|| {
            floodfill.fill_local_minima(
                "nir",
                &rasters.nir_data,
                rows,
                cols,
                rasters.boundaries.nir_boundary as f32,
                &mut filled_nir,
            )
        });
        let swir1_res = floodfill.fill_local_minima(
            "swir1",
            &rasters.swir1_data,
            rows,
            cols,
            rasters.boundaries.swir1_boundary as f32,
            &mut filled_swir1,
        );
        let nir_res = nir_handle.join().unwrap_or_else(|_| {
            Err(EngineError::FloodFillFailure {
                label: "nir".into(),
                reason: "worker thread panicked".into(),
            })
        });
        nir_result = nir_res;
        swir1_result = swir1_res;
    });

    nir_result?;
    swir1_result?;

    Ok((filled_nir, filled_swir1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_equal_structural_compare() {
        let a = P5Boundaries { nir_boundary: 1.0, swir1_boundary: 2.0 };
        let b = P5Boundaries { nir_boundary: 1.0, swir1_boundary: 2.0 };
        assert_eq!(a, b);
    }
}
