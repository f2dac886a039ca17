//! Top-level entry point: runs the six-pass pipeline in order, short-circuits
//! on the all-cloud scene, and returns the scene-wide statistics a caller
//! needs to report.

use crate::collaborators::{FloodFillService, Percentile2Service, PercentileService, RowSource};
use crate::error::EngineError;
use crate::image::ImageDescriptor;
use crate::mask::{conf, pixel};
use crate::passes::{p1_classify, p2_temperature, p3_probability, p4_threshold, p5_background, p6_shadow};

/// Scene-wide statistics returned alongside the filled `pixel_mask`/
/// `conf_mask`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    /// Percentage of non-fill pixels that are clear (non-cloud).
    pub clear_ptm: f64,
    /// Low buffered land-temperature percentile. `-1.0` under the all-cloud
    /// shortcut.
    pub t_templ: f64,
    /// High buffered land-temperature percentile. `-1.0` under the
    /// all-cloud shortcut.
    pub t_temph: f64,
    /// `true` if the scene was resolved via the all-cloud shortcut and
    /// `conf_mask` was left untouched.
    pub all_cloud_shortcut: bool,
}

/// The clear-percentage floor below which the scene is treated as entirely
/// cloud-covered and the rest of the pipeline is skipped.
pub const ALL_CLOUD_CLEAR_PTM_FLOOR: f64 = 0.1;

/// Runs the full classification pipeline.
///
/// `source` must be able to stream every row twice per invoking pass — P1,
/// P2, P3, and the all-cloud shortcut's own scan each make one independent
/// streaming pass; P5/P6 reuse the rasters gathered along the way rather
/// than re-reading. `pixel_mask` and `conf_mask` must each be
/// `desc.pixel_count()` long. Fill pixels always get `conf::FILL_PIXEL`;
/// every other pixel's `conf_mask` is left at its caller-supplied contents
/// if the all-cloud shortcut fires.
///
/// `verbose` gates the engine's own per-pass diagnostic logging
/// (`log::debug!`), independent of whatever level a caller's `log`
/// implementation is itself configured to pass through — a caller embedding
/// the engine without installing a logger still gets a verbosity knob.
#[allow(clippy::too_many_arguments)]
pub fn run<R, P, F>(
    desc: &ImageDescriptor,
    source: &mut R,
    percentile: &P,
    floodfill: &F,
    cloud_prob_threshold: f64,
    pixel_mask: &mut [u8],
    conf_mask: &mut [u8],
    verbose: bool,
) -> Result<RunSummary, EngineError>
where
    R: RowSource,
    P: PercentileService + Percentile2Service,
    F: FloodFillService + Sync,
{
    desc.validate()?;
    if pixel_mask.len() != desc.pixel_count() || conf_mask.len() != desc.pixel_count() {
        return Err(EngineError::AllocationFailure {
            detail: "pixel_mask/conf_mask length does not match image pixel count".to_string(),
        });
    }

    let mut clear_mask = vec![0u8; desc.pixel_count()];
    let p1 = p1_classify::run(desc, source, pixel_mask, &mut clear_mask)?;
    if verbose {
        log::debug!(
            "P1 done: clear_ptm={:.3} land_ptm={:.3} water_ptm={:.3}",
            p1.clear_ptm,
            p1.land_ptm,
            p1.water_ptm
        );
    }

    for (idx, &m) in pixel_mask.iter().enumerate() {
        if m & pixel::FILL != 0 {
            conf_mask[idx] = conf::FILL_PIXEL;
        }
    }

    if p1.clear_ptm <= ALL_CLOUD_CLEAR_PTM_FLOOR {
        log::warn!(
            "scene is {:.3}% clear, at or below the all-cloud floor; skipping P2-P6",
            p1.clear_ptm
        );
        for m in pixel_mask.iter_mut() {
            if *m & pixel::FILL == 0 && *m & pixel::CLOUD == 0 {
                *m |= pixel::SHADOW;
            }
        }
        return Ok(RunSummary {
            clear_ptm: p1.clear_ptm,
            t_templ: -1.0,
            t_temph: -1.0,
            all_cloud_shortcut: true,
        });
    }

    let (land_bit, water_bit) = p2_temperature::select_bits(p1.land_ptm, p1.water_ptm);
    let p2 = p2_temperature::run(desc, source, &clear_mask, land_bit, water_bit, percentile)?;
    if verbose {
        log::debug!("P2 done: t_templ={:.1} t_temph={:.1}", p2.t_templ, p2.t_temph);
    }

    let mut final_prob = vec![0.0f32; desc.pixel_count()];
    let mut wfinal_prob = vec![0.0f32; desc.pixel_count()];
    p3_probability::run(desc, source, pixel_mask, &p2, &mut final_prob, &mut wfinal_prob)?;
    if verbose {
        log::debug!("P3 done: per-pixel cloud probability surfaces populated");
    }

    let thresholds = p4_threshold::thresholds(
        &final_prob,
        &wfinal_prob,
        &clear_mask,
        land_bit,
        water_bit,
        cloud_prob_threshold,
        percentile,
    )?;
    if verbose {
        log::debug!(
            "P4 thresholds: clr_mask={:.3} wclr_mask={:.3}",
            thresholds.clr_mask,
            thresholds.wclr_mask
        );
    }
    p4_threshold::apply_confidence(desc, source, pixel_mask, conf_mask, &final_prob, &wfinal_prob, thresholds, p2.t_templ)?;

    let rasters = p5_background::run(desc, source, &clear_mask, land_bit, percentile)?;
    let (filled_nir, filled_swir1) = p5_background::flood_fill_background(floodfill, &rasters, desc.rows, desc.cols)?;
    if verbose {
        log::debug!(
            "P5 done: nir_boundary={:.1} swir1_boundary={:.1}",
            rasters.boundaries.nir_boundary,
            rasters.boundaries.swir1_boundary
        );
    }

    p6_shadow::run(pixel_mask, &rasters.nir_data, &filled_nir, &rasters.swir1_data, &filled_swir1);

    log::info!(
        "run complete: clear_ptm={:.3} t_templ={:.1} t_temph={:.1}",
        p1.clear_ptm,
        p2.t_templ,
        p2.t_temph
    );

    Ok(RunSummary {
        clear_ptm: p1.clear_ptm,
        t_templ: p2.t_templ,
        t_temph: p2.t_temph,
        all_cloud_shortcut: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::{InMemorySource, ReferenceFloodFill, ReferencePercentile};

    fn descriptor(rows: usize, cols: usize) -> ImageDescriptor {
        ImageDescriptor {
            rows,
            cols,
            bands: 6,
            satu_value_ref: vec![20000; 6],
            satu_value_max: vec![10000; 6],
            therm_satu_value_ref: -9999,
            therm_satu_value_max: -273,
        }
    }

    #[test]
    fn all_fill_scene_takes_the_all_cloud_shortcut() {
        let desc = descriptor(1, 1);
        let mut source = InMemorySource::single_pixel(-9999, -9999, -9999, -9999, -9999, -9999, -9999);
        let percentile = ReferencePercentile;
        let floodfill = ReferenceFloodFill;
        let mut pixel_mask = vec![0u8; desc.pixel_count()];
        let mut conf_mask = vec![conf::NONE; desc.pixel_count()];

        let summary =
            run(&desc, &mut source, &percentile, &floodfill, 22.5, &mut pixel_mask, &mut conf_mask, false).unwrap();

        assert!(summary.all_cloud_shortcut);
        assert_eq!(summary.t_templ, -1.0);
        assert_eq!(summary.t_temph, -1.0);
        assert_eq!(pixel_mask[0], pixel::FILL);
        assert_eq!(conf_mask[0], conf::FILL_PIXEL);
    }

    #[test]
    fn rejects_mismatched_mask_lengths() {
        let desc = descriptor(1, 1);
        let mut source = InMemorySource::single_pixel(400, 500, 600, 3000, 1500, 800, 2500);
        let percentile = ReferencePercentile;
        let floodfill = ReferenceFloodFill;
        let mut pixel_mask = vec![0u8; 2];
        let mut conf_mask = vec![conf::NONE; desc.pixel_count()];
        assert!(run(&desc, &mut source, &percentile, &floodfill, 22.5, &mut pixel_mask, &mut conf_mask, false).is_err());
    }
}
