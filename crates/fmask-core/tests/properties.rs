//! Property-based tests for the scene-wide statistical invariants the
//! engine's output must hold across arbitrary inputs.

use fmask_core::engine;
use fmask_core::image::{band, ImageDescriptor};
use fmask_core::mask::{conf, pixel};
use fmask_core::passes::{p1_classify, p6_shadow};
use fmask_core::reference::{InMemorySource, ReferenceFloodFill, ReferencePercentile};
use proptest::prelude::*;

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

/// A single reflective/thermal pixel sample, kept within a realistic DN
/// range (never the fill sentinel, never a saturation sentinel).
fn pixel_sample() -> impl Strategy<Value = (i16, i16, i16, i16, i16, i16, i16)> {
    (
        1i16..9999,
        1i16..9999,
        1i16..9999,
        1i16..9999,
        1i16..9999,
        1i16..9999,
        (-2000i16)..4000,
    )
}

fn run_scene(pixels: &[(i16, i16, i16, i16, i16, i16, i16)]) -> (engine::RunSummary, Vec<u8>, Vec<u8>) {
    let cols = pixels.len();
    let desc = descriptor(1, cols);
    let mut reflective: [Vec<i16>; 6] = Default::default();
    for channel in reflective.iter_mut() {
        *channel = vec![0i16; cols];
    }
    let mut thermal = vec![0i16; cols];
    for (i, &(blue, green, red, nir, swir1, swir2, therm)) in pixels.iter().enumerate() {
        reflective[band::BLUE][i] = blue;
        reflective[band::GREEN][i] = green;
        reflective[band::RED][i] = red;
        reflective[band::NIR][i] = nir;
        reflective[band::SWIR1][i] = swir1;
        reflective[band::SWIR2][i] = swir2;
        thermal[i] = therm;
    }
    let mut source = InMemorySource::new(1, cols, reflective, thermal);
    let percentile = ReferencePercentile;
    let floodfill = ReferenceFloodFill;
    let mut pixel_mask = vec![0u8; desc.pixel_count()];
    let mut conf_mask = vec![conf::NONE; desc.pixel_count()];

    let summary = engine::run(&desc, &mut source, &percentile, &floodfill, 22.5, &mut pixel_mask, &mut conf_mask, false)
        .expect("scene run succeeds");
    (summary, pixel_mask, conf_mask)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn clear_ptm_stays_in_unit_percent_range(pixels in prop::collection::vec(pixel_sample(), 1..8)) {
        let (summary, _pixel_mask, _conf_mask) = run_scene(&pixels);
        prop_assert!(summary.clear_ptm >= 0.0 && summary.clear_ptm <= 100.0);
    }

    #[test]
    fn land_and_water_ptm_never_exceed_clear_ptm(pixels in prop::collection::vec(pixel_sample(), 1..8)) {
        let cols = pixels.len();
        let desc = descriptor(1, cols);
        let mut reflective: [Vec<i16>; 6] = Default::default();
        for channel in reflective.iter_mut() {
            *channel = vec![0i16; cols];
        }
        let mut thermal = vec![0i16; cols];
        for (i, &(blue, green, red, nir, swir1, swir2, therm)) in pixels.iter().enumerate() {
            reflective[band::BLUE][i] = blue;
            reflective[band::GREEN][i] = green;
            reflective[band::RED][i] = red;
            reflective[band::NIR][i] = nir;
            reflective[band::SWIR1][i] = swir1;
            reflective[band::SWIR2][i] = swir2;
            thermal[i] = therm;
        }
        let mut source = InMemorySource::new(1, cols, reflective, thermal);
        let mut pixel_mask = vec![0u8; desc.pixel_count()];
        let mut clear_mask = vec![0u8; desc.pixel_count()];

        let stats = p1_classify::run(&desc, &mut source, &mut pixel_mask, &mut clear_mask).unwrap();

        prop_assert!(stats.land_ptm + stats.water_ptm <= stats.clear_ptm + 1e-9);
    }

    #[test]
    fn t_temph_is_not_below_t_templ_unless_all_cloud_shortcut(pixels in prop::collection::vec(pixel_sample(), 1..8)) {
        let (summary, _pixel_mask, _conf_mask) = run_scene(&pixels);
        if summary.all_cloud_shortcut {
            prop_assert_eq!(summary.t_templ, -1.0);
            prop_assert_eq!(summary.t_temph, -1.0);
        } else {
            prop_assert!(summary.t_temph >= summary.t_templ);
        }
    }

    #[test]
    fn determinism_across_identical_runs(pixels in prop::collection::vec(pixel_sample(), 1..8)) {
        let (summary_a, pixel_mask_a, conf_mask_a) = run_scene(&pixels);
        let (summary_b, pixel_mask_b, conf_mask_b) = run_scene(&pixels);
        prop_assert_eq!(summary_a, summary_b);
        prop_assert_eq!(pixel_mask_a, pixel_mask_b);
        prop_assert_eq!(conf_mask_a, conf_mask_b);
    }

    #[test]
    fn saturation_substitution_is_idempotent(pixels in prop::collection::vec(pixel_sample(), 1..8)) {
        // Re-running with bands already at their saturation-substituted
        // values must leave those samples untouched, since substitution
        // only fires when a raw sample equals the *sentinel*, not the
        // replacement.
        let desc = descriptor(1, 1);
        for &(blue, green, red, nir, swir1, swir2, _therm) in &pixels {
            for (b, raw) in [
                (band::BLUE, blue),
                (band::GREEN, green),
                (band::RED, red),
                (band::NIR, nir),
                (band::SWIR1, swir1),
                (band::SWIR2, swir2),
            ] {
                let once = desc.substitute_reflective(b, raw);
                let twice = desc.substitute_reflective(b, once);
                prop_assert_eq!(once, twice);
            }
        }
    }
}

#[test]
fn cloud_confirmed_pixel_still_gets_shadow_over_a_deep_residual_gap() {
    let mut pixel_mask = [pixel::CLOUD];
    let nir = [100i16];
    let filled_nir = [500i16];
    let swir1 = [100i16];
    let filled_swir1 = [500i16];

    p6_shadow::run(&mut pixel_mask, &nir, &filled_nir, &swir1, &filled_swir1);

    assert_eq!(pixel_mask[0], pixel::CLOUD | pixel::SHADOW);
}
