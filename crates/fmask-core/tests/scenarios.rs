//! End-to-end scenario tests: one-pixel scenes driving the full engine,
//! matching the named cases a careful implementation is expected to get
//! right (clear vegetation, snow, water, saturated cloud, extreme cold).

use fmask_core::engine;
use fmask_core::image::ImageDescriptor;
use fmask_core::mask::{clear, conf, pixel};
use fmask_core::passes::p1_classify;
use fmask_core::reference::{InMemorySource, ReferenceFloodFill, ReferencePercentile};

fn descriptor() -> ImageDescriptor {
    ImageDescriptor {
        rows: 1,
        cols: 1,
        bands: 6,
        satu_value_ref: vec![20000; 6],
        satu_value_max: vec![10000; 6],
        therm_satu_value_ref: -9999,
        therm_satu_value_max: -273,
    }
}

fn run_one_pixel(
    blue: i16,
    green: i16,
    red: i16,
    nir: i16,
    swir1: i16,
    swir2: i16,
    thermal: i16,
) -> (engine::RunSummary, Vec<u8>, Vec<u8>) {
    let desc = descriptor();
    let mut source = InMemorySource::single_pixel(blue, green, red, nir, swir1, swir2, thermal);
    let percentile = ReferencePercentile;
    let floodfill = ReferenceFloodFill;
    let mut pixel_mask = vec![0u8; desc.pixel_count()];
    let mut conf_mask = vec![conf::NONE; desc.pixel_count()];

    let summary = engine::run(&desc, &mut source, &percentile, &floodfill, 22.5, &mut pixel_mask, &mut conf_mask, false)
        .expect("one-pixel run succeeds");

    (summary, pixel_mask, conf_mask)
}

#[test]
fn all_fill_image_takes_the_all_cloud_shortcut() {
    let (summary, pixel_mask, conf_mask) = run_one_pixel(-9999, -9999, -9999, -9999, -9999, -9999, -9999);

    assert!(summary.all_cloud_shortcut);
    assert_eq!(summary.clear_ptm, 0.0);
    assert_eq!(summary.t_templ, -1.0);
    assert_eq!(summary.t_temph, -1.0);
    assert_eq!(pixel_mask[0], pixel::FILL);
    assert_eq!(conf_mask[0], conf::FILL_PIXEL);
}

#[test]
fn clear_land_vegetation_pixel_is_unflagged_and_fully_clear() {
    let desc = descriptor();
    let raw = p1_classify::P1PixelRaw { blue: 400, green: 500, red: 600, nir: 3000, swir1: 1500, swir2: 800, thermal: 2500 };
    let result = p1_classify::classify_pixel(&raw, &desc);

    assert_eq!(result.pixel_mask & pixel::CLOUD, 0);
    assert_eq!(result.pixel_mask & pixel::SNOW, 0);
    assert_eq!(result.pixel_mask & pixel::WATER, 0);
    assert_eq!(result.clear_mask, clear::CLEAR | clear::CLEAR_LAND);

    let (summary, _pixel_mask, _conf_mask) = run_one_pixel(400, 500, 600, 3000, 1500, 800, 2500);
    assert_eq!(summary.clear_ptm, 100.0);
}

#[test]
fn bright_snow_signature_sets_the_snow_bit() {
    let desc = descriptor();
    let raw = p1_classify::P1PixelRaw { blue: 8000, green: 8500, red: 8000, nir: 4000, swir1: 1000, swir2: 400, thermal: 500 };
    let result = p1_classify::classify_pixel(&raw, &desc);
    assert_ne!(result.pixel_mask & pixel::SNOW, 0);
}

#[test]
fn dark_water_signature_sets_water_bit_and_water_ptm_positive() {
    let desc = descriptor();
    let raw = p1_classify::P1PixelRaw { blue: 500, green: 500, red: 400, nir: 200, swir1: 100, swir2: 50, thermal: 2800 };
    let result = p1_classify::classify_pixel(&raw, &desc);
    assert_ne!(result.pixel_mask & pixel::WATER, 0);
    assert_eq!(result.clear_mask, clear::CLEAR | clear::CLEAR_WATER);
}

#[test]
fn saturated_white_pixel_sets_the_cloud_bit() {
    let desc = descriptor();
    let max = desc.satu_value_max[0];
    let raw = p1_classify::P1PixelRaw { blue: max, green: max, red: max, nir: max, swir1: max, swir2: max, thermal: 2000 };
    let result = p1_classify::classify_pixel(&raw, &desc);
    assert_ne!(result.pixel_mask & pixel::CLOUD, 0);
    assert_eq!(result.clear_mask, 0);
}

#[test]
fn extreme_cold_thermal_fallback_overrides_probability_threshold() {
    use fmask_core::passes::p4_threshold::{apply_confidence, P4Thresholds};

    let desc = descriptor();
    let t_templ = -500.0;
    let extreme_cold = t_templ + 400.0 - 3500.0;
    let thermal = (extreme_cold - 1.0) as i16;

    let mut source = InMemorySource::single_pixel(400, 500, 600, 3000, 1500, 800, thermal);
    let mut pixel_mask = vec![pixel::CLOUD];
    let mut conf_mask = vec![conf::NONE];
    let final_prob = [0.0f32];
    let wfinal_prob = [0.0f32];
    let thresholds = P4Thresholds { clr_mask: 1000.0, wclr_mask: 1000.0 };

    apply_confidence(&desc, &mut source, &mut pixel_mask, &mut conf_mask, &final_prob, &wfinal_prob, thresholds, t_templ)
        .unwrap();

    assert_eq!(conf_mask[0], conf::HIGH);
    assert_eq!(pixel_mask[0] & pixel::CLOUD, pixel::CLOUD);
}

#[test]
fn round_trip_p1_is_deterministic_on_unmodified_inputs() {
    let desc = descriptor();
    let mut source_a = InMemorySource::single_pixel(400, 500, 600, 3000, 1500, 800, 2500);
    let mut pixel_mask_a = vec![0u8; desc.pixel_count()];
    let mut clear_mask_a = vec![0u8; desc.pixel_count()];
    let stats_a = p1_classify::run(&desc, &mut source_a, &mut pixel_mask_a, &mut clear_mask_a).unwrap();

    let mut source_b = InMemorySource::single_pixel(400, 500, 600, 3000, 1500, 800, 2500);
    let mut pixel_mask_b = vec![0u8; desc.pixel_count()];
    let mut clear_mask_b = vec![0u8; desc.pixel_count()];
    let stats_b = p1_classify::run(&desc, &mut source_b, &mut pixel_mask_b, &mut clear_mask_b).unwrap();

    assert_eq!(pixel_mask_a, pixel_mask_b);
    assert_eq!(clear_mask_a, clear_mask_b);
    assert_eq!(stats_a, stats_b);
}

#[test]
fn round_trip_p6_shadow_assignment_is_idempotent() {
    use fmask_core::passes::p6_shadow;

    let mut pixel_mask_once = [0u8];
    let nir = [100i16];
    let filled_nir = [400i16];
    let swir1 = [100i16];
    let filled_swir1 = [400i16];
    p6_shadow::run(&mut pixel_mask_once, &nir, &filled_nir, &swir1, &filled_swir1);

    let mut pixel_mask_twice = pixel_mask_once;
    p6_shadow::run(&mut pixel_mask_twice, &nir, &filled_nir, &swir1, &filled_swir1);

    assert_eq!(pixel_mask_once, pixel_mask_twice);
}

#[test]
fn multi_pixel_scene_mixes_land_water_and_fill() {
    let desc = ImageDescriptor { rows: 1, cols: 3, ..descriptor() };
    let reflective: [Vec<i16>; 6] = [
        vec![400, 500, -9999],
        vec![500, 500, -9999],
        vec![600, 400, -9999],
        vec![3000, 200, -9999],
        vec![1500, 100, -9999],
        vec![800, 50, -9999],
    ];
    let thermal = vec![2500i16, 2800, -9999];
    let mut source = InMemorySource::new(1, 3, reflective, thermal);
    let percentile = ReferencePercentile;
    let floodfill = ReferenceFloodFill;
    let mut pixel_mask = vec![0u8; desc.pixel_count()];
    let mut conf_mask = vec![conf::NONE; desc.pixel_count()];

    let summary =
        engine::run(&desc, &mut source, &percentile, &floodfill, 22.5, &mut pixel_mask, &mut conf_mask, false).unwrap();

    assert_eq!(pixel_mask[2], pixel::FILL);
    assert_eq!(conf_mask[2], conf::FILL_PIXEL);
    assert_eq!(pixel_mask[1] & pixel::WATER, pixel::WATER);
    assert!(summary.clear_ptm > 0.0);
}
