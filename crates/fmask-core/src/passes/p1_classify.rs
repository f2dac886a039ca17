//! P1 — per-pixel spectral classification.
//!
//! Populates `pixel_mask` and the `clear_mask` scratch array in a single
//! streaming pass, and accumulates the four scene counters that drive the
//! `clear_ptm`/`land_ptm`/`water_ptm` statistics consumed by every later
//! pass.

use crate::collaborators::RowSource;
use crate::error::EngineError;
use crate::image::{band, ImageDescriptor, RowBuffers};
use crate::mask::{clear, pixel};
use crate::spectral::{approx_gt, approx_lt, hot, ndsi, ndvi, saturated_visible, visi_mean, whiteness};

/// Raw (pre-substitution) per-pixel reflective and thermal samples.
#[derive(Debug, Clone, Copy)]
pub struct P1PixelRaw {
    /// Raw blue sample.
    pub blue: i16,
    /// Raw green sample.
    pub green: i16,
    /// Raw red sample.
    pub red: i16,
    /// Raw NIR sample.
    pub nir: i16,
    /// Raw SWIR1 sample.
    pub swir1: i16,
    /// Raw SWIR2 sample.
    pub swir2: i16,
    /// Raw thermal sample.
    pub thermal: i16,
}

/// Per-pixel P1 classification result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct P1PixelResult {
    /// Bits to OR into `pixel_mask` for this pixel.
    pub pixel_mask: u8,
    /// Bits to OR into `clear_mask` for this pixel.
    pub clear_mask: u8,
}

/// Returns `true` if any required reflective band equals
/// [`crate::constants::FILL_PIXEL`], or the raw thermal sample is at or
/// below it. Evaluated against *raw* values, before saturation substitution,
/// so substitution never masks a genuine fill pixel.
#[inline]
#[must_use]
pub fn is_fill(raw: &P1PixelRaw) -> bool {
    use crate::constants::FILL_PIXEL;
    raw.blue == FILL_PIXEL
        || raw.green == FILL_PIXEL
        || raw.red == FILL_PIXEL
        || raw.nir == FILL_PIXEL
        || raw.swir1 == FILL_PIXEL
        || raw.swir2 == FILL_PIXEL
        || raw.thermal <= FILL_PIXEL
}

/// Classifies a single pixel, applying saturation substitution internally.
#[must_use]
pub fn classify_pixel(raw: &P1PixelRaw, desc: &ImageDescriptor) -> P1PixelResult {
    if is_fill(raw) {
        return P1PixelResult {
            pixel_mask: pixel::FILL,
            clear_mask: clear::CLEAR_FILL,
        };
    }

    let blue_i = desc.substitute_reflective(band::BLUE, raw.blue);
    let green_i = desc.substitute_reflective(band::GREEN, raw.green);
    let red_i = desc.substitute_reflective(band::RED, raw.red);
    let nir_i = desc.substitute_reflective(band::NIR, raw.nir);
    let swir1_i = desc.substitute_reflective(band::SWIR1, raw.swir1);
    let swir2_i = desc.substitute_reflective(band::SWIR2, raw.swir2);
    let thermal_i = desc.substitute_thermal(raw.thermal);

    let blue = blue_i as f64;
    let green = green_i as f64;
    let red = red_i as f64;
    let nir = nir_i as f64;
    let swir1 = swir1_i as f64;
    let swir2 = swir2_i as f64;
    let thermal = thermal_i as f64;

    let ndvi_v = ndvi(nir, red);
    let ndsi_v = ndsi(green, swir1);

    let mut is_cloud = approx_lt(ndsi_v, 0.8) && approx_lt(ndvi_v, 0.8) && approx_gt(swir2, 300.0) && approx_lt(thermal, 2700.0);

    if is_cloud {
        let vm = visi_mean(blue, green, red);
        let satu_bv = saturated_visible(
            blue_i,
            green_i,
            red_i,
            desc.satu_value_max[band::BLUE],
            desc.satu_value_max[band::GREEN],
            desc.satu_value_max[band::RED],
        );
        let whiteness_v = if satu_bv { 0.0 } else { whiteness(blue, green, red, vm) };

        is_cloud = approx_lt(whiteness_v, 0.7);

        if is_cloud {
            let hot_v = hot(blue, red);
            is_cloud = approx_gt(hot_v, 0.0) || satu_bv;

            if is_cloud {
                is_cloud = swir1 != 0.0 && approx_gt(nir / swir1, 0.75);
            }
        }
    }

    let is_snow = approx_gt(ndsi_v, 0.15) && approx_lt(thermal, 1000.0) && approx_gt(nir, 1100.0) && approx_gt(green, 1000.0);

    let is_water = (approx_lt(ndvi_v, 0.01) && approx_lt(nir, 1100.0))
        || (approx_gt(ndvi_v, 0.0) && approx_lt(ndvi_v, 0.1) && approx_lt(nir, 500.0));

    let mut pixel_mask = 0u8;
    if is_cloud {
        pixel_mask |= pixel::CLOUD;
    }
    if is_snow {
        pixel_mask |= pixel::SNOW;
    }
    if is_water {
        pixel_mask |= pixel::WATER;
    }

    let clear_mask = if is_cloud {
        0
    } else if is_water {
        clear::CLEAR | clear::CLEAR_WATER
    } else {
        clear::CLEAR | clear::CLEAR_LAND
    };

    P1PixelResult { pixel_mask, clear_mask }
}

/// The four scene counters P1 accumulates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct P1Counters {
    /// Non-fill pixels seen.
    pub image_data: u64,
    /// Clear (non-cloud) pixels.
    pub clear: u64,
    /// Clear-and-land pixels.
    pub clear_land: u64,
    /// Clear-and-water pixels.
    pub clear_water: u64,
}

/// End-of-pass statistics derived from [`P1Counters`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct P1Stats {
    /// Raw counters.
    pub counters: P1Counters,
    /// `100 * clear / image_data`.
    pub clear_ptm: f64,
    /// `100 * clear_land / image_data`.
    pub land_ptm: f64,
    /// `100 * clear_water / image_data`.
    pub water_ptm: f64,
}

impl P1Counters {
    /// Combines two counter sets; the reduction is associative so rows can
    /// be folded in any order.
    #[must_use]
    pub fn combine(self, other: P1Counters) -> P1Counters {
        P1Counters {
            image_data: self.image_data + other.image_data,
            clear: self.clear + other.clear,
            clear_land: self.clear_land + other.clear_land,
            clear_water: self.clear_water + other.clear_water,
        }
    }

    /// Derives the end-of-pass percentage statistics.
    #[must_use]
    pub fn stats(self) -> P1Stats {
        let denom = self.image_data as f64;
        let pct = |n: u64| if denom > 0.0 { 100.0 * n as f64 / denom } else { 0.0 };
        P1Stats {
            counters: self,
            clear_ptm: pct(self.clear),
            land_ptm: pct(self.clear_land),
            water_ptm: pct(self.clear_water),
        }
    }
}

/// Runs P1 over the full image, streaming rows from `source`.
///
/// `pixel_mask` and `clear_mask` must each be `desc.pixel_count()` long.
pub fn run<R: RowSource>(
    desc: &ImageDescriptor,
    source: &mut R,
    pixel_mask: &mut [u8],
    clear_mask: &mut [u8],
) -> Result<P1Stats, EngineError> {
    let mut buf = RowBuffers::new(desc.cols);
    let mut counters = P1Counters::default();

    for row in 0..desc.rows {
        for (b, reflective) in buf.reflective.iter_mut().enumerate() {
            source.get_input_line(b, row, reflective)?;
        }
        source.get_input_therm_line(row, &mut buf.thermal)?;

        for col in 0..desc.cols {
            let raw = P1PixelRaw {
                blue: buf.reflective[band::BLUE][col],
                green: buf.reflective[band::GREEN][col],
                red: buf.reflective[band::RED][col],
                nir: buf.reflective[band::NIR][col],
                swir1: buf.reflective[band::SWIR1][col],
                swir2: buf.reflective[band::SWIR2][col],
                thermal: buf.thermal[col],
            };
            let result = classify_pixel(&raw, desc);
            let idx = row * desc.cols + col;
            pixel_mask[idx] = result.pixel_mask;
            clear_mask[idx] = result.clear_mask;

            if result.clear_mask != clear::CLEAR_FILL {
                counters.image_data += 1;
                if result.clear_mask & clear::CLEAR != 0 {
                    counters.clear += 1;
                    if result.clear_mask & clear::CLEAR_LAND != 0 {
                        counters.clear_land += 1;
                    } else if result.clear_mask & clear::CLEAR_WATER != 0 {
                        counters.clear_water += 1;
                    }
                }
            }
        }
    }

    log::debug!(
        "P1 complete: image_data={} clear={} clear_land={} clear_water={}",
        counters.image_data,
        counters.clear,
        counters.clear_land,
        counters.clear_water
    );

    Ok(counters.stats())
}
