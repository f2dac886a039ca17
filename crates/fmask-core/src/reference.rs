//! Reference collaborator implementations.
//!
//! Non-production stand-ins for [`RowSource`], [`PercentileService`],
//! [`Percentile2Service`], and [`FloodFillService`] — simple enough to read
//! as a correctness baseline, not tuned for throughput. Used by this crate's
//! own tests and by the CLI demo harness; a real deployment is expected to
//! supply collaborators backed by its own raster I/O and numerics stack.

use crate::collaborators::{FloodFillService, Percentile2Service, PercentileService, RowSource};
use crate::error::EngineError;
use crate::image::band;

/// An in-memory, row-major raster source over six reflective bands plus
/// thermal. Exists for tests and the CLI demo; never allocated for real
/// imagery.
pub struct InMemorySource {
    rows: usize,
    cols: usize,
    reflective: [Vec<i16>; 6],
    thermal: Vec<i16>,
}

impl InMemorySource {
    /// Builds a source from full band rasters, each `rows * cols` long.
    #[must_use]
    pub fn new(rows: usize, cols: usize, reflective: [Vec<i16>; 6], thermal: Vec<i16>) -> Self {
        Self { rows, cols, reflective, thermal }
    }

    /// Builds a 1x1 scene from a single pixel's samples, for unit tests that
    /// only care about one classification decision.
    #[must_use]
    pub fn single_pixel(blue: i16, green: i16, red: i16, nir: i16, swir1: i16, swir2: i16, thermal: i16) -> Self {
        let mut reflective: [Vec<i16>; 6] = Default::default();
        reflective[band::BLUE] = vec![blue];
        reflective[band::GREEN] = vec![green];
        reflective[band::RED] = vec![red];
        reflective[band::NIR] = vec![nir];
        reflective[band::SWIR1] = vec![swir1];
        reflective[band::SWIR2] = vec![swir2];
        Self { rows: 1, cols: 1, reflective, thermal: vec![thermal] }
    }
}

impl RowSource for InMemorySource {
    fn get_input_line(&mut self, band: usize, row: usize, buf: &mut [i16]) -> Result<(), EngineError> {
        if row >= self.rows || buf.len() != self.cols {
            return Err(EngineError::IoFailure {
                row,
                band: Some(band),
                reason: "row or column out of range".into(),
            });
        }
        let start = row * self.cols;
        buf.copy_from_slice(&self.reflective[band][start..start + self.cols]);
        Ok(())
    }

    fn get_input_therm_line(&mut self, row: usize, buf: &mut [i16]) -> Result<(), EngineError> {
        if row >= self.rows || buf.len() != self.cols {
            return Err(EngineError::IoFailure { row, band: None, reason: "row or column out of range".into() });
        }
        let start = row * self.cols;
        buf.copy_from_slice(&self.thermal[start..start + self.cols]);
        Ok(())
    }
}

/// Sort-and-interpolate percentile service, the textbook definition the
/// engine's dynamic thresholds are specified against.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferencePercentile;

fn interpolated_percentile(mut sorted: Vec<f64>, pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = (pct / 100.0) * (n - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let frac = rank - lo as f64;
        sorted[lo] + frac * (sorted[hi] - sorted[lo])
    }
}

impl PercentileService for ReferencePercentile {
    fn prctile(&self, samples: &[i16], _min: i16, _max: i16, pct: f64) -> Result<f64, EngineError> {
        let values: Vec<f64> = samples.iter().map(|&v| v as f64).collect();
        Ok(interpolated_percentile(values, pct))
    }
}

impl Percentile2Service for ReferencePercentile {
    fn prctile2(&self, samples: &[f32], _min: f32, _max: f32, pct: f64) -> Result<f64, EngineError> {
        let values: Vec<f64> = samples.iter().map(|&v| v as f64).collect();
        Ok(interpolated_percentile(values, pct))
    }
}

/// Queue-based grayscale reconstruction by erosion: raises every local
/// minimum of `src` to the lowest rim value reachable without crossing a
/// higher cell, using `boundary` as the value held at the frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReferenceFloodFill;

impl FloodFillService for ReferenceFloodFill {
    fn fill_local_minima(
        &self,
        label: &str,
        src: &[i16],
        rows: usize,
        cols: usize,
        boundary: f32,
        dst: &mut [i16],
    ) -> Result<(), EngineError> {
        if src.len() != rows * cols || dst.len() != rows * cols {
            return Err(EngineError::FloodFillFailure {
                label: label.to_string(),
                reason: "raster length does not match rows*cols".into(),
            });
        }
        if rows == 0 || cols == 0 {
            return Ok(());
        }

        // Marker: boundary frame, `+inf` (represented as i32::MAX) interior.
        let mut marker = vec![i32::MAX; rows * cols];
        for c in 0..cols {
            marker[c] = boundary as i32;
            marker[(rows - 1) * cols + c] = boundary as i32;
        }
        for r in 0..rows {
            marker[r * cols] = boundary as i32;
            marker[r * cols + cols - 1] = boundary as i32;
        }

        let mask: Vec<i32> = src.iter().map(|&v| v as i32).collect();
        let idx = |r: usize, c: usize| r * cols + c;

        // Raster + anti-raster relaxation to a fixed point: J(p) = max(I(p),
        // min(J(p), neighbors)), the standard reconstruction-by-erosion
        // sweep pair.
        loop {
            let mut changed = false;

            for r in 0..rows {
                for c in 0..cols {
                    let p = idx(r, c);
                    let mut m = marker[p];
                    if r > 0 {
                        m = m.min(marker[idx(r - 1, c)]);
                    }
                    if c > 0 {
                        m = m.min(marker[idx(r, c - 1)]);
                    }
                    let new_val = m.max(mask[p]);
                    if new_val != marker[p] {
                        marker[p] = new_val;
                        changed = true;
                    }
                }
            }

            for r in (0..rows).rev() {
                for c in (0..cols).rev() {
                    let p = idx(r, c);
                    let mut m = marker[p];
                    if r + 1 < rows {
                        m = m.min(marker[idx(r + 1, c)]);
                    }
                    if c + 1 < cols {
                        m = m.min(marker[idx(r, c + 1)]);
                    }
                    let new_val = m.max(mask[p]);
                    if new_val != marker[p] {
                        marker[p] = new_val;
                        changed = true;
                    }
                }
            }

            if !changed {
                break;
            }
        }

        for (d, &m) in dst.iter_mut().zip(marker.iter()) {
            *d = m.clamp(i16::MIN as i32, i16::MAX as i32) as i16;
        }

        Ok(())
    }
}
