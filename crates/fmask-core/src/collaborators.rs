//! Collaborator contracts consumed by the engine.
//!
//! The raster I/O layer, the percentile routines, and the flood-fill
//! reconstruction are out of scope for this crate as *implementations* —
//! only their interfaces are specified here. [`crate::reference`] (behind
//! the `reference` feature) provides non-production implementations of each,
//! sufficient to run the engine end to end in tests and the CLI demo.

use crate::error::EngineError;

/// Row-read contract: streams calibrated band data one row at a time.
///
/// Implementations own their reusable row buffers; the engine treats the
/// filled slices as read-only once a read returns. A failed read aborts the
/// run (`IoFailure`).
pub trait RowSource {
    /// Fills `buf` (length `cols`) with row `row`'s samples for `band`.
    fn get_input_line(&mut self, band: usize, row: usize, buf: &mut [i16]) -> Result<(), EngineError>;

    /// Fills `buf` (length `cols`) with row `row`'s thermal samples.
    fn get_input_therm_line(&mut self, row: usize, buf: &mut [i16]) -> Result<(), EngineError>;
}

/// Percentile contract over 16-bit integer samples.
///
/// Inclusive linear-interpolation percentile; `samples.is_empty()` must
/// still produce `0.0` without failing.
pub trait PercentileService {
    /// Computes the `pct` percentile (0–100) of `samples`, given the
    /// precomputed `min`/`max` of that sample set.
    fn prctile(&self, samples: &[i16], min: i16, max: i16, pct: f64) -> Result<f64, EngineError>;
}

/// Percentile contract over 32-bit float samples — identical semantics to
/// [`PercentileService`], over `f32` rather than `i16` (`prctile2`).
pub trait Percentile2Service {
    /// Computes the `pct` percentile (0–100) of `samples`, given the
    /// precomputed `min`/`max` of that sample set.
    fn prctile2(&self, samples: &[f32], min: f32, max: f32, pct: f64) -> Result<f64, EngineError>;
}

/// Flood-fill / local-minima reconstruction contract.
///
/// Raises every local minimum of `src` to the minimum rim value reachable
/// without crossing a higher-valued cell, with `boundary` acting as the
/// outer frame value. `dst[i] >= src[i]` for every pixel `i`.
pub trait FloodFillService {
    /// Reconstructs `src` (row-major, `rows * cols`) into `dst` of the same
    /// length. `label` identifies the raster for diagnostics (`"nir"` or
    /// `"swir1"`).
    fn fill_local_minima(
        &self,
        label: &str,
        src: &[i16],
        rows: usize,
        cols: usize,
        boundary: f32,
        dst: &mut [i16],
    ) -> Result<(), EngineError>;
}
