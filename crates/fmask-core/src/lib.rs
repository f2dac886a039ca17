//! # Fmask Core
//!
//! Potential cloud, cloud-shadow, and snow mask classifier for multispectral
//! satellite imagery.
//!
//! ## Design Principles
//!
//! 1. **Collaborators at the seams** - raster I/O, percentile statistics, and
//!    flood-fill reconstruction are traits; this crate supplies the
//!    classification algorithm, not the numerics or storage backend.
//! 2. **Streaming, row at a time** - no pass materializes more than the
//!    scene-wide scratch arrays it genuinely needs across the full image.
//! 3. **Deterministic** - every pass is a pure function of its inputs plus
//!    the collaborators it's given; no hidden global state.
//! 4. **Explicit precision** - reflective/thermal samples stay `i16`
//!    end to end; only derived spectral indices promote to `f64`.
//! 5. **Batch-first** - every pass exposes a single-pixel pure function
//!    alongside its row-driver, so the decision logic is testable in
//!    isolation from the streaming loop.
//!
//! ## Architecture
//!
//! - **[`image`]**: band indices, the immutable [`image::ImageDescriptor`],
//!   and reusable per-row buffers.
//! - **[`mask`]**: the `pixel_mask`/`conf_mask`/`clear_mask` bit layouts.
//! - **[`spectral`]**: NDVI/NDSI/whiteness/HOT and epsilon-aware comparisons.
//! - **[`collaborators`]**: the `RowSource`/`PercentileService`/
//!   `Percentile2Service`/`FloodFillService` contracts.
//! - **[`passes`]**: the six-pass pipeline, one submodule per pass.
//! - **[`engine`]**: the entry point that sequences the passes and applies
//!   the all-cloud shortcut.
//! - **[`error`]**: the fatal error taxonomy.
//! - **[`reference`]** *(feature `reference`)*: non-production collaborator
//!   implementations for tests and demos.
//!
//! ## Quick Start
//!
//! Requires the `reference` feature (the collaborator implementations below
//! are test/demo-only, not part of the default build):
//!
//! ```rust,ignore
//! use fmask_core::engine;
//! use fmask_core::image::ImageDescriptor;
//! use fmask_core::mask::conf;
//! use fmask_core::reference::{InMemorySource, ReferenceFloodFill, ReferencePercentile};
//!
//! let desc = ImageDescriptor {
//!     rows: 1,
//!     cols: 1,
//!     bands: 6,
//!     satu_value_ref: vec![20000; 6],
//!     satu_value_max: vec![10000; 6],
//!     therm_satu_value_ref: -9999,
//!     therm_satu_value_max: -273,
//! };
//! let mut source = InMemorySource::single_pixel(400, 500, 600, 3000, 1500, 800, 2500);
//! let percentile = ReferencePercentile;
//! let floodfill = ReferenceFloodFill;
//! let mut pixel_mask = vec![0u8; desc.pixel_count()];
//! let mut conf_mask = vec![conf::NONE; desc.pixel_count()];
//!
//! let summary = engine::run(&desc, &mut source, &percentile, &floodfill, 22.5, &mut pixel_mask, &mut conf_mask, false)
//!     .expect("classification run");
//! println!("clear_ptm={:.1}", summary.clear_ptm);
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `internals` | Expose pass-internal constants and thresholds for debugging/education |
//! | `reference` | Enable the non-production reference collaborator implementations |
//!
//! ### Using the `internals` Feature
//!
//! ```toml
//! fmask-core = { version = "0.1", features = ["internals"] }
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod collaborators;
pub mod constants;
pub mod engine;
pub mod error;
pub mod image;
pub mod mask;
pub mod passes;
pub mod spectral;

#[cfg(any(test, feature = "reference"))]
pub mod reference;

pub use collaborators::{FloodFillService, Percentile2Service, PercentileService, RowSource};
pub use engine::{RunSummary, ALL_CLOUD_CLEAR_PTM_FLOOR};
pub use error::EngineError;
pub use image::ImageDescriptor;

// ============================================================================
// Internals Module - Advanced Debugging (Feature-Gated)
// ============================================================================

/// Internal pass constants exposed for debugging and education.
///
/// # Feature Flag
///
/// Requires `internals` feature.
///
/// # Warning
///
/// These APIs are not covered by semver guarantees and may change between
/// minor versions. Use only for debugging or education.
#[cfg(feature = "internals")]
pub mod internals {
    //! Scene-wide constants and per-pass thresholds exposed for debugging.

    pub use crate::constants::{FILL_PIXEL, MINSIGMA, TEMP_BUFFER, ZERO_DENOM_DEFAULT};
    pub use crate::passes::p6_shadow::SHADOW_PROB_THRESHOLD;
}
