//! Error taxonomy for the engine.
//!
//! All four kinds are fatal to the run; there is no local recovery and no
//! retries. Hand-rolled `Display`/`Error` impls rather than pulling in
//! `thiserror`, keeping the engine dependency-light.

use std::fmt;

/// Fatal error raised by the engine. Every variant aborts the run; callers
/// must discard any partial `pixel_mask`/`conf_mask` contents on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// A scratch buffer (scene-wide array, percentile sample array, …)
    /// could not be allocated or sized consistently.
    AllocationFailure {
        /// Human-readable detail of what failed to allocate.
        detail: String,
    },

    /// The row reader reported failure.
    IoFailure {
        /// Row index being read when the failure occurred.
        row: usize,
        /// Band index being read, if the failure was band-specific (the
        /// thermal read has no band index).
        band: Option<usize>,
        /// Collaborator-supplied failure reason.
        reason: String,
    },

    /// The percentile service (`prctile`/`prctile2`) returned non-success.
    PercentileFailure {
        /// Collaborator-supplied failure reason.
        reason: String,
    },

    /// One (or both) of the flood-fill tasks failed.
    FloodFillFailure {
        /// Which raster failed (`"nir"` or `"swir1"`).
        label: String,
        /// Collaborator-supplied failure reason.
        reason: String,
    },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::AllocationFailure { detail } => {
                write!(f, "allocation failure: {detail}")
            }
            EngineError::IoFailure { row, band, reason } => match band {
                Some(band) => write!(f, "io failure at row {row}, band {band}: {reason}"),
                None => write!(f, "io failure at row {row} (thermal): {reason}"),
            },
            EngineError::PercentileFailure { reason } => {
                write!(f, "percentile failure: {reason}")
            }
            EngineError::FloodFillFailure { label, reason } => {
                write!(f, "flood-fill failure ({label}): {reason}")
            }
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_failure_with_band_includes_both_indices() {
        let err = EngineError::IoFailure {
            row: 3,
            band: Some(2),
            reason: "short read".into(),
        };
        let text = err.to_string();
        assert!(text.contains("row 3"));
        assert!(text.contains("band 2"));
    }

    #[test]
    fn io_failure_without_band_mentions_thermal() {
        let err = EngineError::IoFailure {
            row: 3,
            band: None,
            reason: "short read".into(),
        };
        assert!(err.to_string().contains("thermal"));
    }
}
