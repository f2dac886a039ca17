//! Scalar constants shared across every pass.
//!
//! A small, dependency-free home for the handful of numeric literals the
//! spectral tests and percentile glue need, kept out of the pass modules so
//! the thresholds are easy to audit in one place.

/// Sentinel marking a pixel as outside the sensor footprint or otherwise
/// invalid. Any required reflective band equal to this value, or a thermal
/// sample `<= FILL_PIXEL`, marks the pixel `FILL`.
pub const FILL_PIXEL: i16 = -9999;

/// Epsilon used to approximate strict `<`/`>` comparisons between floats in
/// the spectral tests, so that boundary pixels do not flip classification
/// due to floating-point rounding.
pub const MINSIGMA: f64 = 1e-7;

/// Default fallback used when a derived ratio's denominator is (numerically)
/// zero, e.g. NDVI or NDSI over a zero-sum band pair.
pub const ZERO_DENOM_DEFAULT: f64 = 0.01;

/// Buffer (in hundredths of a degree C) by which the land temperature
/// interval is widened after P2's percentiles are computed.
pub const TEMP_BUFFER: f64 = 400.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_pixel_is_negative_sentinel() {
        assert!(FILL_PIXEL < 0);
    }

    #[test]
    fn minsigma_is_small_and_positive() {
        assert!(MINSIGMA > 0.0 && MINSIGMA < 1e-3);
    }
}
