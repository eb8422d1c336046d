//! Named distance metrics consumed by the spreading engine.
//!
//! The engine treats distance as an abstract pairwise capability with
//! Euclidean-like semantics (non-negative, symmetric). Metrics are selected
//! by name from a fixed registry; an unrecognized name is a configuration
//! error surfaced at parse time, never a silent fallback.

use core::fmt;
use std::str::FromStr;

use crate::error::IlsError;

/// Distance metric registry.
///
/// # Examples
/// ```
/// use otoro_core::Metric;
///
/// let metric = Metric::parse("manhattan")?;
/// assert_eq!(metric, Metric::Manhattan);
/// assert!((metric.distance(&[0.0, 0.0], &[3.0, 4.0]) - 7.0).abs() < 1e-6);
/// assert!(Metric::parse("hamming").is_err());
/// # Ok::<(), otoro_core::IlsError>(())
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Metric {
    /// Straight-line (L2) distance. The default.
    #[default]
    Euclidean,
    /// Sum of absolute coordinate differences (L1).
    Manhattan,
    /// Largest absolute coordinate difference (L∞).
    Chebyshev,
    /// One minus the cosine similarity of the two vectors.
    Cosine,
}

impl Metric {
    /// Resolves a metric by its registry name (case-insensitive).
    ///
    /// # Errors
    /// Returns [`IlsError::UnknownMetric`] for names outside the registry.
    pub fn parse(name: &str) -> Result<Self, IlsError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "euclidean" => Ok(Self::Euclidean),
            "manhattan" => Ok(Self::Manhattan),
            "chebyshev" => Ok(Self::Chebyshev),
            "cosine" => Ok(Self::Cosine),
            _ => Err(IlsError::UnknownMetric {
                name: name.to_owned(),
            }),
        }
    }

    /// Returns the registry name of the metric.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Manhattan => "manhattan",
            Self::Chebyshev => "chebyshev",
            Self::Cosine => "cosine",
        }
    }

    /// Computes the distance between two equal-length vectors.
    ///
    /// Callers guarantee matching dimensions; the engine validates them once
    /// at ingestion rather than per evaluation.
    #[must_use]
    pub fn distance(self, left: &[f32], right: &[f32]) -> f32 {
        debug_assert_eq!(left.len(), right.len());
        match self {
            Self::Euclidean => euclidean(left, right),
            Self::Manhattan => manhattan(left, right),
            Self::Chebyshev => chebyshev(left, right),
            Self::Cosine => cosine(left, right),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = IlsError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Self::parse(name)
    }
}

fn euclidean(left: &[f32], right: &[f32]) -> f32 {
    let mut sum = 0.0_f64;
    for (&l, &r) in left.iter().zip(right.iter()) {
        let diff = f64::from(l) - f64::from(r);
        sum += diff * diff;
    }
    sum.sqrt() as f32
}

fn manhattan(left: &[f32], right: &[f32]) -> f32 {
    let mut sum = 0.0_f64;
    for (&l, &r) in left.iter().zip(right.iter()) {
        sum += (f64::from(l) - f64::from(r)).abs();
    }
    sum as f32
}

fn chebyshev(left: &[f32], right: &[f32]) -> f32 {
    let mut largest = 0.0_f64;
    for (&l, &r) in left.iter().zip(right.iter()) {
        largest = largest.max((f64::from(l) - f64::from(r)).abs());
    }
    largest as f32
}

fn cosine(left: &[f32], right: &[f32]) -> f32 {
    let mut dot = 0.0_f64;
    let mut left_sq = 0.0_f64;
    let mut right_sq = 0.0_f64;
    for (&l, &r) in left.iter().zip(right.iter()) {
        dot += f64::from(l) * f64::from(r);
        left_sq += f64::from(l) * f64::from(l);
        right_sq += f64::from(r) * f64::from(r);
    }
    let norms = left_sq.sqrt() * right_sq.sqrt();
    // A zero-magnitude vector has no direction; treat it as orthogonal.
    if norms == 0.0 {
        return 1.0;
    }
    (1.0 - dot / norms) as f32
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("euclidean", Metric::Euclidean)]
    #[case("Euclidean", Metric::Euclidean)]
    #[case(" manhattan ", Metric::Manhattan)]
    #[case("chebyshev", Metric::Chebyshev)]
    #[case("COSINE", Metric::Cosine)]
    fn parse_accepts_registry_names(#[case] name: &str, #[case] expected: Metric) {
        assert_eq!(Metric::parse(name).expect("name must parse"), expected);
    }

    #[test]
    fn parse_rejects_unknown_names() {
        let err = Metric::parse("mahalanobis").expect_err("name outside registry must fail");
        assert!(matches!(err, IlsError::UnknownMetric { ref name } if name == "mahalanobis"));
    }

    #[rstest]
    #[case(Metric::Euclidean, 5.0)]
    #[case(Metric::Manhattan, 7.0)]
    #[case(Metric::Chebyshev, 4.0)]
    fn kernels_match_reference_values(#[case] metric: Metric, #[case] expected: f32) {
        let d = metric.distance(&[0.0, 0.0], &[3.0, 4.0]);
        assert!((d - expected).abs() < 1e-6, "expected {expected}, got {d}");
    }

    #[rstest]
    #[case(Metric::Euclidean)]
    #[case(Metric::Manhattan)]
    #[case(Metric::Chebyshev)]
    #[case(Metric::Cosine)]
    fn metrics_are_symmetric_and_zero_on_identity(#[case] metric: Metric) {
        let a = [1.5_f32, -2.0, 0.25];
        let b = [0.5_f32, 3.0, -1.0];
        let ab = metric.distance(&a, &b);
        let ba = metric.distance(&b, &a);
        assert!((ab - ba).abs() < 1e-6);
        assert!(metric.distance(&a, &a).abs() < 1e-6);
        assert!(ab >= 0.0);
    }

    #[test]
    fn cosine_guards_zero_magnitude() {
        assert_eq!(Metric::Cosine.distance(&[0.0, 0.0], &[1.0, 0.0]), 1.0);
    }
}
