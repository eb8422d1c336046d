//! Error types for the otoro core library.
//!
//! Defines the top-level error enum exposed by the public API and a
//! convenient result alias. Component-local errors (curve, peaks, spread,
//! dataset) live with their modules and are wrapped here.

use std::fmt;

use thiserror::Error;

use crate::{curve::CurveError, peaks::PeakError, spread::SpreadError};

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error type produced when configuring or running [`crate::Ils`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum IlsError {
    /// Minimum cluster size must be greater than zero.
    #[error("min_cluster_size must be at least 1 (got {got})")]
    InvalidMinClusterSize {
        /// The invalid minimum cluster size supplied by the caller.
        got: usize,
    },
    /// Target cluster count must be greater than zero.
    #[error("n_clusters must be at least 1 (got {got})")]
    InvalidClusterCount {
        /// The invalid cluster count supplied by the caller.
        got: usize,
    },
    /// Peak sensitivity must be a positive finite value.
    #[error("sensitivity must be finite and greater than zero (got {got})")]
    InvalidSensitivity {
        /// The invalid sensitivity supplied by the caller.
        got: f32,
    },
    /// The requested metric name is not in the registry.
    #[error(
        "unknown metric `{name}`; expected one of euclidean, manhattan, chebyshev, cosine"
    )]
    UnknownMetric {
        /// The unrecognized metric name supplied by the caller.
        name: String,
    },
    /// The dataset is too small to spread labels over.
    #[error("dataset has {items} points but label spreading requires at least {required}")]
    TooFewPoints {
        /// Number of points supplied to `fit`.
        items: usize,
        /// Minimum number of points the pipeline needs.
        required: usize,
    },
    /// Query points do not match the fitted dataset dimension.
    #[error("query dimension {found} does not match fitted dimension {expected}")]
    QueryDimensionMismatch {
        /// Dimensionality of the fitted dataset.
        expected: usize,
        /// Dimensionality of the supplied query points.
        found: usize,
    },
    /// Curve processing failed on a degenerate input.
    #[error("curve processing failed: {error}")]
    Curve {
        /// Underlying curve-processor error.
        #[source]
        error: CurveError,
    },
    /// Peak analysis failed.
    #[error("peak analysis failed: {error}")]
    Peaks {
        /// Underlying peak-analyzer error.
        #[source]
        error: PeakError,
    },
    /// Label spreading violated a propagation invariant.
    #[error("label spreading failed: {error}")]
    Spread {
        /// Underlying spreading invariant error.
        #[source]
        error: SpreadError,
    },
}

define_error_codes! {
    /// Stable codes describing [`IlsError`] variants.
    enum IlsErrorCode for IlsError {
        /// Minimum cluster size must be greater than zero.
        InvalidMinClusterSize => InvalidMinClusterSize { .. } => "ILS_INVALID_MIN_CLUSTER_SIZE",
        /// Target cluster count must be greater than zero.
        InvalidClusterCount => InvalidClusterCount { .. } => "ILS_INVALID_CLUSTER_COUNT",
        /// Peak sensitivity must be a positive finite value.
        InvalidSensitivity => InvalidSensitivity { .. } => "ILS_INVALID_SENSITIVITY",
        /// The requested metric name is not in the registry.
        UnknownMetric => UnknownMetric { .. } => "ILS_UNKNOWN_METRIC",
        /// The dataset is too small to spread labels over.
        TooFewPoints => TooFewPoints { .. } => "ILS_TOO_FEW_POINTS",
        /// Query points do not match the fitted dataset dimension.
        QueryDimensionMismatch => QueryDimensionMismatch { .. } => "ILS_QUERY_DIMENSION_MISMATCH",
        /// Curve processing failed on a degenerate input.
        CurveFailure => Curve { .. } => "ILS_CURVE_FAILURE",
        /// Peak analysis failed.
        PeakFailure => Peaks { .. } => "ILS_PEAK_FAILURE",
        /// Label spreading violated a propagation invariant.
        SpreadFailure => Spread { .. } => "ILS_SPREAD_FAILURE",
    }
}

impl From<CurveError> for IlsError {
    fn from(error: CurveError) -> Self {
        Self::Curve { error }
    }
}

impl From<PeakError> for IlsError {
    fn from(error: PeakError) -> Self {
        Self::Peaks { error }
    }
}

impl From<SpreadError> for IlsError {
    fn from(error: SpreadError) -> Self {
        Self::Spread { error }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, IlsError>;
