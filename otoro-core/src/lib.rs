//! Otoro core library.
//!
//! Implements Iterative Label Spreading (ILS): a clustering method that
//! discovers structure in a point cloud by greedily spreading labels from a
//! single seed, reading cluster boundaries off the resulting minimum-spread
//! distance curve, and re-spreading from one seed per discovered region.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod curve;
mod dataset;
mod distance;
mod error;
mod ils;
mod peaks;
mod result;
mod spread;

pub use crate::{
    builder::IlsBuilder,
    curve::{
        CurveError, CurveErrorCode, TAIL_PIN_OFFSET, gaussian_smooth, log_rescale_and_invert,
        moving_max, normalize, pin_tail,
    },
    dataset::{PointSet, PointSetError, PointSetErrorCode},
    distance::Metric,
    error::{IlsError, IlsErrorCode, Result},
    ils::{FittedIls, Ils},
    peaks::{PeakError, PeakErrorCode, Selection, find_peaks, minima_between, peak_prominence},
    result::Label,
    spread::{SpreadError, SpreadErrorCode},
};
