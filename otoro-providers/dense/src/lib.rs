//! Dense point ingestion for otoro.
//!
//! Loads row-major `f32` matrices from Parquet files whose feature column is
//! a non-nullable `FixedSizeList<Float32, D>`, yielding a validated
//! [`otoro_core::PointSet`] ready for fitting.

mod errors;
mod ingest;
mod loader;

pub use crate::{
    errors::DensePointsError,
    loader::{points_from_parquet_path, points_from_parquet_reader},
};
