//! Errors surfaced while ingesting dense point matrices.

use arrow_schema::{ArrowError, DataType};
use otoro_core::PointSetError;
use thiserror::Error;

/// An error produced while loading points from Parquet.
#[derive(Debug, Error)]
pub enum DensePointsError {
    /// The requested column does not exist in the Parquet schema.
    #[error("column `{column}` not found in Parquet schema")]
    ColumnNotFound {
        /// Name of the missing column.
        column: String,
    },
    /// The column is not a `FixedSizeList<Float32, _>`.
    #[error("column `{column}` must be a FixedSizeList<Float32, _> but found {actual:?}")]
    InvalidColumnType {
        /// Name of the offending column.
        column: String,
        /// Arrow type actually found.
        actual: DataType,
    },
    /// The list element type is not `Float32`.
    #[error("FixedSizeList child type must be Float32 but found {actual:?}")]
    InvalidListValueType {
        /// Arrow type of the list elements.
        actual: DataType,
    },
    /// The column or its elements admit nulls.
    #[error("column `{column}` must be non-nullable (nullable elements: {nullable_child})")]
    NullableField {
        /// Name of the offending column.
        column: String,
        /// Whether the list elements are nullable too.
        nullable_child: bool,
    },
    /// The declared list width is unusable as a dimension.
    #[error("invalid FixedSizeList dimension {actual}")]
    InvalidDimension {
        /// Declared list width.
        actual: i32,
    },
    /// A row slot held no list.
    #[error("row {row} is null")]
    NullRow {
        /// Index of the null row.
        row: usize,
    },
    /// A list element was null.
    #[error("row {row} contains a null value at position {position}")]
    NullValue {
        /// Index of the offending row.
        row: usize,
        /// Position of the null element within the row.
        position: usize,
    },
    /// Batches disagreed on the row dimension.
    #[error("inconsistent dimensions across batches: expected {expected}, got {actual}")]
    InconsistentBatchDimension {
        /// Dimension established by the schema.
        expected: usize,
        /// Dimension found in a later batch.
        actual: usize,
    },
    /// The assembled matrix failed core validation.
    #[error("ingested matrix is not a valid point set: {0}")]
    Points(#[from] PointSetError),
    /// Arrow-level decoding failed.
    #[error("arrow error: {0}")]
    Arrow(#[from] ArrowError),
    /// Parquet-level decoding failed.
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    /// File I/O failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}
