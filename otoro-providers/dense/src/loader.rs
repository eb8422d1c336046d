//! Parquet loading of dense point matrices.

use std::{fs::File, path::Path};

use arrow_array::{Array, FixedSizeListArray, RecordBatchReader};
use otoro_core::PointSet;
use parquet::arrow::{ProjectionMask, arrow_reader::ParquetRecordBatchReaderBuilder};
use parquet::file::reader::ChunkReader;

use crate::errors::DensePointsError;
use crate::ingest::{column_dimension, extend_from_list};

/// Loads a point set from a Parquet file on disk.
///
/// `column` must name a non-nullable `FixedSizeList<Float32, D>` column; all
/// other columns are ignored.
///
/// # Errors
/// Returns [`DensePointsError`] when the file cannot be opened or decoded,
/// the column is missing or mistyped, or the decoded matrix fails core
/// validation (empty, non-finite values).
pub fn points_from_parquet_path(
    path: impl AsRef<Path>,
    column: &str,
) -> Result<PointSet, DensePointsError> {
    let file = File::open(path)?;
    points_from_parquet_reader(file, column)
}

/// Loads a point set from any Parquet chunk reader.
///
/// # Errors
/// Returns the same [`DensePointsError`] conditions as
/// [`points_from_parquet_path`].
pub fn points_from_parquet_reader<R>(
    reader: R,
    column: &str,
) -> Result<PointSet, DensePointsError>
where
    R: ChunkReader + Send + 'static,
{
    let builder = ParquetRecordBatchReaderBuilder::try_new(reader)?;
    let mask = ProjectionMask::columns(builder.parquet_schema(), [column]);
    let reader = builder.with_projection(mask).build()?;
    let schema = reader.schema();
    let column_index = schema
        .index_of(column)
        .map_err(|_| DensePointsError::ColumnNotFound {
            column: column.to_owned(),
        })?;
    let dimension = column_dimension(schema.field(column_index), column)?;

    let mut values = Vec::new();
    let mut rows = 0_usize;
    for batch in reader {
        let batch = batch?;
        let column_array = batch.column(column_index);
        let list = column_array
            .as_any()
            .downcast_ref::<FixedSizeListArray>()
            .ok_or_else(|| DensePointsError::InvalidColumnType {
                column: column.to_owned(),
                actual: column_array.data_type().clone(),
            })?;
        extend_from_list(list, dimension, rows, &mut values)?;
        rows += list.len();
    }

    Ok(PointSet::from_parts(rows, dimension, values)?)
}
