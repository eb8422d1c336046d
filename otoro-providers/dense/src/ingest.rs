//! Helpers for copying fixed-size list arrays into a dense buffer.

use arrow_array::{Array, FixedSizeListArray, Float32Array};
use arrow_schema::{DataType, Field};

use crate::errors::DensePointsError;

/// Validates a schema field as a non-nullable `FixedSizeList<Float32, D>`
/// and returns `D`.
pub(crate) fn column_dimension(field: &Field, column: &str) -> Result<usize, DensePointsError> {
    match field.data_type() {
        DataType::FixedSizeList(child, width) => {
            if field.is_nullable() || child.is_nullable() {
                return Err(DensePointsError::NullableField {
                    column: column.to_owned(),
                    nullable_child: child.is_nullable(),
                });
            }
            if child.data_type() != &DataType::Float32 {
                return Err(DensePointsError::InvalidListValueType {
                    actual: child.data_type().clone(),
                });
            }
            usize::try_from(*width).map_err(|_| DensePointsError::InvalidDimension { actual: *width })
        }
        other => Err(DensePointsError::InvalidColumnType {
            column: column.to_owned(),
            actual: other.clone(),
        }),
    }
}

/// Appends every row of `array` to `out`, enforcing the expected dimension
/// and rejecting nulls. `start_row` offsets row indices in error messages
/// across batches.
pub(crate) fn extend_from_list(
    array: &FixedSizeListArray,
    expected_dimension: usize,
    start_row: usize,
    out: &mut Vec<f32>,
) -> Result<(), DensePointsError> {
    let value_type = array.value_type();
    if value_type != DataType::Float32 {
        return Err(DensePointsError::InvalidListValueType { actual: value_type });
    }
    let dimension = usize::try_from(array.value_length())
        .map_err(|_| DensePointsError::InvalidDimension {
            actual: array.value_length(),
        })?;
    if dimension != expected_dimension {
        return Err(DensePointsError::InconsistentBatchDimension {
            expected: expected_dimension,
            actual: dimension,
        });
    }

    out.reserve(array.len() * dimension);
    for row_index in 0..array.len() {
        let absolute_row = start_row + row_index;
        if array.is_null(row_index) {
            return Err(DensePointsError::NullRow { row: absolute_row });
        }
        let row = array.value(row_index);
        let floats = row.as_any().downcast_ref::<Float32Array>().ok_or_else(|| {
            DensePointsError::InvalidListValueType {
                actual: row.data_type().clone(),
            }
        })?;
        if floats.null_count() > 0 {
            if let Some(position) = (0..floats.len()).find(|&index| floats.is_null(index)) {
                return Err(DensePointsError::NullValue {
                    row: absolute_row,
                    position,
                });
            }
        }
        let values = floats.values().as_ref();
        let start = floats.offset();
        out.extend_from_slice(&values[start..start + dimension]);
    }
    Ok(())
}
