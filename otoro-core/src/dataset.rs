//! Dense point storage consumed by the spreading engine.

use thiserror::Error;

/// An error produced while constructing a [`PointSet`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum PointSetError {
    /// The point set contained no rows.
    #[error("point set contains no rows")]
    Empty,
    /// Points must have positive dimension.
    #[error("points must have positive dimension")]
    ZeroDimension,
    /// A row had a different length from the first row.
    #[error("row {row} has length {found} but expected {expected}")]
    RaggedRow {
        /// Index of the offending row.
        row: usize,
        /// Dimensionality established by the first row.
        expected: usize,
        /// Length of the offending row.
        found: usize,
    },
    /// A coordinate was NaN or infinite.
    #[error("row {row} contains a non-finite value at position {position}: {value}")]
    NonFinite {
        /// Index of the offending row.
        row: usize,
        /// Position of the offending coordinate within the row.
        position: usize,
        /// The non-finite value observed.
        value: f32,
    },
    /// The flat buffer did not match the declared shape.
    #[error("buffer holds {values} values but {rows} rows of dimension {dimension} require {expected}")]
    LengthMismatch {
        /// Declared number of rows.
        rows: usize,
        /// Declared dimensionality.
        dimension: usize,
        /// Length of the supplied buffer.
        values: usize,
        /// Length the declared shape requires.
        expected: usize,
    },
}

impl PointSetError {
    /// Returns a stable, machine-readable error code for the variant.
    #[must_use]
    pub const fn code(&self) -> PointSetErrorCode {
        match self {
            Self::Empty => PointSetErrorCode::Empty,
            Self::ZeroDimension => PointSetErrorCode::ZeroDimension,
            Self::RaggedRow { .. } => PointSetErrorCode::RaggedRow,
            Self::NonFinite { .. } => PointSetErrorCode::NonFinite,
            Self::LengthMismatch { .. } => PointSetErrorCode::LengthMismatch,
        }
    }
}

/// Machine-readable error codes for [`PointSetError`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PointSetErrorCode {
    /// The point set contained no rows.
    Empty,
    /// Points must have positive dimension.
    ZeroDimension,
    /// A row had a different length from the first row.
    RaggedRow,
    /// A coordinate was NaN or infinite.
    NonFinite,
    /// The flat buffer did not match the declared shape.
    LengthMismatch,
}

impl PointSetErrorCode {
    /// Returns the symbolic identifier for logging surfaces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Empty => "POINT_SET_EMPTY",
            Self::ZeroDimension => "POINT_SET_ZERO_DIMENSION",
            Self::RaggedRow => "POINT_SET_RAGGED_ROW",
            Self::NonFinite => "POINT_SET_NON_FINITE",
            Self::LengthMismatch => "POINT_SET_LENGTH_MISMATCH",
        }
    }
}

/// Immutable dense matrix of points backed by a contiguous row-major buffer.
///
/// Validated on construction: at least one row, positive dimension,
/// consistent row lengths, and finite coordinates throughout.
///
/// # Examples
/// ```
/// use otoro_core::PointSet;
///
/// let points = PointSet::try_from_rows(&[vec![0.0, 1.0], vec![2.0, 3.0]])?;
/// assert_eq!(points.len(), 2);
/// assert_eq!(points.dimension(), 2);
/// assert_eq!(points.row(1), [2.0, 3.0]);
/// # Ok::<(), otoro_core::PointSetError>(())
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct PointSet {
    rows: usize,
    dimension: usize,
    values: Vec<f32>,
}

impl PointSet {
    /// Builds a point set from per-row slices.
    ///
    /// # Errors
    /// Returns [`PointSetError::Empty`] for zero rows,
    /// [`PointSetError::ZeroDimension`] when the first row is empty,
    /// [`PointSetError::RaggedRow`] when a later row disagrees with the first
    /// row's length, and [`PointSetError::NonFinite`] for NaN or infinite
    /// coordinates.
    pub fn try_from_rows(rows: &[Vec<f32>]) -> Result<Self, PointSetError> {
        let Some(first) = rows.first() else {
            return Err(PointSetError::Empty);
        };
        let dimension = first.len();
        if dimension == 0 {
            return Err(PointSetError::ZeroDimension);
        }

        let mut values = Vec::with_capacity(rows.len() * dimension);
        for (row, coords) in rows.iter().enumerate() {
            if coords.len() != dimension {
                return Err(PointSetError::RaggedRow {
                    row,
                    expected: dimension,
                    found: coords.len(),
                });
            }
            for (position, &value) in coords.iter().enumerate() {
                if !value.is_finite() {
                    return Err(PointSetError::NonFinite {
                        row,
                        position,
                        value,
                    });
                }
            }
            values.extend_from_slice(coords);
        }

        Ok(Self {
            rows: rows.len(),
            dimension,
            values,
        })
    }

    /// Builds a point set from a flat row-major buffer.
    ///
    /// # Errors
    /// Returns [`PointSetError::LengthMismatch`] when the buffer does not hold
    /// exactly `rows * dimension` values, plus the shape and finiteness errors
    /// documented on [`Self::try_from_rows`].
    pub fn from_parts(
        rows: usize,
        dimension: usize,
        values: Vec<f32>,
    ) -> Result<Self, PointSetError> {
        if rows == 0 {
            return Err(PointSetError::Empty);
        }
        if dimension == 0 {
            return Err(PointSetError::ZeroDimension);
        }
        let expected = rows
            .checked_mul(dimension)
            .ok_or(PointSetError::LengthMismatch {
                rows,
                dimension,
                values: values.len(),
                expected: usize::MAX,
            })?;
        if values.len() != expected {
            return Err(PointSetError::LengthMismatch {
                rows,
                dimension,
                values: values.len(),
                expected,
            });
        }
        for (index, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(PointSetError::NonFinite {
                    row: index / dimension,
                    position: index % dimension,
                    value,
                });
            }
        }
        Ok(Self {
            rows,
            dimension,
            values,
        })
    }

    /// Returns the number of points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows
    }

    /// Returns whether the set contains no points.
    ///
    /// Always `false` for a constructed set; present for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Returns the dimensionality of each point.
    #[must_use]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the underlying row-major buffer.
    #[must_use]
    pub fn data(&self) -> &[f32] {
        &self.values
    }

    /// Returns the coordinates of one point.
    ///
    /// # Panics
    /// Panics when `index >= self.len()`.
    #[must_use]
    pub fn row(&self, index: usize) -> &[f32] {
        let start = index * self.dimension;
        &self.values[start..start + self.dimension]
    }
}
