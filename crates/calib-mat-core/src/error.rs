use crate::{allocator::MatAllocatorError, mat_type::Depth};

/// An error type for native matrix operations.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum MatError {
    /// The numeric element type tag does not name a known depth and channel count.
    #[error("Unsupported element type tag {0}")]
    UnsupportedType(i32),

    /// The channel count is outside `1..=4`.
    #[error("Unsupported channel count {0}")]
    UnsupportedChannels(usize),

    /// Typed access used a scalar type that does not match the matrix depth.
    #[error("Depth mismatch: matrix holds {actual:?} but {expected:?} was requested")]
    DepthMismatch {
        /// Depth of the requested scalar type.
        expected: Depth,
        /// Depth of the matrix.
        actual: Depth,
    },

    /// The start position of a bulk access lies outside the matrix.
    #[error("Index ({row}, {col}) out of bounds for a {rows}x{cols} matrix")]
    IndexOutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
        /// Number of rows of the matrix.
        rows: usize,
        /// Number of columns of the matrix.
        cols: usize,
    },

    /// The slice length does not match the requested shape.
    #[error("Data length ({0}) does not match the matrix size ({1})")]
    InvalidDataLength(usize, usize),

    /// The matrix byte size overflows `usize`.
    #[error("Matrix of {rows}x{cols} elements is too large")]
    TooLarge {
        /// Requested rows.
        rows: usize,
        /// Requested columns.
        cols: usize,
    },

    /// The matrix storage has already been released.
    #[error("Matrix storage has been released")]
    Released,

    /// The backing buffer could not be allocated.
    #[error("Storage error: {0}")]
    StorageError(#[from] MatAllocatorError),
}
