use calib_mat_core::MatError;
use calib_mat_packet::PacketError;

/// An error type for validated calibration matrix construction and decoding.
#[derive(Debug, thiserror::Error)]
pub enum CalibrationError {
    /// The number of values does not match `rows * cols`.
    #[error("Data length ({actual}) does not match the matrix size {rows}x{cols}")]
    DataLength {
        /// Declared rows.
        rows: usize,
        /// Declared columns.
        cols: usize,
        /// Number of values supplied.
        actual: usize,
    },

    /// The element type tag is not a valid tag.
    #[error(transparent)]
    Mat(#[from] MatError),

    /// The packet could not be read.
    #[error(transparent)]
    Packet(#[from] PacketError),
}
