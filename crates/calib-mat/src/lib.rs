#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! A [`CalibrationMatrix`] holds either a 3x3 camera intrinsics matrix or a
//! 1x5 distortion coefficient vector and moves it between three forms:
//!
//! - a JSON object `{ "rows", "cols", "type", "data" }` through `serde`,
//! - a native [`Mat`](calib_mat_core::Mat), a
//!   [`MatOfDouble`](calib_mat_core::MatOfDouble) or a [`faer::Mat`], each
//!   built on first use and cached,
//! - a [`Packet`](calib_mat_packet::Packet) carrying only the values.
//!
//! ```rust
//! use calib_mat::{packet::Packet, CalibrationMatrix};
//!
//! let json = r#"{ "rows": 1, "cols": 5, "type": 6, "data": [0.1, -0.2, 0.0, 0.0, 0.05] }"#;
//! let dist: CalibrationMatrix = serde_json::from_str(json).unwrap();
//!
//! let mut packet = Packet::default();
//! dist.populate_packet(&mut packet).unwrap();
//! assert_eq!(packet.len(), 5 * 8);
//! ```

/// Binary encoding of the full record.
pub mod bincode;

/// The [`CalibrationMatrix`] record.
pub mod calibration;

/// Error types.
pub mod error;

/// Calibration shape classification.
pub mod shape;

pub use crate::calibration::{extract_data, CalibrationMatrix};
pub use crate::error::CalibrationError;
pub use crate::shape::{
    is_calibration_shape, is_camera_matrix_shape, is_distortion_coeffs_shape, CalibrationShape,
};

#[doc(inline)]
pub use calib_mat_core as native;

#[doc(inline)]
pub use calib_mat_packet as packet;
