#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Overview
//!
//! `calib-mat-core` provides the in-memory matrix that calibration records are
//! materialized into. A [`Mat`] carries a runtime element type tag
//! ([`MatType`]), stores its elements row-major in a buffer it owns
//! exclusively, and can free that buffer ahead of drop through the
//! [`Releasable`] trait.
//!
//! ```rust
//! use calib_mat_core::{Mat, MatOfDouble, Releasable};
//!
//! let mut mat = Mat::from_slice(1, 5, &[0.1f64, -0.2, 0.0, 0.0, 0.05]).unwrap();
//! let doubles = MatOfDouble::from_mat(&mat).unwrap();
//! assert_eq!(doubles.to_vec().unwrap().len(), 5);
//!
//! mat.release();
//! assert!(mat.is_empty());
//! ```

/// Allocator module containing the memory management seam.
pub mod allocator;

/// Error types for matrix operations.
pub mod error;

/// Matrix module containing [`Mat`].
pub mod mat;

/// Float matrix wrapper [`MatOfDouble`].
pub mod mat_of_double;

/// Element type tags and the [`Element`] scalar trait.
pub mod mat_type;

/// Raw exclusively owned storage.
pub mod storage;

pub use crate::allocator::{CpuAllocator, MatAllocator, MatAllocatorError};
pub use crate::error::MatError;
pub use crate::mat::Mat;
pub use crate::mat_of_double::MatOfDouble;
pub use crate::mat_type::{Depth, Element, MatType};

/// A value holding a resource that must be freed explicitly.
///
/// Implementations must tolerate repeated calls.
pub trait Releasable {
    /// Frees the held resource.
    fn release(&mut self);
}
