use std::alloc;
use std::alloc::Layout;

use thiserror::Error;

/// An error type for matrix allocator operations.
#[derive(Debug, Error, PartialEq)]
pub enum MatAllocatorError {
    /// The requested size and alignment do not form a valid layout.
    #[error("Invalid matrix layout {0}")]
    LayoutError(#[from] core::alloc::LayoutError),

    /// The allocator returned a null pointer.
    #[error("Null pointer")]
    NullPointer,
}

/// A trait for allocating and deallocating the backing memory of a matrix.
///
/// Implementations must return zero-initialized memory from `alloc`, so that a
/// freshly created matrix reads back as all zeros.
pub trait MatAllocator: Clone {
    /// Allocates zeroed memory for a matrix with the given layout.
    fn alloc(&self, layout: Layout) -> Result<*mut u8, MatAllocatorError>;

    /// Deallocates memory previously returned by [`MatAllocator::alloc`].
    fn dealloc(&self, ptr: *mut u8, layout: Layout);
}

/// A matrix allocator that uses the system allocator.
#[derive(Clone, Debug, Default)]
pub struct CpuAllocator;

impl MatAllocator for CpuAllocator {
    /// Allocates zeroed memory. `layout` must have a non-zero size.
    fn alloc(&self, layout: Layout) -> Result<*mut u8, MatAllocatorError> {
        let ptr = unsafe { alloc::alloc_zeroed(layout) };
        if ptr.is_null() {
            Err(MatAllocatorError::NullPointer)?
        }
        Ok(ptr)
    }

    /// Deallocates memory for a matrix with the given layout.
    ///
    /// # Safety
    ///
    /// The pointer must come from [`CpuAllocator::alloc`] with the same layout.
    #[allow(clippy::not_unsafe_ptr_arg_deref)]
    fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        if !ptr.is_null() {
            unsafe { alloc::dealloc(ptr, layout) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpu_allocator_zeroed() -> Result<(), MatAllocatorError> {
        let allocator = CpuAllocator;
        let layout = Layout::from_size_align(72, 16)?;
        let ptr = allocator.alloc(layout)?;
        let bytes = unsafe { std::slice::from_raw_parts(ptr, layout.size()) };
        assert!(bytes.iter().all(|&b| b == 0));
        allocator.dealloc(ptr, layout);
        Ok(())
    }
}
