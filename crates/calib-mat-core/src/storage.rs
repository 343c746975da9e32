//! Exclusively owned raw storage backing a [`crate::Mat`].
//!
//! Unlike a reference-counted tensor buffer, a matrix buffer has a single
//! owner and can be freed ahead of drop through [`MatStorage::release`].

use std::{alloc::Layout, ptr::NonNull};

use crate::allocator::{MatAllocator, MatAllocatorError};

/// Alignment of every matrix buffer, enough for any supported depth.
pub const MAT_ALIGN: usize = 16;

/// Zero-initialized byte buffer with an explicit release hook.
pub struct MatStorage<A: MatAllocator> {
    /// Pointer to the buffer; `None` once released or for zero-sized buffers.
    ptr: Option<NonNull<u8>>,
    /// Layout used for the allocation.
    layout: Layout,
    /// Set once [`MatStorage::release`] has run.
    released: bool,
    alloc: A,
}

impl<A: MatAllocator> MatStorage<A> {
    /// Allocates `len` zeroed bytes.
    ///
    /// Zero-length storage never touches the allocator.
    pub fn new(len: usize, alloc: A) -> Result<Self, MatAllocatorError> {
        let layout = Layout::from_size_align(len, MAT_ALIGN)?;
        let ptr = if len == 0 {
            None
        } else {
            let raw = alloc.alloc(layout)?;
            Some(NonNull::new(raw).ok_or(MatAllocatorError::NullPointer)?)
        };
        Ok(Self {
            ptr,
            layout,
            released: false,
            alloc,
        })
    }

    /// Number of bytes in the buffer, 0 after release.
    #[inline]
    pub fn len(&self) -> usize {
        if self.released {
            0
        } else {
            self.layout.size()
        }
    }

    /// Returns true if the buffer holds no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true once the buffer has been released.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.released
    }

    /// The allocator backing this buffer.
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Returns the buffer as bytes, or `None` after release.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        if self.released {
            return None;
        }
        Some(match self.ptr {
            // SAFETY: ptr is valid for layout.size() bytes until released
            Some(ptr) => unsafe { std::slice::from_raw_parts(ptr.as_ptr(), self.layout.size()) },
            None => &[],
        })
    }

    /// Returns the buffer as mutable bytes, or `None` after release.
    pub fn as_bytes_mut(&mut self) -> Option<&mut [u8]> {
        if self.released {
            return None;
        }
        Some(match self.ptr {
            // SAFETY: ptr is valid and exclusively owned until released
            Some(ptr) => unsafe {
                std::slice::from_raw_parts_mut(ptr.as_ptr(), self.layout.size())
            },
            None => &mut [],
        })
    }

    /// Frees the buffer. Calling it again does nothing.
    pub fn release(&mut self) {
        if let Some(ptr) = self.ptr.take() {
            self.alloc.dealloc(ptr.as_ptr(), self.layout);
        }
        self.released = true;
    }
}

// SAFETY: the buffer is exclusively owned and only reachable through this value.
unsafe impl<A: MatAllocator + Send> Send for MatStorage<A> {}

// SAFETY: shared references only expose immutable byte slices.
unsafe impl<A: MatAllocator + Sync> Sync for MatStorage<A> {}

impl<A: MatAllocator> Drop for MatStorage<A> {
    fn drop(&mut self) {
        self.release();
    }
}

impl<A: MatAllocator> std::fmt::Debug for MatStorage<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatStorage")
            .field("ptr", &self.ptr)
            .field("len", &self.len())
            .field("released", &self.released)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocator::CpuAllocator;

    #[test]
    fn test_storage_release_is_idempotent() -> Result<(), MatAllocatorError> {
        let mut storage = MatStorage::new(40, CpuAllocator)?;
        assert_eq!(storage.len(), 40);
        assert_eq!(storage.as_bytes().map(|b| b.len()), Some(40));
        storage.release();
        assert!(storage.is_released());
        assert!(storage.is_empty());
        assert!(storage.as_bytes().is_none());
        storage.release();
        assert!(storage.is_released());
        Ok(())
    }

    #[test]
    fn test_zero_sized_storage() -> Result<(), MatAllocatorError> {
        let storage = MatStorage::new(0, CpuAllocator)?;
        assert!(storage.is_empty());
        assert_eq!(storage.as_bytes(), Some(&[][..]));
        Ok(())
    }
}
