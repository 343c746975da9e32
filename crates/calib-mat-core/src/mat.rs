use crate::{
    allocator::{CpuAllocator, MatAllocator},
    error::MatError,
    mat_type::{Depth, Element, MatType},
    storage::MatStorage,
    Releasable,
};

/// A dense two-dimensional matrix with a runtime element type tag.
///
/// Elements are stored row-major and contiguous; multi-channel elements keep
/// their channels interleaved. The buffer is owned exclusively by the matrix
/// and may be freed early with [`Mat::release`], after which the matrix
/// reports an empty `0x0` shape and typed access fails with
/// [`MatError::Released`].
///
/// # Example
///
/// ```rust
/// use calib_mat_core::{Mat, MatType};
///
/// let mut mat = Mat::new(3, 3, MatType::CV_64FC1).unwrap();
/// mat.put(0, 0, &[1.0f64, 2.0, 3.0]).unwrap();
///
/// let mut row = [0.0f64; 3];
/// assert_eq!(mat.get(0, 0, &mut row).unwrap(), 3);
/// assert_eq!(row, [1.0, 2.0, 3.0]);
/// ```
pub struct Mat<A: MatAllocator = CpuAllocator> {
    rows: usize,
    cols: usize,
    mat_type: MatType,
    storage: MatStorage<A>,
}

impl Mat<CpuAllocator> {
    /// Creates a zero-filled matrix on the CPU allocator.
    pub fn new(rows: usize, cols: usize, mat_type: MatType) -> Result<Self, MatError> {
        Self::new_in(rows, cols, mat_type, CpuAllocator)
    }

    /// Creates a single-channel matrix from row-major values.
    ///
    /// # Errors
    ///
    /// Returns [`MatError::InvalidDataLength`] if `data.len() != rows * cols`.
    pub fn from_slice<T: Element>(rows: usize, cols: usize, data: &[T]) -> Result<Self, MatError> {
        let total = rows
            .checked_mul(cols)
            .ok_or(MatError::TooLarge { rows, cols })?;
        if data.len() != total {
            return Err(MatError::InvalidDataLength(data.len(), total));
        }
        let mut mat = Self::new(rows, cols, MatType::new(T::DEPTH, 1)?)?;
        mat.as_slice_mut::<T>()?.copy_from_slice(data);
        Ok(mat)
    }
}

impl<A: MatAllocator> Mat<A> {
    /// Creates a zero-filled matrix using the given allocator.
    pub fn new_in(rows: usize, cols: usize, mat_type: MatType, alloc: A) -> Result<Self, MatError> {
        let len = rows
            .checked_mul(cols)
            .and_then(|n| n.checked_mul(mat_type.elem_size()))
            .ok_or(MatError::TooLarge { rows, cols })?;
        let storage = MatStorage::new(len, alloc)?;
        Ok(Self {
            rows,
            cols,
            mat_type,
            storage,
        })
    }

    /// Number of rows, 0 after release.
    pub fn rows(&self) -> usize {
        if self.storage.is_released() {
            0
        } else {
            self.rows
        }
    }

    /// Number of columns, 0 after release.
    pub fn cols(&self) -> usize {
        if self.storage.is_released() {
            0
        } else {
            self.cols
        }
    }

    /// Element type tag.
    pub fn mat_type(&self) -> MatType {
        self.mat_type
    }

    /// Channel depth.
    pub fn depth(&self) -> Depth {
        self.mat_type.depth()
    }

    /// Number of channels per element.
    pub fn channels(&self) -> usize {
        self.mat_type.channels()
    }

    /// Number of elements, `rows * cols`.
    pub fn total(&self) -> usize {
        self.rows() * self.cols()
    }

    /// Size in bytes of one element.
    pub fn elem_size(&self) -> usize {
        self.mat_type.elem_size()
    }

    /// Returns true if the matrix holds no elements.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Returns true once the storage has been released.
    pub fn is_released(&self) -> bool {
        self.storage.is_released()
    }

    fn check_depth<T: Element>(&self) -> Result<(), MatError> {
        if T::DEPTH != self.depth() {
            return Err(MatError::DepthMismatch {
                expected: T::DEPTH,
                actual: self.depth(),
            });
        }
        Ok(())
    }

    /// Offset in scalars of element `(row, col)`.
    fn scalar_offset(&self, row: usize, col: usize) -> Result<usize, MatError> {
        if row >= self.rows() || col >= self.cols() {
            return Err(MatError::IndexOutOfBounds {
                row,
                col,
                rows: self.rows(),
                cols: self.cols(),
            });
        }
        Ok((row * self.cols + col) * self.channels())
    }

    /// All scalars of the matrix, row-major with interleaved channels.
    pub fn as_slice<T: Element>(&self) -> Result<&[T], MatError> {
        self.check_depth::<T>()?;
        let bytes = self.storage.as_bytes().ok_or(MatError::Released)?;
        if bytes.is_empty() {
            return Ok(&[]);
        }
        // SAFETY: the buffer is MAT_ALIGN aligned, sized in whole elements of
        // the checked depth and zero-initialized.
        Ok(unsafe {
            std::slice::from_raw_parts(
                bytes.as_ptr() as *const T,
                bytes.len() / std::mem::size_of::<T>(),
            )
        })
    }

    /// All scalars of the matrix as a mutable slice.
    pub fn as_slice_mut<T: Element>(&mut self) -> Result<&mut [T], MatError> {
        self.check_depth::<T>()?;
        let bytes = self.storage.as_bytes_mut().ok_or(MatError::Released)?;
        if bytes.is_empty() {
            return Ok(&mut []);
        }
        // SAFETY: see `as_slice`; the buffer is exclusively borrowed.
        Ok(unsafe {
            std::slice::from_raw_parts_mut(
                bytes.as_mut_ptr() as *mut T,
                bytes.len() / std::mem::size_of::<T>(),
            )
        })
    }

    /// Copies all scalars into a vector.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>, MatError> {
        Ok(self.as_slice::<T>()?.to_vec())
    }

    /// Writes `values` row-major starting at `(row, col)`.
    ///
    /// Values that would run past the end of the matrix are ignored.
    ///
    /// # Returns
    ///
    /// The number of scalars written.
    pub fn put<T: Element>(&mut self, row: usize, col: usize, values: &[T]) -> Result<usize, MatError> {
        let start = self.scalar_offset(row, col)?;
        let dst = &mut self.as_slice_mut::<T>()?[start..];
        let n = values.len().min(dst.len());
        dst[..n].copy_from_slice(&values[..n]);
        Ok(n)
    }

    /// Reads scalars row-major starting at `(row, col)` into `out`.
    ///
    /// `out` may be longer than the remaining data; the tail is left untouched.
    ///
    /// # Returns
    ///
    /// The number of scalars read.
    pub fn get<T: Element>(&self, row: usize, col: usize, out: &mut [T]) -> Result<usize, MatError> {
        let start = self.scalar_offset(row, col)?;
        let src = &self.as_slice::<T>()?[start..];
        let n = out.len().min(src.len());
        out[..n].copy_from_slice(&src[..n]);
        Ok(n)
    }

    /// Converts the matrix to another depth, keeping shape and channels.
    ///
    /// Integer targets round to nearest and saturate.
    pub fn convert_to(&self, depth: Depth) -> Result<Mat<A>, MatError> {
        if self.is_released() {
            return Err(MatError::Released);
        }
        let values = self.widen()?;
        let mut dst = Mat::new_in(
            self.rows,
            self.cols,
            MatType::new(depth, self.channels())?,
            self.storage.allocator().clone(),
        )?;
        dst.narrow(&values)?;
        Ok(dst)
    }

    fn widen(&self) -> Result<Vec<f64>, MatError> {
        fn collect<T: Element, A: MatAllocator>(mat: &Mat<A>) -> Result<Vec<f64>, MatError> {
            Ok(mat.as_slice::<T>()?.iter().map(|v| v.to_f64()).collect())
        }
        match self.depth() {
            Depth::U8 => collect::<u8, A>(self),
            Depth::I8 => collect::<i8, A>(self),
            Depth::U16 => collect::<u16, A>(self),
            Depth::I16 => collect::<i16, A>(self),
            Depth::I32 => collect::<i32, A>(self),
            Depth::F32 => collect::<f32, A>(self),
            Depth::F64 => collect::<f64, A>(self),
        }
    }

    fn narrow(&mut self, values: &[f64]) -> Result<(), MatError> {
        fn fill<T: Element, A: MatAllocator>(mat: &mut Mat<A>, values: &[f64]) -> Result<(), MatError> {
            for (dst, &v) in mat.as_slice_mut::<T>()?.iter_mut().zip(values) {
                *dst = T::from_f64(v);
            }
            Ok(())
        }
        match self.depth() {
            Depth::U8 => fill::<u8, A>(self, values),
            Depth::I8 => fill::<i8, A>(self, values),
            Depth::U16 => fill::<u16, A>(self, values),
            Depth::I16 => fill::<i16, A>(self, values),
            Depth::I32 => fill::<i32, A>(self, values),
            Depth::F32 => fill::<f32, A>(self, values),
            Depth::F64 => fill::<f64, A>(self, values),
        }
    }
}

impl<A: MatAllocator> Releasable for Mat<A> {
    /// Frees the matrix buffer. Safe to call more than once.
    fn release(&mut self) {
        if !self.storage.is_released() {
            log::trace!("releasing {}x{} {} matrix", self.rows, self.cols, self.mat_type);
        }
        self.storage.release();
    }
}

impl<A: MatAllocator> std::fmt::Display for Mat<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Mat [ {}*{}*{}, released={} ]",
            self.rows(),
            self.cols(),
            self.mat_type,
            self.is_released()
        )
    }
}

impl<A: MatAllocator> std::fmt::Debug for Mat<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mat")
            .field("rows", &self.rows())
            .field("cols", &self.cols())
            .field("mat_type", &self.mat_type)
            .field("storage", &self.storage)
            .finish()
    }
}
