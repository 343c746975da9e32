use crate::{
    allocator::{CpuAllocator, MatAllocator},
    error::MatError,
    mat::Mat,
    mat_type::Depth,
    Releasable,
};

/// A [`Mat`] whose depth is guaranteed to be 64-bit float.
pub struct MatOfDouble<A: MatAllocator = CpuAllocator> {
    mat: Mat<A>,
}

impl<A: MatAllocator> MatOfDouble<A> {
    /// Converts any matrix to a `f64` matrix of the same shape and channels.
    pub fn from_mat(mat: &Mat<A>) -> Result<Self, MatError> {
        Ok(Self {
            mat: mat.convert_to(Depth::F64)?,
        })
    }

    /// All values, row-major.
    pub fn as_slice(&self) -> Result<&[f64], MatError> {
        self.mat.as_slice::<f64>()
    }

    /// Copies all values into a vector.
    pub fn to_vec(&self) -> Result<Vec<f64>, MatError> {
        self.mat.to_vec::<f64>()
    }
}

impl<A: MatAllocator> std::ops::Deref for MatOfDouble<A> {
    type Target = Mat<A>;

    fn deref(&self) -> &Self::Target {
        &self.mat
    }
}

impl<A: MatAllocator> Releasable for MatOfDouble<A> {
    fn release(&mut self) {
        self.mat.release();
    }
}

impl<A: MatAllocator> std::fmt::Display for MatOfDouble<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(&self.mat, f)
    }
}

impl<A: MatAllocator> std::fmt::Debug for MatOfDouble<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("MatOfDouble").field(&self.mat).finish()
    }
}
