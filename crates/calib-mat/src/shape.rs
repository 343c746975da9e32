use calib_mat_core::{Mat, MatAllocator, MatType};

/// The two matrix shapes a calibration record carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CalibrationShape {
    /// 3x3 `CV_64FC1` camera intrinsics matrix.
    CameraMatrix,
    /// 1x5 `CV_64FC1` distortion coefficients `[k1, k2, p1, p2, k3]`.
    DistortionCoeffs,
}

impl CalibrationShape {
    /// Classifies a raw `(type, rows, cols)` triple.
    pub fn from_parts(type_code: i32, rows: usize, cols: usize) -> Option<Self> {
        if type_code != MatType::CV_64FC1.code() {
            return None;
        }
        match (rows, cols) {
            (3, 3) => Some(Self::CameraMatrix),
            (1, 5) => Some(Self::DistortionCoeffs),
            _ => None,
        }
    }

    /// Classifies a native matrix.
    pub fn classify<A: MatAllocator>(mat: &Mat<A>) -> Option<Self> {
        Self::from_parts(mat.mat_type().code(), mat.rows(), mat.cols())
    }

    /// `(rows, cols)` of this shape.
    pub const fn dims(self) -> (usize, usize) {
        match self {
            Self::CameraMatrix => (3, 3),
            Self::DistortionCoeffs => (1, 5),
        }
    }

    /// Number of values a record of this shape holds.
    pub const fn num_values(self) -> usize {
        let (rows, cols) = self.dims();
        rows * cols
    }
}

/// True for a 3x3 `CV_64FC1` matrix.
pub fn is_camera_matrix_shape<A: MatAllocator>(mat: &Mat<A>) -> bool {
    CalibrationShape::classify(mat) == Some(CalibrationShape::CameraMatrix)
}

/// True for a 1x5 `CV_64FC1` matrix.
pub fn is_distortion_coeffs_shape<A: MatAllocator>(mat: &Mat<A>) -> bool {
    CalibrationShape::classify(mat) == Some(CalibrationShape::DistortionCoeffs)
}

/// True for either calibration shape.
pub fn is_calibration_shape<A: MatAllocator>(mat: &Mat<A>) -> bool {
    is_camera_matrix_shape(mat) || is_distortion_coeffs_shape(mat)
}
