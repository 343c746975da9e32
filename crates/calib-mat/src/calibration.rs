use std::cell::OnceCell;

use calib_mat_core::{Mat, MatAllocator, MatOfDouble, MatType, Releasable};
use calib_mat_packet::{Packet, PacketError};
use serde::{Deserialize, Serialize};

use crate::{error::CalibrationError, shape::CalibrationShape};

/// A camera matrix or distortion coefficient vector in a JSON-friendly form.
///
/// The record itself is `rows`, `cols`, an element type tag and the values in
/// row-major order; it serializes as
/// `{ "rows": 3, "cols": 3, "type": 6, "data": [...] }`.
///
/// Conversions to a native [`Mat`], a [`MatOfDouble`] and a [`faer::Mat`] are
/// built on first use and cached for the lifetime of the value. The caches
/// use [`OnceCell`], so a `CalibrationMatrix` can move between threads but
/// cannot be shared across them without external locking.
///
/// Construction through [`CalibrationMatrix::new`] and deserialization do not
/// check that `data.len() == rows * cols`; conversions on such a record return
/// `None`. Use [`CalibrationMatrix::try_new`] to reject it up front.
///
/// # Example
///
/// ```rust
/// use calib_mat::{CalibrationMatrix, CalibrationShape};
///
/// let k = CalibrationMatrix::new(3, 3, vec![600.0, 0.0, 320.0, 0.0, 600.0, 240.0, 0.0, 0.0, 1.0]);
/// assert_eq!(k.shape(), Some(CalibrationShape::CameraMatrix));
///
/// let mat = k.as_mat().unwrap();
/// assert_eq!(CalibrationMatrix::from_mat(mat).unwrap(), k);
/// ```
#[derive(Serialize, Deserialize)]
pub struct CalibrationMatrix {
    rows: usize,
    cols: usize,
    #[serde(rename = "type")]
    mat_type: i32,
    data: Vec<f64>,

    #[serde(skip)]
    mat: OnceCell<Mat>,
    #[serde(skip)]
    mat_of_double: OnceCell<MatOfDouble>,
    #[serde(skip)]
    faer_mat: OnceCell<faer::Mat<f64>>,
}

/// Reads the values of a calibration-shaped matrix.
///
/// Returns `None` unless the matrix is a 3x3 or 1x5 `CV_64FC1` matrix. The read
/// goes through a scratch buffer sized in bytes rather than elements, and the
/// result is cut back to exactly 9 or 5 values.
pub fn extract_data<A: MatAllocator>(mat: &Mat<A>) -> Option<Vec<f64>> {
    let shape = CalibrationShape::classify(mat)?;

    let mut data = vec![0.0f64; mat.total() * mat.elem_size()];
    if let Err(err) = mat.get(0, 0, &mut data) {
        log::warn!("failed to read {shape:?} values: {err}");
        return None;
    }

    data.truncate(shape.num_values());
    Some(data)
}

impl CalibrationMatrix {
    /// Creates a `CV_64FC1` record.
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        Self::with_type(rows, cols, MatType::CV_64FC1.code(), data)
    }

    /// Creates a record with an explicit element type tag, without validation.
    pub fn with_type(rows: usize, cols: usize, mat_type: i32, data: Vec<f64>) -> Self {
        Self {
            rows,
            cols,
            mat_type,
            data,
            mat: OnceCell::new(),
            mat_of_double: OnceCell::new(),
            faer_mat: OnceCell::new(),
        }
    }

    /// Creates a record, checking the data length and the element type tag.
    ///
    /// # Errors
    ///
    /// [`CalibrationError::DataLength`] if `data.len() != rows * cols`, and
    /// [`CalibrationError::Mat`] if `mat_type` is not a valid tag.
    pub fn try_new(
        rows: usize,
        cols: usize,
        mat_type: i32,
        data: Vec<f64>,
    ) -> Result<Self, CalibrationError> {
        MatType::from_code(mat_type)?;
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(CalibrationError::DataLength {
                rows,
                cols,
                actual: data.len(),
            });
        }
        Ok(Self::with_type(rows, cols, mat_type, data))
    }

    /// Builds a record from a calibration-shaped native matrix.
    ///
    /// Returns `None` for any other shape or element type.
    pub fn from_mat<A: MatAllocator>(mat: &Mat<A>) -> Option<Self> {
        let data = extract_data(mat)?;
        Some(Self::new(mat.rows(), mat.cols(), data))
    }

    /// Reads `rows * cols` values written by [`CalibrationMatrix::populate_packet`].
    ///
    /// The shape is not part of the packet and must be known by the caller.
    pub fn from_packet(
        packet: &mut Packet,
        rows: usize,
        cols: usize,
    ) -> Result<Self, CalibrationError> {
        let len = rows
            .checked_mul(cols)
            .ok_or(CalibrationError::DataLength {
                rows,
                cols,
                actual: packet.remaining() / std::mem::size_of::<f64>(),
            })?;
        let data = packet.decode_f64s(len)?;
        Ok(Self::new(rows, cols, data))
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Raw element type tag.
    pub fn mat_type(&self) -> i32 {
        self.mat_type
    }

    /// Values in row-major order.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Which calibration shape this record has, if any.
    pub fn shape(&self) -> Option<CalibrationShape> {
        CalibrationShape::from_parts(self.mat_type, self.rows, self.cols)
    }

    fn has_consistent_len(&self) -> bool {
        let consistent = self.rows.checked_mul(self.cols) == Some(self.data.len());
        if !consistent {
            log::warn!(
                "{}x{} calibration matrix holds {} values",
                self.rows,
                self.cols,
                self.data.len()
            );
        }
        consistent
    }

    /// The record as a native `CV_64FC1` matrix, built once and cached.
    ///
    /// Returns `None` if the element type is not `CV_64FC1` or the data length
    /// does not match the shape.
    pub fn as_mat(&self) -> Option<&Mat> {
        if let Some(mat) = self.mat.get() {
            return Some(mat);
        }
        if self.mat_type != MatType::CV_64FC1.code() {
            log::debug!("no native matrix for element type {}", self.mat_type);
            return None;
        }
        if !self.has_consistent_len() {
            return None;
        }

        let mat = match Mat::from_slice(self.rows, self.cols, &self.data) {
            Ok(mat) => mat,
            Err(err) => {
                log::warn!("failed to build native matrix: {err}");
                return None;
            }
        };
        log::debug!("materialized {mat}");
        Some(self.mat.get_or_init(|| mat))
    }

    /// The native matrix converted to [`MatOfDouble`], built once and cached.
    pub fn as_mat_of_double(&self) -> Option<&MatOfDouble> {
        if let Some(mat) = self.mat_of_double.get() {
            return Some(mat);
        }

        let mat = match MatOfDouble::from_mat(self.as_mat()?) {
            Ok(mat) => mat,
            Err(err) => {
                log::warn!("failed to convert native matrix: {err}");
                return None;
            }
        };
        Some(self.mat_of_double.get_or_init(|| mat))
    }

    /// The record as a [`faer::Mat`], filled row-major, built once and cached.
    ///
    /// Returns `None` if the data length does not match the shape.
    pub fn as_faer_mat(&self) -> Option<&faer::Mat<f64>> {
        if let Some(mat) = self.faer_mat.get() {
            return Some(mat);
        }
        if !self.has_consistent_len() {
            return None;
        }

        let (cols, data) = (self.cols, &self.data);
        let mat = faer::Mat::<f64>::from_fn(self.rows, self.cols, |i, j| data[i * cols + j]);
        Some(self.faer_mat.get_or_init(|| mat))
    }

    /// The record as a fixed-size row-major array.
    ///
    /// Returns `None` unless the record is exactly `R x C` with `R * C` values.
    ///
    /// ```rust
    /// use calib_mat::CalibrationMatrix;
    ///
    /// let d = CalibrationMatrix::new(1, 5, vec![0.1, -0.05, 0.0, 0.0, 0.01]);
    /// let [coeffs] = d.as_array::<1, 5>().unwrap();
    /// assert_eq!(coeffs[1], -0.05);
    /// assert!(d.as_array::<3, 3>().is_none());
    /// ```
    pub fn as_array<const R: usize, const C: usize>(&self) -> Option<[[f64; C]; R]> {
        if self.rows != R || self.cols != C || self.data.len() != R * C {
            return None;
        }
        Some(std::array::from_fn(|i| {
            std::array::from_fn(|j| self.data[i * C + j])
        }))
    }

    /// Appends the values, and nothing else, to `packet`.
    ///
    /// # Returns
    ///
    /// The same packet, for chaining.
    pub fn populate_packet<'p>(&self, packet: &'p mut Packet) -> Result<&'p mut Packet, PacketError> {
        packet.encode_f64s(&self.data)?;
        Ok(packet)
    }
}

impl Releasable for CalibrationMatrix {
    /// Frees the native matrices if they were ever built.
    ///
    /// The caches are emptied, so a later conversion builds a fresh matrix
    /// instead of handing out released storage.
    fn release(&mut self) {
        if let Some(mut mat) = self.mat.take() {
            log::debug!("releasing {mat}");
            mat.release();
        }
        if let Some(mut mat) = self.mat_of_double.take() {
            mat.release();
        }
    }
}

impl Clone for CalibrationMatrix {
    /// Copies the record; the clone starts with empty caches.
    fn clone(&self) -> Self {
        Self::with_type(self.rows, self.cols, self.mat_type, self.data.clone())
    }
}

impl PartialEq for CalibrationMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self.mat_type == other.mat_type
            && self.data == other.data
    }
}

struct CachedFaer<'a>(Option<&'a faer::Mat<f64>>);

impl std::fmt::Display for CachedFaer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(mat) => write!(f, "Some(faer::Mat [ {}x{} ])", mat.nrows(), mat.ncols()),
            None => write!(f, "None"),
        }
    }
}

struct Cached<'a, T>(Option<&'a T>);

impl<T: std::fmt::Display> std::fmt::Display for Cached<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(value) => write!(f, "Some({value})"),
            None => write!(f, "None"),
        }
    }
}

impl std::fmt::Display for CalibrationMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "CalibrationMatrix [rows={}, cols={}, type={}, data={:?}, mat={}, mat_of_double={}, faer_mat={}]",
            self.rows,
            self.cols,
            self.mat_type,
            self.data,
            Cached(self.mat.get()),
            Cached(self.mat_of_double.get()),
            CachedFaer(self.faer_mat.get()),
        )
    }
}

impl std::fmt::Debug for CalibrationMatrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalibrationMatrix")
            .field("rows", &self.rows)
            .field("cols", &self.cols)
            .field("mat_type", &self.mat_type)
            .field("data", &self.data)
            .field("mat", &self.mat.get())
            .field("mat_of_double", &self.mat_of_double.get())
            .field("faer_mat", &self.faer_mat.get().map(|m| (m.nrows(), m.ncols())))
            .finish()
    }
}
