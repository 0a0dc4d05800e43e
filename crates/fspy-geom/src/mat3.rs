use glam::DMat3;

/// A 3x3 double precision matrix addressed in row-major order.
///
/// The storage is a `glam::DMat3` (column-major), but every constructor and accessor of this
/// type speaks rows: `get(row, col)`, `from_rows` and `to_rows`. This matches the layout of the
/// `cameraTransform.rows` arrays found in fSpy files.
///
/// Example:
///
/// ```
/// use fspy_geom::Mat3;
///
/// let m = Mat3::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
/// assert_eq!(m.get(0, 2), 3.0);
/// assert_eq!(m.dot(&Mat3::IDENTITY), m);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "[[f64; 3]; 3]", into = "[[f64; 3]; 3]")]
#[repr(transparent)]
pub struct Mat3(pub DMat3);

impl Mat3 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self(DMat3::IDENTITY);

    /// Create a matrix from three rows.
    #[inline]
    pub fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        // glam reads nested arrays as columns, so transpose to get rows
        Self(DMat3::from_cols_array_2d(&rows).transpose())
    }

    /// Return the matrix as three rows.
    #[inline]
    pub fn to_rows(&self) -> [[f64; 3]; 3] {
        self.0.transpose().to_cols_array_2d()
    }

    /// Element at `row`, `col`.
    ///
    /// PRECONDITION: `row < 3` and `col < 3`.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.0.col(col)[row]
    }

    /// Matrix product `self · other`.
    #[inline]
    pub fn dot(&self, other: &Self) -> Self {
        Self(self.0 * other.0)
    }

    /// The transposed matrix.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self(self.0.transpose())
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl From<[[f64; 3]; 3]> for Mat3 {
    #[inline]
    fn from(rows: [[f64; 3]; 3]) -> Self {
        Self::from_rows(rows)
    }
}

impl From<Mat3> for [[f64; 3]; 3] {
    #[inline]
    fn from(m: Mat3) -> Self {
        m.to_rows()
    }
}

impl From<DMat3> for Mat3 {
    #[inline]
    fn from(m: DMat3) -> Self {
        Self(m)
    }
}

impl std::ops::Mul for Mat3 {
    type Output = Mat3;

    #[inline]
    fn mul(self, rhs: Mat3) -> Self::Output {
        self.dot(&rhs)
    }
}
