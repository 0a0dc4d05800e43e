use fspy_geom::{rotation::matrix_to_euler, Mat3};
use log::trace;
use serde::Serialize;

use crate::{error::CameraError, state::CameraState};

/// The transform assumed when the state carries no camera matrix.
pub const IDENTITY_ROWS: [[f64; 4]; 4] = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 1.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// Camera position and orientation in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraTransform {
    /// Camera center.
    pub position: [f64; 3],
    /// Camera to world rotation, taken as stored (not re-orthonormalized).
    pub rotation: Mat3,
}

impl CameraTransform {
    /// Split a row-major 4x4 camera to world matrix into position and rotation.
    pub fn from_rows(rows: &[[f64; 4]; 4]) -> Self {
        let position = [rows[0][3], rows[1][3], rows[2][3]];
        let rotation = Mat3::from_rows(std::array::from_fn(|i| {
            [rows[i][0], rows[i][1], rows[i][2]]
        }));
        Self { position, rotation }
    }

    /// The rotation as XYZ Euler angles in radians.
    pub fn euler_angles(&self) -> [f64; 3] {
        matrix_to_euler(&self.rotation)
    }

    /// The rotation as XYZ Euler angles in degrees.
    pub fn rotation_degrees(&self) -> [f64; 3] {
        self.euler_angles().map(f64::to_degrees)
    }
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self::from_rows(&IDENTITY_ROWS)
    }
}

/// Extract the camera transform from a calibration state.
///
/// # Arguments
///
/// * `state` - The parsed fSpy state.
///
/// # Returns
///
/// The camera position (last column of the first three rows) and the upper-left 3x3 rotation.
/// A state without `cameraTransform.rows` yields the identity transform. A state without
/// `cameraParameters` is an error.
pub fn derive_transform(state: &CameraState) -> Result<CameraTransform, CameraError> {
    let params = state.camera_parameters()?;

    let rows = params
        .camera_transform
        .as_ref()
        .and_then(|t| t.rows)
        .unwrap_or(IDENTITY_ROWS);
    trace!("Camera transform rows: {rows:?}");

    let transform = CameraTransform::from_rows(&rows);
    trace!(
        "Position: {:?}, Rotation matrix: {:?}",
        transform.position,
        transform.rotation.to_rows()
    );
    Ok(transform)
}
