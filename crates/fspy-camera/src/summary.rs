use std::fmt;

use serde::Serialize;

use crate::{
    error::CameraError,
    intrinsics::{derive_intrinsics, image_size},
    state::CameraState,
    transform::derive_transform,
};

/// What an fSpy calibration says about its camera, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraSummary {
    /// Name of the fSpy file.
    pub file_name: String,
    /// Image width in pixels.
    pub image_width: f64,
    /// Image height in pixels.
    pub image_height: f64,
    /// Horizontal field of view in degrees, when known.
    pub horizontal_fov_deg: Option<f64>,
    /// Camera position.
    pub position: [f64; 3],
    /// Camera rotation as XYZ Euler angles in degrees.
    pub rotation_deg: [f64; 3],
    /// Focal length in millimeters.
    pub focal_length_mm: f64,
    /// Principal point, when stored.
    pub principal_point: Option<[f64; 2]>,
    /// Unit of the reference distance.
    pub unit: String,
}

impl CameraSummary {
    /// Collect the summary of a calibration.
    ///
    /// # Arguments
    ///
    /// * `file_name` - The name to display for the file.
    /// * `state` - The parsed fSpy state.
    pub fn from_state(file_name: &str, state: &CameraState) -> Result<Self, CameraError> {
        let params = state.camera_parameters()?;
        let transform = derive_transform(state)?;
        let intrinsics = derive_intrinsics(params);
        let (image_width, image_height) = image_size(params);

        Ok(Self {
            file_name: file_name.to_string(),
            image_width,
            image_height,
            horizontal_fov_deg: params.horizontal_field_of_view.map(f64::to_degrees),
            position: transform.position,
            rotation_deg: transform.rotation_degrees(),
            focal_length_mm: intrinsics.focal_length_mm,
            principal_point: params.principal_point.map(|p| p.xy()),
            unit: state.reference_distance_unit().to_string(),
        })
    }

    /// Image width over image height.
    pub fn aspect_ratio(&self) -> f64 {
        self.image_width / self.image_height
    }
}

// Print -0.0 as 0.0.
fn display_value(value: f64) -> f64 {
    value + 0.0
}

impl fmt::Display for CameraSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File: {}", self.file_name)?;
        writeln!(
            f,
            "Image Size: {}x{}",
            self.image_width as i64, self.image_height as i64
        )?;
        writeln!(f, "Aspect Ratio: {:.3}", self.aspect_ratio())?;
        if let Some(fov) = self.horizontal_fov_deg {
            writeln!(f, "Horizontal FOV: {fov:.2}°")?;
        }

        writeln!(f, "Camera Position:")?;
        for (axis, value) in ["X", "Y", "Z"].iter().zip(self.position) {
            writeln!(f, "  {axis}: {:.3}", display_value(value))?;
        }
        writeln!(f, "Camera Rotation (degrees):")?;
        for (axis, value) in ["X", "Y", "Z"].iter().zip(self.rotation_deg) {
            writeln!(f, "  {axis}: {:.3}", display_value(value))?;
        }

        writeln!(f, "Focal Length: {:.2}mm", self.focal_length_mm)?;
        if let Some([x, y]) = self.principal_point {
            writeln!(f, "Principal Point:")?;
            writeln!(f, "  X: {:.3}", display_value(x))?;
            writeln!(f, "  Y: {:.3}", display_value(y))?;
        }
        write!(f, "Unit: {}", self.unit)
    }
}
