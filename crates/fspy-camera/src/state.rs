use fspy_io::FspyContainer;
use serde::{Deserialize, Serialize};

use crate::error::CameraError;

/// Reference distance unit reported when the state does not name one.
pub const DEFAULT_REFERENCE_DISTANCE_UNIT: &str = "Meters";

/// The subset of the fSpy state this crate consumes. Other fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraState {
    /// The solved camera, absent when fSpy could not calibrate.
    #[serde(default)]
    pub camera_parameters: Option<CameraParameters>,
    /// The calibration settings shared by all solver modes.
    #[serde(default)]
    pub calibration_settings_base: Option<CalibrationSettingsBase>,
}

impl CameraState {
    /// View a parsed JSON state.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, CameraError> {
        CameraState::deserialize(value).map_err(CameraError::InvalidState)
    }

    /// View the state of a parsed container.
    pub fn from_container(container: &FspyContainer) -> Result<Self, CameraError> {
        Self::from_value(container.state())
    }

    /// The camera parameters, or [`CameraError::MissingCameraParameters`].
    pub fn camera_parameters(&self) -> Result<&CameraParameters, CameraError> {
        self.camera_parameters
            .as_ref()
            .ok_or(CameraError::MissingCameraParameters)
    }

    /// The unit of the reference distance, for display only.
    pub fn reference_distance_unit(&self) -> &str {
        self.calibration_settings_base
            .as_ref()
            .and_then(|base| base.reference_distance_unit.as_deref())
            .unwrap_or(DEFAULT_REFERENCE_DISTANCE_UNIT)
    }
}

/// The `cameraParameters` section of the state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraParameters {
    /// Camera to world transform.
    #[serde(default)]
    pub camera_transform: Option<CameraTransformRows>,
    /// Image width in pixels.
    #[serde(default)]
    pub image_width: Option<f64>,
    /// Image height in pixels.
    #[serde(default)]
    pub image_height: Option<f64>,
    /// Horizontal field of view in radians.
    #[serde(default)]
    pub horizontal_field_of_view: Option<f64>,
    /// Principal point, relative to the image center.
    #[serde(default)]
    pub principal_point: Option<PrincipalPoint>,
}

/// A 4x4 transform stored as rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CameraTransformRows {
    /// The matrix rows, absent when fSpy wrote an empty transform.
    #[serde(default)]
    pub rows: Option<[[f64; 4]; 4]>,
}

/// The principal point, written either as `[x, y]` or as `{"x": .., "y": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrincipalPoint {
    /// Ordered pair form.
    Pair([f64; 2]),
    /// Mapping form. Missing members read as zero.
    Point {
        /// Horizontal offset.
        #[serde(default)]
        x: f64,
        /// Vertical offset.
        #[serde(default)]
        y: f64,
    },
}

impl PrincipalPoint {
    /// The offset as `[x, y]`, whatever the stored form.
    pub fn xy(&self) -> [f64; 2] {
        match *self {
            PrincipalPoint::Pair(xy) => xy,
            PrincipalPoint::Point { x, y } => [x, y],
        }
    }
}

impl Default for PrincipalPoint {
    fn default() -> Self {
        PrincipalPoint::Pair([0.0, 0.0])
    }
}

/// The `calibrationSettingsBase` section of the state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationSettingsBase {
    /// Unit of the reference distance, e.g. `"Meters"`.
    #[serde(default)]
    pub reference_distance_unit: Option<String>,
}
