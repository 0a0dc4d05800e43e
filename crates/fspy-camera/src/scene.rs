use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::CameraError;

/// The operations a host application must provide to receive an fSpy camera.
///
/// Implementations wrap the object model of a specific content-creation package. Nodes are
/// referred to by an opaque handle chosen by the host.
pub trait SceneGraph {
    /// Reference to a node of the host scene.
    type Handle: Clone + std::fmt::Debug;

    /// Failure reported by the host.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Create an empty transform group.
    fn create_group(&mut self, name: &str) -> Result<Self::Handle, Self::Error>;

    /// Create a camera node.
    fn create_camera_node(&mut self, name: &str) -> Result<Self::Handle, Self::Error>;

    /// Make `child` a child of `parent`.
    fn parent(&mut self, child: &Self::Handle, parent: &Self::Handle) -> Result<(), Self::Error>;

    /// Set the local translation of a node.
    fn set_translation(
        &mut self,
        node: &Self::Handle,
        x: f64,
        y: f64,
        z: f64,
    ) -> Result<(), Self::Error>;

    /// Set the local XYZ rotation of a node, in degrees.
    fn set_rotation_degrees(
        &mut self,
        node: &Self::Handle,
        x: f64,
        y: f64,
        z: f64,
    ) -> Result<(), Self::Error>;

    /// Set the film back of a camera, in inches.
    fn set_film_back(
        &mut self,
        camera: &Self::Handle,
        horizontal_inch: f64,
        vertical_inch: f64,
    ) -> Result<(), Self::Error>;

    /// Set the film offset of a camera, in inches.
    fn set_film_offset(
        &mut self,
        camera: &Self::Handle,
        horizontal_inch: f64,
        vertical_inch: f64,
    ) -> Result<(), Self::Error>;

    /// Set how the film back is fitted to the render resolution.
    fn set_film_fit(&mut self, camera: &Self::Handle, fit: FilmFit) -> Result<(), Self::Error>;

    /// Set the focal length of a camera, in millimeters.
    fn set_focal_length(&mut self, camera: &Self::Handle, mm: f64) -> Result<(), Self::Error>;

    /// Prevent further edits of a node attribute.
    fn lock_attribute(&mut self, node: &Self::Handle, attribute: &str) -> Result<(), Self::Error>;

    /// Attach an image plane showing `image_path` to a camera.
    fn create_image_plane(
        &mut self,
        camera: &Self::Handle,
        image_path: &Path,
    ) -> Result<Self::Handle, Self::Error>;

    /// The root directory of the current host project.
    fn query_project_root(&self) -> Result<PathBuf, Self::Error>;
}

/// How a camera film back is fitted to the render resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilmFit {
    /// Fit the whole film back inside the resolution gate.
    Fill,
    /// Match the horizontal extents.
    #[default]
    Horizontal,
    /// Match the vertical extents.
    Vertical,
    /// Cover the resolution gate with the film back.
    Overscan,
}

/// Scene axis pointing up, used to orient the group holding the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpAxis {
    /// +X
    #[serde(rename = "X")]
    X,
    /// +Y
    #[serde(rename = "Y")]
    Y,
    /// +Z
    #[serde(rename = "Z")]
    Z,
    /// -X
    #[serde(rename = "-X")]
    NegX,
    /// -Y
    #[serde(rename = "-Y")]
    NegY,
    /// -Z
    #[serde(rename = "-Z")]
    NegZ,
}

impl UpAxis {
    /// Quarter turn applied around the up axis.
    pub const QUARTER_TURN_DEG: f64 = 90.0;

    /// Rotation of the camera group, in degrees, for this up axis.
    ///
    /// The user offsets are kept and a quarter turn is added around the chosen axis, negative
    /// for the `-` axes.
    ///
    /// Example:
    ///
    /// ```
    /// use fspy_camera::UpAxis;
    ///
    /// assert_eq!(UpAxis::NegY.group_rotation([10.0, 0.0, 0.0]), [10.0, -90.0, 0.0]);
    /// ```
    pub fn group_rotation(&self, offsets_deg: [f64; 3]) -> [f64; 3] {
        let (axis, sign) = match self {
            UpAxis::X => (0, 1.0),
            UpAxis::Y => (1, 1.0),
            UpAxis::Z => (2, 1.0),
            UpAxis::NegX => (0, -1.0),
            UpAxis::NegY => (1, -1.0),
            UpAxis::NegZ => (2, -1.0),
        };

        let mut rotation = offsets_deg;
        rotation[axis] += sign * Self::QUARTER_TURN_DEG;
        rotation
    }

    /// The name of the axis, e.g. `"-Z"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            UpAxis::X => "X",
            UpAxis::Y => "Y",
            UpAxis::Z => "Z",
            UpAxis::NegX => "-X",
            UpAxis::NegY => "-Y",
            UpAxis::NegZ => "-Z",
        }
    }
}

impl std::fmt::Display for UpAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UpAxis {
    type Err = CameraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "X" => Ok(UpAxis::X),
            "Y" => Ok(UpAxis::Y),
            "Z" => Ok(UpAxis::Z),
            "-X" => Ok(UpAxis::NegX),
            "-Y" => Ok(UpAxis::NegY),
            "-Z" => Ok(UpAxis::NegZ),
            _ => Err(CameraError::UnknownUpAxis(s.to_string())),
        }
    }
}
