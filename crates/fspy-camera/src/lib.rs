#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for the camera module.
pub mod error;

/// Import of a calibrated camera into a host scene.
pub mod import;

/// Camera intrinsics derived from the field of view.
pub mod intrinsics;

/// Host scene-graph adapter interface.
pub mod scene;

/// Typed view over the fSpy JSON state.
pub mod state;

/// Human readable camera summary.
pub mod summary;

/// Camera extrinsics derived from the camera transform.
pub mod transform;

pub use error::CameraError;
pub use import::{apply_up_axis, import_camera, relative_to_project, ImportOptions, ImportedCamera};
pub use intrinsics::{derive_intrinsics, CameraIntrinsics};
pub use scene::{FilmFit, SceneGraph, UpAxis};
pub use state::{CalibrationSettingsBase, CameraParameters, CameraState, PrincipalPoint};
pub use summary::CameraSummary;
pub use transform::{derive_transform, CameraTransform};

use std::path::Path;

use fspy_io::FspyContainer;

/// Read an fSpy file and view its state.
///
/// # Arguments
///
/// * `path` - The path to the `.fspy` file.
///
/// # Returns
///
/// The container, holding the image bytes, and the typed camera state.
pub fn load_camera(path: impl AsRef<Path>) -> Result<(FspyContainer, CameraState), CameraError> {
    let container = fspy_io::read_fspy_file(path)?;
    let state = CameraState::from_container(&container)?;
    Ok((container, state))
}
