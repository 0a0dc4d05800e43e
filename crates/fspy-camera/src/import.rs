use std::path::{Component, Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    error::CameraError,
    intrinsics::{derive_intrinsics, field_of_view},
    scene::{FilmFit, SceneGraph, UpAxis},
    state::CameraState,
    transform::derive_transform,
};

/// Configuration of [`import_camera`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportOptions {
    /// Name of the created camera node.
    pub camera_name: String,
    /// Name of the group holding the camera.
    pub group_name: String,
    /// Up axis used to orient the group. `None` leaves the group unrotated.
    pub up_axis: Option<UpAxis>,
    /// Extra group rotation in degrees, added to the up axis turn.
    pub axis_offsets_deg: [f64; 3],
    /// Camera attributes locked once the camera is set up.
    pub locked_attributes: Vec<String>,
    /// Film fit of the camera.
    pub film_fit: FilmFit,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            camera_name: "fspy_camera".to_string(),
            group_name: "fspy_camera_group".to_string(),
            up_axis: None,
            axis_offsets_deg: [0.0; 3],
            locked_attributes: vec!["translateX".to_string()],
            film_fit: FilmFit::Horizontal,
        }
    }
}

/// Handles of the nodes created by [`import_camera`].
#[derive(Debug, Clone)]
pub struct ImportedCamera<H> {
    /// The group holding the camera.
    pub group: H,
    /// The camera node.
    pub camera: H,
    /// The image plane, when an image was given.
    pub image_plane: Option<H>,
}

/// Create a camera in the host scene matching an fSpy calibration.
///
/// # Arguments
///
/// * `scene` - The host scene.
/// * `state` - The parsed fSpy state.
/// * `image_path` - The extracted image to show on an image plane, if any.
/// * `options` - Node names, up axis and locking options.
///
/// # Returns
///
/// The handles of the created nodes. Fails when the state has no camera parameters, in which
/// case nothing is created, or when the host rejects an operation.
pub fn import_camera<S: SceneGraph>(
    scene: &mut S,
    state: &CameraState,
    image_path: Option<&Path>,
    options: &ImportOptions,
) -> Result<ImportedCamera<S::Handle>, CameraError> {
    // derive everything first so that a bad state leaves the scene untouched
    let params = state.camera_parameters()?;
    let transform = derive_transform(state)?;
    let intrinsics = derive_intrinsics(params);

    let group = scene
        .create_group(&options.group_name)
        .map_err(CameraError::scene)?;
    let camera = scene
        .create_camera_node(&options.camera_name)
        .map_err(CameraError::scene)?;
    scene.parent(&camera, &group).map_err(CameraError::scene)?;

    let [tx, ty, tz] = transform.position;
    scene
        .set_translation(&camera, tx, ty, tz)
        .map_err(CameraError::scene)?;
    info!("Set position: {:?}", transform.position);

    let [rx, ry, rz] = transform.rotation_degrees();
    scene
        .set_rotation_degrees(&camera, rx, ry, rz)
        .map_err(CameraError::scene)?;
    info!("Set rotation: {:?}", [rx, ry, rz]);

    scene
        .set_film_back(
            &camera,
            intrinsics.horizontal_aperture_inch,
            intrinsics.vertical_aperture_inch,
        )
        .map_err(CameraError::scene)?;
    info!(
        "Set film back (in inches): {}x{}",
        intrinsics.horizontal_aperture_inch, intrinsics.vertical_aperture_inch
    );

    scene
        .set_film_offset(
            &camera,
            intrinsics.horizontal_offset_inch,
            intrinsics.vertical_offset_inch,
        )
        .map_err(CameraError::scene)?;
    info!(
        "Set film offset (in inches): {}x{}",
        intrinsics.horizontal_offset_inch, intrinsics.vertical_offset_inch
    );

    scene
        .set_film_fit(&camera, options.film_fit)
        .map_err(CameraError::scene)?;

    for attribute in options.locked_attributes.iter() {
        scene
            .lock_attribute(&camera, attribute)
            .map_err(CameraError::scene)?;
        debug!("Locked {attribute}");
    }

    // without a usable field of view the host keeps its own default lens
    if field_of_view(params).is_some() {
        scene
            .set_focal_length(&camera, intrinsics.focal_length_mm)
            .map_err(CameraError::scene)?;
        info!(
            "Set focal length based on horizontalFieldOfView: {}",
            intrinsics.focal_length_mm
        );
    }

    let image_plane = match image_path {
        Some(path) => {
            let project_root = scene.query_project_root().map_err(CameraError::scene)?;
            let plane_path = relative_to_project(path, project_root);
            let plane = scene
                .create_image_plane(&camera, &plane_path)
                .map_err(CameraError::scene)?;
            info!("Image plane created with file: {}", plane_path.display());
            Some(plane)
        }
        None => None,
    };

    if let Some(up_axis) = options.up_axis {
        apply_up_axis(scene, &group, up_axis, options.axis_offsets_deg)?;
    }

    Ok(ImportedCamera {
        group,
        camera,
        image_plane,
    })
}

/// Rotate the camera group so that `up_axis` points up.
///
/// # Arguments
///
/// * `scene` - The host scene.
/// * `group` - The group returned by [`import_camera`].
/// * `up_axis` - The scene up axis.
/// * `offsets_deg` - Extra rotation in degrees.
pub fn apply_up_axis<S: SceneGraph>(
    scene: &mut S,
    group: &S::Handle,
    up_axis: UpAxis,
    offsets_deg: [f64; 3],
) -> Result<(), CameraError> {
    let [x, y, z] = up_axis.group_rotation(offsets_deg);
    scene
        .set_rotation_degrees(group, x, y, z)
        .map_err(CameraError::scene)?;
    info!(
        "Set up axis: {up_axis}, offset value: {}",
        UpAxis::QUARTER_TURN_DEG
    );
    Ok(())
}

// Resolve `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    normalized.push(component);
                }
            }
            _ => normalized.push(component),
        }
    }
    normalized
}

/// Express `path` relative to the project root when it lies inside it.
///
/// # Arguments
///
/// * `path` - A file path.
/// * `project_root` - The root directory of the host project.
///
/// # Returns
///
/// The path relative to `project_root`, or the normalized `path` when it is outside.
///
/// Example:
///
/// ```
/// use std::path::Path;
/// use fspy_camera::relative_to_project;
///
/// let rel = relative_to_project("/proj/images/a.jpg", "/proj/");
/// assert_eq!(rel, Path::new("images/a.jpg"));
/// ```
pub fn relative_to_project(path: impl AsRef<Path>, project_root: impl AsRef<Path>) -> PathBuf {
    let path = normalize(path.as_ref());
    let root = normalize(project_root.as_ref());

    match path.strip_prefix(&root) {
        Ok(rel) if !rel.as_os_str().is_empty() => {
            debug!("Converted to relative path: {}", rel.display());
            rel.to_path_buf()
        }
        _ => path,
    }
}
