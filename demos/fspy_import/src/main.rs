use argh::FromArgs;
use std::{
    convert::Infallible,
    path::{Path, PathBuf},
};

use fspy::camera::{self, CameraSummary, FilmFit, ImportOptions, SceneGraph, UpAxis};

#[derive(FromArgs)]
/// Read an fSpy project and replay the camera import against a logging scene
struct Args {
    /// path to the fSpy file
    #[argh(option)]
    fspy_path: PathBuf,

    /// root directory of the host project
    #[argh(option, default = "PathBuf::from(\".\")")]
    project: PathBuf,

    /// write the embedded image to <project>/images/<name>.<image-ext>
    #[argh(switch)]
    extract_image: bool,

    /// extension of the extracted image
    #[argh(option, default = "String::from(\"jpg\")")]
    image_ext: String,

    /// scene up axis: X, Y, Z, -X, -Y or -Z
    #[argh(option)]
    up_axis: Option<String>,

    /// print the camera summary as json
    #[argh(switch)]
    json: bool,

    /// log every step, including trace messages
    #[argh(switch, short = 'v')]
    verbose: bool,
}

/// A scene that only logs what a host would be asked to do.
struct LogScene {
    project_root: PathBuf,
}

impl SceneGraph for LogScene {
    type Handle = String;
    type Error = Infallible;

    fn create_group(&mut self, name: &str) -> Result<String, Infallible> {
        log::info!("group {name}");
        Ok(name.to_string())
    }

    fn create_camera_node(&mut self, name: &str) -> Result<String, Infallible> {
        log::info!("camera {name}");
        Ok(name.to_string())
    }

    fn parent(&mut self, child: &String, parent: &String) -> Result<(), Infallible> {
        log::info!("parent {child} -> {parent}");
        Ok(())
    }

    fn set_translation(
        &mut self,
        node: &String,
        x: f64,
        y: f64,
        z: f64,
    ) -> Result<(), Infallible> {
        log::info!("{node}.translate = ({x:.4}, {y:.4}, {z:.4})");
        Ok(())
    }

    fn set_rotation_degrees(
        &mut self,
        node: &String,
        x: f64,
        y: f64,
        z: f64,
    ) -> Result<(), Infallible> {
        log::info!("{node}.rotate = ({x:.4}, {y:.4}, {z:.4})");
        Ok(())
    }

    fn set_film_back(&mut self, camera: &String, h: f64, v: f64) -> Result<(), Infallible> {
        log::info!("{camera}.filmAperture = ({h:.4}in, {v:.4}in)");
        Ok(())
    }

    fn set_film_offset(&mut self, camera: &String, h: f64, v: f64) -> Result<(), Infallible> {
        log::info!("{camera}.filmOffset = ({h:.4}in, {v:.4}in)");
        Ok(())
    }

    fn set_film_fit(&mut self, camera: &String, fit: FilmFit) -> Result<(), Infallible> {
        log::info!("{camera}.filmFit = {fit:?}");
        Ok(())
    }

    fn set_focal_length(&mut self, camera: &String, mm: f64) -> Result<(), Infallible> {
        log::info!("{camera}.focalLength = {mm:.3}mm");
        Ok(())
    }

    fn lock_attribute(&mut self, node: &String, attribute: &str) -> Result<(), Infallible> {
        log::info!("lock {node}.{attribute}");
        Ok(())
    }

    fn create_image_plane(&mut self, camera: &String, path: &Path) -> Result<String, Infallible> {
        log::info!("image plane on {camera}: {}", path.display());
        Ok(format!("{camera}_imagePlane"))
    }

    fn query_project_root(&self) -> Result<PathBuf, Infallible> {
        Ok(self.project_root.clone())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = argh::from_env();

    let default_level = if args.verbose { "trace" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let (container, state) = camera::load_camera(&args.fspy_path)?;
    log::info!("Successfully parsed fSpy file: {}", args.fspy_path.display());

    let file_name = args
        .fspy_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let summary = CameraSummary::from_state(&file_name, &state)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{summary}");
    }

    // keep going without an image plane if the image cannot be written
    let image_path = if args.extract_image && container.has_image() {
        let dst = fspy::io::default_image_path(&args.fspy_path, &args.project, &args.image_ext);
        match fspy::io::save_image(&container, &dst) {
            Ok(path) => Some(path),
            Err(e) => {
                log::warn!("Failed to save image: {e}");
                None
            }
        }
    } else {
        None
    };

    let options = ImportOptions {
        up_axis: args.up_axis.as_deref().map(str::parse::<UpAxis>).transpose()?,
        ..Default::default()
    };

    let mut scene = LogScene {
        project_root: args.project.clone(),
    };
    let imported = camera::import_camera(&mut scene, &state, image_path.as_deref(), &options)?;
    log::info!("Camera created: {}", imported.camera);

    Ok(())
}
