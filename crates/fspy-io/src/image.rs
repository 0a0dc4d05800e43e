use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use log::info;

use crate::{container::FspyContainer, error::FspyError};

/// Write the embedded image of a container to disk.
///
/// The bytes are written verbatim: the image keeps whatever encoding fSpy stored, whatever
/// extension the destination has.
///
/// # Arguments
///
/// * `container` - The parsed fSpy container.
/// * `path` - The destination file. Its parent directory must exist.
///
/// # Returns
///
/// The destination path. When the write fails no partial file is left behind.
pub fn save_image(container: &FspyContainer, path: impl AsRef<Path>) -> Result<PathBuf, FspyError> {
    let path = path.as_ref();
    let mut file = File::create(path)?;

    let written = file.write_all(container.image()).and_then(|_| file.flush());
    if let Err(err) = written {
        drop(file);
        // the write error is the one reported
        let _ = fs::remove_file(path);
        return Err(err.into());
    }

    info!("Image saved to: {}", path.display());
    Ok(path.to_path_buf())
}

/// The default location of the extracted image of an fSpy file.
///
/// # Arguments
///
/// * `fspy_path` - The path to the `.fspy` file.
/// * `project_root` - The root directory of the host project.
/// * `extension` - The image file extension, without the dot.
///
/// # Returns
///
/// `<project_root>/images/<fspy file stem>.<extension>`.
///
/// Example:
///
/// ```
/// use std::path::Path;
/// use fspy_io::default_image_path;
///
/// let path = default_image_path("/shots/street.fspy", "/projects/city", "png");
/// assert_eq!(path, Path::new("/projects/city/images/street.png"));
/// ```
pub fn default_image_path(
    fspy_path: impl AsRef<Path>,
    project_root: impl AsRef<Path>,
    extension: &str,
) -> PathBuf {
    let stem = fspy_path
        .as_ref()
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "fspy".to_string());

    project_root
        .as_ref()
        .join("images")
        .join(format!("{stem}.{extension}"))
}
