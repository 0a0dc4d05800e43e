#![deny(missing_docs)]
//! Reading fSpy project files.
//!
//! An fSpy project is a small binary container: a 16 byte little-endian header followed by a
//! NUL padded JSON state block and the raw bytes of the image the calibration was made on.
//!
//! ```text
//! offset  size       field
//! 0       4          magic "fspy"
//! 4       4          version
//! 8       4          state size
//! 12      4          image size
//! 16      state size state (UTF-8 JSON)
//! ...     image size image
//! ```

/// fSpy container reader.
pub mod container;

/// Error types for the io module.
pub mod error;

/// Writing the embedded image to disk.
pub mod image;

pub use container::{read_fspy, read_fspy_file, FspyContainer, FSPY_HEADER_SIZE, FSPY_MAGIC};
pub use error::FspyError;
pub use image::{default_image_path, save_image};
