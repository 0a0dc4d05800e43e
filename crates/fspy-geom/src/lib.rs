#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Row-major 3x3 matrix type.
mod mat3;

/// Euler angle <-> rotation matrix conversions.
pub mod rotation;

pub use mat3::Mat3;
