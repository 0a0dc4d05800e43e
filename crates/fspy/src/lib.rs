#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

#[doc(inline)]
pub use fspy_camera as camera;

#[doc(inline)]
pub use fspy_geom as geom;

#[doc(inline)]
pub use fspy_io as io;
