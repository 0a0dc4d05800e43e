use log::trace;
use serde::Serialize;

use crate::state::CameraParameters;

/// Horizontal sensor aperture, in millimeters, of the 35mm full frame standard.
pub const SENSOR_WIDTH_MM: f64 = 36.0;

/// Focal length reported when the field of view is unknown.
pub const DEFAULT_FOCAL_LENGTH_MM: f64 = 35.0;

/// Image width assumed when the state does not provide one.
pub const DEFAULT_IMAGE_WIDTH: f64 = 1920.0;

/// Image height assumed when the state does not provide one.
pub const DEFAULT_IMAGE_HEIGHT: f64 = 1080.0;

/// Millimeters per inch.
pub const MM_PER_INCH: f64 = 25.4;

/// Lens and film back of a camera, in the units host packages expect.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraIntrinsics {
    /// Focal length in millimeters.
    pub focal_length_mm: f64,
    /// Film back width in inches.
    pub horizontal_aperture_inch: f64,
    /// Film back height in inches.
    pub vertical_aperture_inch: f64,
    /// Horizontal film offset in inches.
    pub horizontal_offset_inch: f64,
    /// Vertical film offset in inches.
    pub vertical_offset_inch: f64,
}

// A dimension that is missing, zero, negative or not finite falls back to the default.
fn dimension_or(value: Option<f64>, default: f64) -> f64 {
    value.filter(|v| v.is_finite() && *v > 0.0).unwrap_or(default)
}

/// The image size of the calibration, with the 1920x1080 default applied per dimension.
pub fn image_size(params: &CameraParameters) -> (f64, f64) {
    (
        dimension_or(params.image_width, DEFAULT_IMAGE_WIDTH),
        dimension_or(params.image_height, DEFAULT_IMAGE_HEIGHT),
    )
}

/// The calibrated horizontal field of view, if it describes a real lens.
///
/// Angles that are not finite or fall outside `(0, π)` are treated as missing.
pub fn field_of_view(params: &CameraParameters) -> Option<f64> {
    params
        .horizontal_field_of_view
        .filter(|fov| fov.is_finite() && *fov > 0.0 && *fov < std::f64::consts::PI)
}

/// Focal length of a lens covering `fov` radians over the full frame sensor width.
///
/// Example:
///
/// ```
/// use fspy_camera::intrinsics::focal_length_from_fov;
///
/// let fov = 2.0 * (18.0f64 / 35.0).atan();
/// assert!((focal_length_from_fov(fov) - 35.0).abs() < 1e-9);
/// ```
pub fn focal_length_from_fov(fov: f64) -> f64 {
    (SENSOR_WIDTH_MM / 2.0) / (fov / 2.0).tan()
}

/// Compute focal length, film back and film offset from the calibration.
///
/// The film back is a 36mm wide sensor with the aspect ratio of the image. Offsets are the
/// principal point scaled by the film back. Every missing field uses its default, this never
/// fails.
///
/// # Arguments
///
/// * `params` - The `cameraParameters` section of the state.
///
/// # Returns
///
/// The camera intrinsics.
pub fn derive_intrinsics(params: &CameraParameters) -> CameraIntrinsics {
    let (width, height) = image_size(params);
    let aspect_ratio = width / height;

    let horizontal_aperture_mm = SENSOR_WIDTH_MM;
    let vertical_aperture_mm = horizontal_aperture_mm / aspect_ratio;

    let focal_length_mm =
        field_of_view(params).map_or(DEFAULT_FOCAL_LENGTH_MM, focal_length_from_fov);

    let [px, py] = params.principal_point.unwrap_or_default().xy();
    let horizontal_offset_mm = px * horizontal_aperture_mm;
    let vertical_offset_mm = py * vertical_aperture_mm;

    let intrinsics = CameraIntrinsics {
        focal_length_mm,
        horizontal_aperture_inch: horizontal_aperture_mm / MM_PER_INCH,
        vertical_aperture_inch: vertical_aperture_mm / MM_PER_INCH,
        horizontal_offset_inch: horizontal_offset_mm / MM_PER_INCH,
        vertical_offset_inch: vertical_offset_mm / MM_PER_INCH,
    };
    trace!("Camera intrinsics: {intrinsics:?}");

    intrinsics
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::PrincipalPoint;
    use approx::assert_relative_eq;

    #[test]
    fn test_defaults() {
        let intrinsics = derive_intrinsics(&CameraParameters::default());
        assert_eq!(intrinsics.focal_length_mm, 35.0);
        assert_relative_eq!(intrinsics.horizontal_aperture_inch, 1.4173, epsilon = 1e-4);
        assert_relative_eq!(intrinsics.vertical_aperture_inch, 0.7972, epsilon = 1e-4);
        assert_eq!(intrinsics.horizontal_offset_inch, 0.0);
        assert_eq!(intrinsics.vertical_offset_inch, 0.0);
    }

    #[test]
    fn test_full_hd_without_fov() {
        let params = CameraParameters {
            image_width: Some(1920.0),
            image_height: Some(1080.0),
            ..Default::default()
        };
        let intrinsics = derive_intrinsics(&params);
        assert_eq!(intrinsics.focal_length_mm, 35.0);
        assert_relative_eq!(intrinsics.horizontal_aperture_inch, 36.0 / 25.4, epsilon = 1e-12);
        assert_relative_eq!(intrinsics.vertical_aperture_inch, 20.25 / 25.4, epsilon = 1e-12);
    }

    #[test]
    fn test_focal_length_roundtrip() {
        let params = CameraParameters {
            horizontal_field_of_view: Some(2.0 * (18.0f64 / 35.0).atan()),
            ..Default::default()
        };
        assert_relative_eq!(derive_intrinsics(&params).focal_length_mm, 35.0, epsilon = 1e-9);
    }

    #[test]
    fn test_focal_length_from_fov() {
        // 90 degrees over 36mm is an 18mm lens
        assert_relative_eq!(
            focal_length_from_fov(std::f64::consts::FRAC_PI_2),
            18.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_offsets_from_principal_point() {
        for principal_point in [
            PrincipalPoint::Pair([0.5, -0.25]),
            PrincipalPoint::Point { x: 0.5, y: -0.25 },
        ] {
            let params = CameraParameters {
                image_width: Some(1000.0),
                image_height: Some(500.0),
                principal_point: Some(principal_point),
                ..Default::default()
            };
            let intrinsics = derive_intrinsics(&params);
            // film back is 36mm x 18mm
            assert_relative_eq!(intrinsics.horizontal_offset_inch, 18.0 / 25.4, epsilon = 1e-12);
            assert_relative_eq!(intrinsics.vertical_offset_inch, -4.5 / 25.4, epsilon = 1e-12);
            assert_relative_eq!(intrinsics.vertical_aperture_inch, 18.0 / 25.4, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_portrait_image() {
        let params = CameraParameters {
            image_width: Some(1080.0),
            image_height: Some(1920.0),
            ..Default::default()
        };
        let intrinsics = derive_intrinsics(&params);
        assert_relative_eq!(intrinsics.vertical_aperture_inch, 64.0 / 25.4, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_fov_uses_default_focal_length() {
        for fov in [0.0, -0.5, std::f64::consts::PI, 4.0, f64::NAN, f64::INFINITY] {
            let params = CameraParameters {
                horizontal_field_of_view: Some(fov),
                ..Default::default()
            };
            assert_eq!(field_of_view(&params), None, "{fov}");
            assert_eq!(derive_intrinsics(&params).focal_length_mm, DEFAULT_FOCAL_LENGTH_MM);
        }
    }

    #[test]
    fn test_degenerate_size_uses_defaults() {
        let params = CameraParameters {
            image_width: Some(0.0),
            image_height: Some(f64::NAN),
            ..Default::default()
        };
        assert_eq!(image_size(&params), (DEFAULT_IMAGE_WIDTH, DEFAULT_IMAGE_HEIGHT));
        assert!(derive_intrinsics(&params).vertical_aperture_inch.is_finite());
    }
}
