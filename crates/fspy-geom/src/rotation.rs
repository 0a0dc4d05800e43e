use glam::DMat3;

use crate::Mat3;

/// Threshold on `sqrt(r00² + r10²)` below which a rotation is treated as gimbal locked.
pub const GIMBAL_LOCK_EPSILON: f64 = 1e-6;

/// Compute the rotation matrix from three Euler angles.
///
/// The elementary rotations are composed as `Rz · Ry · Rx`, i.e. the X rotation is applied
/// first to a column vector and Z last.
///
/// # Arguments
///
/// * `x` - The rotation about the X axis in radians.
/// * `y` - The rotation about the Y axis in radians.
/// * `z` - The rotation about the Z axis in radians.
///
/// # Returns
///
/// The 3x3 rotation matrix.
///
/// Example:
///
/// ```
/// use fspy_geom::rotation::euler_to_matrix;
///
/// let r = euler_to_matrix(0.0, 0.0, std::f64::consts::FRAC_PI_2);
/// assert!((r.get(1, 0) - 1.0).abs() < 1e-12);
/// ```
pub fn euler_to_matrix(x: f64, y: f64, z: f64) -> Mat3 {
    let rot_x = Mat3::from(DMat3::from_rotation_x(x));
    let rot_y = Mat3::from(DMat3::from_rotation_y(y));
    let rot_z = Mat3::from(DMat3::from_rotation_z(z));
    rot_z.dot(&rot_y).dot(&rot_x)
}

/// Decompose a rotation matrix into the Euler angles of [`euler_to_matrix`].
///
/// # Arguments
///
/// * `r` - An orthonormal rotation matrix.
///
/// # Returns
///
/// The angles `[x, y, z]` in radians. The angles are not wrapped beyond the range of `atan2`.
///
/// When the pitch is close to ±90° the X and Z rotations share an axis and only their
/// combination is observable. In that case the whole residual rotation is assigned to `x`
/// and `z` is set to zero.
pub fn matrix_to_euler(r: &Mat3) -> [f64; 3] {
    let sy = (r.get(0, 0).powi(2) + r.get(1, 0).powi(2)).sqrt();

    if sy >= GIMBAL_LOCK_EPSILON {
        [
            r.get(2, 1).atan2(r.get(2, 2)),
            (-r.get(2, 0)).atan2(sy),
            r.get(1, 0).atan2(r.get(0, 0)),
        ]
    } else {
        [
            (-r.get(1, 2)).atan2(r.get(1, 1)),
            (-r.get(2, 0)).atan2(sy),
            0.0,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn assert_mat_eq(a: &Mat3, b: &Mat3) {
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(a.get(i, j), b.get(i, j), epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_elementary_rotations() {
        let (c, s) = (0.3f64.cos(), 0.3f64.sin());

        let rx = euler_to_matrix(0.3, 0.0, 0.0);
        assert_mat_eq(
            &rx,
            &Mat3::from_rows([[1.0, 0.0, 0.0], [0.0, c, -s], [0.0, s, c]]),
        );

        let ry = euler_to_matrix(0.0, 0.3, 0.0);
        assert_mat_eq(
            &ry,
            &Mat3::from_rows([[c, 0.0, s], [0.0, 1.0, 0.0], [-s, 0.0, c]]),
        );

        let rz = euler_to_matrix(0.0, 0.0, 0.3);
        assert_mat_eq(
            &rz,
            &Mat3::from_rows([[c, -s, 0.0], [s, c, 0.0], [0.0, 0.0, 1.0]]),
        );
    }

    #[test]
    fn test_composition_order() {
        let (x, y, z) = (0.4, -0.7, 1.1);
        let expected = euler_to_matrix(0.0, 0.0, z)
            .dot(&euler_to_matrix(0.0, y, 0.0))
            .dot(&euler_to_matrix(x, 0.0, 0.0));
        assert_mat_eq(&euler_to_matrix(x, y, z), &expected);

        // not the reversed order
        let reversed = euler_to_matrix(x, 0.0, 0.0)
            .dot(&euler_to_matrix(0.0, y, 0.0))
            .dot(&euler_to_matrix(0.0, 0.0, z));
        assert!((euler_to_matrix(x, y, z).get(0, 1) - reversed.get(0, 1)).abs() > 1e-3);
    }

    #[test]
    fn test_rotation_is_orthonormal() {
        let rot = euler_to_matrix(0.3, -1.1, 2.4);
        let product = rot.dot(&rot.transpose()).to_rows();
        let identity = Mat3::IDENTITY.to_rows();
        for (row, expected) in product.iter().zip(identity.iter()) {
            for (value, e) in row.iter().zip(expected.iter()) {
                assert_relative_eq!(*value, *e, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_identity_decomposes_to_zero() {
        let angles = matrix_to_euler(&Mat3::IDENTITY);
        assert_eq!(angles, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_roundtrip_angles() {
        let steps = [-3.0, -2.2, -1.3, -0.5, 0.0, 0.25, 0.9, 1.4, 2.6, 3.1];
        // pitch stays inside (-pi/2, pi/2) so the decomposition is unique
        let pitches = [-1.5, -1.0, -0.3, 0.0, 0.6, 1.2, 1.5];
        for &x in steps.iter() {
            for &y in pitches.iter() {
                for &z in steps.iter() {
                    let [rx, ry, rz] = matrix_to_euler(&euler_to_matrix(x, y, z));
                    assert_relative_eq!(rx, x, epsilon = 1e-6);
                    assert_relative_eq!(ry, y, epsilon = 1e-6);
                    assert_relative_eq!(rz, z, epsilon = 1e-6);
                }
            }
        }
    }

    #[test]
    fn test_roundtrip_matrix_outside_principal_pitch() {
        // |y| > pi/2 decomposes to an equivalent triple, the matrix must still match
        for &y in [-2.8, -1.9, 1.9, 2.8, PI - 0.01].iter() {
            let r = euler_to_matrix(0.7, y, -1.2);
            let [rx, ry, rz] = matrix_to_euler(&r);
            assert!(ry.abs() <= FRAC_PI_2);
            assert_mat_eq(&euler_to_matrix(rx, ry, rz), &r);
        }
    }

    #[test]
    fn test_gimbal_lock() {
        for &y in [FRAC_PI_2, -FRAC_PI_2].iter() {
            let r = euler_to_matrix(0.4, y, 0.9);
            let [rx, ry, rz] = matrix_to_euler(&r);
            assert_eq!(rz, 0.0);
            assert_relative_eq!(ry, y, epsilon = 1e-6);
            assert_mat_eq(&euler_to_matrix(rx, ry, rz), &r);
        }
    }
}
