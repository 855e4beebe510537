//! Vector normalization and axis-angle rotation matrices

use crate::core::types::{Mat4, Vec3};

/// Divide `v` by its Euclidean norm.
///
/// `v` must be non-zero; the result is NaN otherwise. Callers guarantee this
/// by construction (a camera never sits on its own focus point).
pub fn normalize(v: Vec3) -> Vec3 {
    debug_assert!(v.length_squared() > 0.0, "normalize called with a zero-length vector");
    v / v.length()
}

/// Homogeneous matrix rotating counter-clockwise by `theta` radians about `axis`.
///
/// Built from the half-angle quaternion (a, b, c, d) = (cos θ/2, -axis·sin θ/2)
/// expanded term by term. The sign convention fixes which way a mouse drag
/// turns the view, so the expansion is kept literal rather than delegated to
/// `Mat4::from_axis_angle`.
pub fn rotation_matrix(axis: Vec3, theta: f32) -> Mat4 {
    let axis = normalize(axis);
    let a = (theta / 2.0).cos();
    let [b, c, d] = (-axis * (theta / 2.0).sin()).to_array();

    let (aa, bb, cc, dd) = (a * a, b * b, c * c, d * d);
    let (bc, ad, ac, ab, bd, cd) = (b * c, a * d, a * c, a * b, b * d, c * d);

    // Row-major as written; glam stores columns, hence the transpose.
    let rows = [
        [aa + bb - cc - dd, 2.0 * (bc + ad), 2.0 * (bd - ac), 0.0],
        [2.0 * (bc - ad), aa + cc - bb - dd, 2.0 * (cd + ab), 0.0],
        [2.0 * (bd + ac), 2.0 * (cd - ab), aa + dd - bb - cc, 0.0],
        [0.0, 0.0, 0.0, 1.0],
    ];
    Mat4::from_cols_array_2d(&rows).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).abs().max_element() < 1e-5
    }

    #[test]
    fn test_normalize() {
        let n = normalize(Vec3::new(3.0, 0.0, 4.0));
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!(approx(n, Vec3::new(0.6, 0.0, 0.8)));
    }

    #[test]
    fn test_quarter_turn_about_z() {
        let m = rotation_matrix(Vec3::Z, FRAC_PI_2);
        assert!(approx(m.transform_vector3(Vec3::X), Vec3::Y));
        assert!(approx(m.transform_vector3(Vec3::Y), -Vec3::X));
    }

    #[test]
    fn test_axis_is_normalized() {
        let a = rotation_matrix(Vec3::new(0.0, 5.0, 0.0), 0.3);
        let b = rotation_matrix(Vec3::Y, 0.3);
        assert!(a.abs_diff_eq(b, 1e-6));
    }

    #[test]
    fn test_zero_angle_is_identity() {
        let m = rotation_matrix(Vec3::new(1.0, 2.0, 3.0), 0.0);
        assert!(m.abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_matches_glam_axis_angle() {
        let axis = Vec3::new(1.0, -2.0, 0.5).normalize();
        let ours = rotation_matrix(axis, 0.7);
        let glam = Mat4::from_axis_angle(axis, 0.7);
        assert!(ours.abs_diff_eq(glam, 1e-5));
    }

    #[test]
    fn test_homogeneous_row_untouched() {
        let m = rotation_matrix(Vec3::X, 1.2);
        assert_eq!(m.row(3), crate::core::types::Vec4::W);
        assert_eq!(m.col(3), crate::core::types::Vec4::W);
    }
}
