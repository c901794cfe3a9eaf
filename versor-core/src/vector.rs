/// Vector and matrix helpers for the axis-angle pipeline
///
/// Matrices are `nalgebra::Matrix4<f32>`, stored column-major. Element
/// `(row, col)` indexing is always mathematical, so `m[(0, 3)]` is the x
/// translation regardless of storage order.
use nalgebra::{Matrix4, Vector3};

use crate::error::{Result, VersorError};

/// Scale `v` to unit length.
///
/// The zero vector (and anything whose length is not finite) has no
/// direction and is reported as [`VersorError::DegenerateAxis`].
pub fn normalize(v: &Vector3<f32>) -> Result<Vector3<f32>> {
    let length = v.norm();
    if length == 0.0 || !length.is_finite() {
        return Err(VersorError::DegenerateAxis);
    }
    Ok(v / length)
}

pub fn identity() -> Matrix4<f32> {
    Matrix4::identity()
}

/// Apply a translation by `v` after `m`.
pub fn translate(m: &Matrix4<f32>, v: &Vector3<f32>) -> Matrix4<f32> {
    Matrix4::new_translation(v) * m
}

/// Right-handed perspective projection with a vertical field of view in degrees.
pub fn perspective(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Matrix4<f32> {
    let fov_rad = fov_y_degrees.to_radians();
    let sy = 1.0 / (fov_rad * 0.5).tan();
    let sx = sy / aspect;
    let sz = -(far + near) / (far - near);
    let pz = -(2.0 * far * near) / (far - near);

    #[rustfmt::skip]
    let m = Matrix4::new(
        sx,  0.0, 0.0, 0.0,
        0.0, sy,  0.0, 0.0,
        0.0, 0.0, sz,  pz,
        0.0, 0.0, -1.0, 0.0,
    );
    m
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_unit_length() {
        let v = normalize(&Vector3::new(3.0, 4.0, 0.0)).unwrap();
        assert!((v.x - 0.6).abs() < 1e-6);
        assert!((v.y - 0.8).abs() < 1e-6);
        assert!((v.norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        for v in [
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(-7.0, 0.5, 0.0),
            Vector3::new(0.0, 0.0, -12.0),
        ] {
            let once = normalize(&v).unwrap();
            let twice = normalize(&once).unwrap();
            assert!((once - twice).norm() < 1e-6);
        }
    }

    #[test]
    fn test_normalize_zero_vector() {
        let result = normalize(&Vector3::zeros());
        assert!(matches!(result, Err(VersorError::DegenerateAxis)));
    }

    #[test]
    fn test_translate_moves_origin() {
        let m = translate(&identity(), &Vector3::new(0.0, 0.0, -5.0));
        let p = m.transform_point(&nalgebra::Point3::origin());
        assert!((p.z + 5.0).abs() < 1e-6);
        assert_eq!(m[(2, 3)], -5.0);
    }

    #[test]
    fn test_perspective_depth_range() {
        let p = perspective(67.0, 1.0, 0.1, 100.0);
        // Points on the near and far planes land on NDC -1 and +1
        let near = p * nalgebra::Vector4::new(0.0, 0.0, -0.1, 1.0);
        let far = p * nalgebra::Vector4::new(0.0, 0.0, -100.0, 1.0);
        assert!((near.z / near.w + 1.0).abs() < 1e-4);
        assert!((far.z / far.w - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_perspective_aspect() {
        let p = perspective(90.0, 2.0, 0.1, 100.0);
        assert!((p[(1, 1)] - 1.0).abs() < 1e-6);
        assert!((p[(0, 0)] - 0.5).abs() < 1e-6);
    }
}
