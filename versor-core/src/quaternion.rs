/// Unit quaternions (versors) built from an axis and an angle
use nalgebra::{Matrix4, Vector3};

use crate::error::Result;
use crate::vector::normalize;

/// Quaternion stored as `(w, x, y, z)`.
///
/// Values produced by [`from_axis_angle_degrees`] have unit norm. `Versor::new`
/// accepts arbitrary components and does not normalize them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Versor {
    pub w: f32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Versor {
    pub fn new(w: f32, x: f32, y: f32, z: f32) -> Self {
        Self { w, x, y, z }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }

    pub fn norm(&self) -> f32 {
        (self.w * self.w + self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

impl Default for Versor {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<Versor> for [f32; 4] {
    fn from(q: Versor) -> Self {
        [q.w, q.x, q.y, q.z]
    }
}

impl From<[f32; 4]> for Versor {
    fn from(value: [f32; 4]) -> Self {
        Self::new(value[0], value[1], value[2], value[3])
    }
}

/// Build the versor rotating `angle_degrees` about `axis`.
///
/// The axis is normalized first, so any non-zero direction works. A zero
/// axis fails with [`VersorError::DegenerateAxis`](crate::VersorError::DegenerateAxis).
pub fn from_axis_angle_degrees(angle_degrees: f32, axis: &Vector3<f32>) -> Result<Versor> {
    let axis = normalize(axis)?;
    let half = angle_degrees.to_radians() * 0.5;
    let (s, c) = half.sin_cos();
    Ok(Versor::new(c, axis.x * s, axis.y * s, axis.z * s))
}

/// Expand a versor into a homogeneous rotation matrix.
///
/// The input is not re-normalized. A non-unit quaternion still yields a valid
/// affine transform, but it scales as well as rotates.
pub fn to_matrix(q: &Versor) -> Matrix4<f32> {
    let Versor { w, x, y, z } = *q;

    #[rustfmt::skip]
    let m = Matrix4::new(
        1.0 - 2.0 * y * y - 2.0 * z * z, 2.0 * x * y - 2.0 * w * z,       2.0 * x * z + 2.0 * w * y,       0.0,
        2.0 * x * y + 2.0 * w * z,       1.0 - 2.0 * x * x - 2.0 * z * z, 2.0 * y * z - 2.0 * w * x,       0.0,
        2.0 * x * z - 2.0 * w * y,       2.0 * y * z + 2.0 * w * x,       1.0 - 2.0 * x * x - 2.0 * y * y, 0.0,
        0.0,                             0.0,                             0.0,                             1.0,
    );
    m
}
