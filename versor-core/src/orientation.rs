/// Fixed-step rotation angle and the versor/matrix it produces
use nalgebra::{Matrix4, Vector3};

use crate::error::Result;
use crate::quaternion::{from_axis_angle_degrees, to_matrix, Versor};

/// Simulated time covered by one frame, in seconds
pub const FIXED_TIME_STEP_S: f32 = 1.0 / 50.0;

/// Angular speed of the demo rotation
pub const DEGREES_PER_SECOND: f32 = 50.0;

/// Angle added per rendered frame (one degree)
pub const DEFAULT_STEP_DEGREES: f32 = FIXED_TIME_STEP_S * DEGREES_PER_SECOND;

/// Rotation angle advanced by a constant amount every frame.
///
/// The step is per rendered frame, not per elapsed second, so the apparent
/// speed follows the host's refresh rate.
#[derive(Debug, Clone)]
pub struct OrientationController {
    angle_degrees: f32,
    step_degrees_per_frame: f32,
}

impl OrientationController {
    pub fn new() -> Self {
        Self::with_step(DEFAULT_STEP_DEGREES)
    }

    /// Steps at or above a full turn would need more than one wrap per frame.
    pub fn with_step(step_degrees_per_frame: f32) -> Self {
        debug_assert!((0.0..360.0).contains(&step_degrees_per_frame));
        Self {
            angle_degrees: 0.0,
            step_degrees_per_frame,
        }
    }

    pub fn angle_degrees(&self) -> f32 {
        self.angle_degrees
    }

    pub fn step_degrees_per_frame(&self) -> f32 {
        self.step_degrees_per_frame
    }

    /// Advance one frame and return the new angle in `[0, 360)`.
    pub fn advance_frame(&mut self) -> f32 {
        self.angle_degrees += self.step_degrees_per_frame;
        if self.angle_degrees >= 360.0 {
            self.angle_degrees -= 360.0;
        }
        self.angle_degrees
    }

    pub fn current_versor_and_matrix(&self, axis: &Vector3<f32>) -> Result<(Versor, Matrix4<f32>)> {
        let q = from_axis_angle_degrees(self.angle_degrees, axis)?;
        Ok((q, to_matrix(&q)))
    }
}

impl Default for OrientationController {
    fn default() -> Self {
        Self::new()
    }
}
