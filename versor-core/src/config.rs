/// Startup configuration shared by every host
use crate::orientation::DEFAULT_STEP_DEGREES;

#[derive(Debug, Clone, PartialEq)]
pub struct VisualizerConfig {
    /// Raw axis components before normalization
    pub initial_axis: [i32; 3],
    pub step_degrees_per_frame: f32,
    /// Vertical field of view in degrees
    pub fov_y_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the camera to the origin along -z
    pub camera_distance: f32,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            initial_axis: [0, 1, 0],
            step_degrees_per_frame: DEFAULT_STEP_DEGREES,
            fov_y_degrees: 67.0,
            near: 0.1,
            far: 100.0,
            camera_distance: 5.0,
        }
    }
}
