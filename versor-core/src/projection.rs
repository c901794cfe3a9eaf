/// Camera and projection utilities
use nalgebra::{Matrix4, Vector3, Vector4};

use crate::config::VisualizerConfig;
use crate::vector::{identity, perspective, translate};

/// Fixed camera looking down -z at the origin.
#[derive(Debug, Clone)]
pub struct Camera {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub distance: f32,
}

impl Camera {
    pub fn new(aspect: f32, config: &VisualizerConfig) -> Self {
        Self {
            fov_y_degrees: config.fov_y_degrees,
            aspect,
            near: config.near,
            far: config.far,
            distance: config.camera_distance,
        }
    }

    /// Camera sized for a viewport, in pixels or character cells.
    ///
    /// `cell_aspect` is the height of one cell divided by its width; terminal
    /// cells are roughly twice as tall as they are wide.
    pub fn for_viewport(width: u32, height: u32, cell_aspect: f32, config: &VisualizerConfig) -> Self {
        let aspect = width as f32 / (height.max(1) as f32 * cell_aspect);
        Self::new(aspect, config)
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        translate(&identity(), &Vector3::new(0.0, 0.0, -self.distance))
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        perspective(self.fov_y_degrees, self.aspect, self.near, self.far)
    }

    /// Model-space point in homogeneous clip coordinates.
    pub fn to_clip(&self, point: &Vector3<f32>, model_matrix: &Matrix4<f32>) -> Vector4<f32> {
        let mvp = self.projection_matrix() * self.view_matrix() * model_matrix;
        mvp * Vector4::new(point.x, point.y, point.z, 1.0)
    }

    /// Project a model-space point to screen space.
    ///
    /// Returns `(x, y, depth)` with depth in NDC (`-1` near, `1` far), or
    /// `None` when the point is behind the camera or outside the view volume.
    pub fn project_to_screen(
        &self,
        point: &Vector3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let clip = self.to_clip(point, model_matrix);
        if !in_view_volume(&clip) {
            return None;
        }
        clip_to_screen(&clip, width, height)
    }

    /// Like [`Camera::project_to_screen`] but only rejects points in front of
    /// the near plane; the result may lie off screen.
    pub fn project_past_near(
        &self,
        point: &Vector3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let clip = self.to_clip(point, model_matrix);
        if clip.z < -clip.w {
            return None;
        }
        clip_to_screen(&clip, width, height)
    }

    /// Project the segment `a`-`b`, clipped to the view volume.
    ///
    /// Clipping runs in homogeneous clip space against all six planes
    /// (Liang-Barsky), so a segment with both ends off screen still yields
    /// its visible middle. `None` when no part of it is visible.
    pub fn project_segment(
        &self,
        a: &Vector3<f32>,
        b: &Vector3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<[(f32, f32, f32); 2]> {
        let p0 = self.to_clip(a, model_matrix);
        let p1 = self.to_clip(b, model_matrix);

        // Signed distance to each plane, non-negative inside
        let planes = |p: &Vector4<f32>| {
            [p.w + p.x, p.w - p.x, p.w + p.y, p.w - p.y, p.w + p.z, p.w - p.z]
        };
        let (d0, d1) = (planes(&p0), planes(&p1));

        let (mut t0, mut t1) = (0.0_f32, 1.0_f32);
        for (e0, e1) in d0.into_iter().zip(d1) {
            if e0 < 0.0 && e1 < 0.0 {
                return None;
            }
            if e0 < 0.0 {
                t0 = t0.max(e0 / (e0 - e1));
            } else if e1 < 0.0 {
                t1 = t1.min(e0 / (e0 - e1));
            }
        }
        if t0 > t1 {
            return None;
        }

        let start = clip_to_screen(&p0.lerp(&p1, t0), width, height)?;
        let end = clip_to_screen(&p0.lerp(&p1, t1), width, height)?;
        Some([start, end])
    }
}

fn in_view_volume(clip: &Vector4<f32>) -> bool {
    (-clip.w..=clip.w).contains(&clip.x)
        && (-clip.w..=clip.w).contains(&clip.y)
        && (-clip.w..=clip.w).contains(&clip.z)
}

/// Perspective divide and viewport mapping.
fn clip_to_screen(clip: &Vector4<f32>, width: u32, height: u32) -> Option<(f32, f32, f32)> {
    // Prevent division by near-zero w
    if clip.w < 1e-6 {
        return None;
    }

    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    let depth = clip.z / clip.w;

    let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

    Some((screen_x, screen_y, depth))
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(1.0, &VisualizerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::for_viewport(800, 600, 1.0, &VisualizerConfig::default());
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(camera.fov_y_degrees, 67.0);
    }

    #[test]
    fn test_terminal_cells_halve_aspect() {
        let camera = Camera::for_viewport(80, 40, 2.0, &VisualizerConfig::default());
        assert!((camera.aspect - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix_pushes_scene_back() {
        let camera = Camera::default();
        assert_eq!(camera.view_matrix()[(2, 3)], -5.0);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = Camera::default();
        let (x, y, depth) = camera
            .project_to_screen(&Vector3::zeros(), &Matrix4::identity(), 100, 50)
            .unwrap();
        assert!((x - 50.0).abs() < 1e-4);
        assert!((y - 25.0).abs() < 1e-4);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_up_is_screen_top() {
        let camera = Camera::default();
        let (_, y, _) = camera
            .project_to_screen(&Vector3::new(0.0, 1.0, 0.0), &Matrix4::identity(), 100, 100)
            .unwrap();
        assert!(y < 50.0);
    }

    #[test]
    fn test_segment_leaving_the_screen_is_clipped() {
        let camera = Camera::default();
        let a = Vector3::new(2.12, 0.0, 2.12);
        let b = -a;
        assert!(camera.project_to_screen(&a, &Matrix4::identity(), 80, 40).is_none());

        let [start, end] = camera
            .project_segment(&a, &b, &Matrix4::identity(), 80, 40)
            .unwrap();
        // The near end is cut at the right screen edge, the far end is kept
        assert!((start.0 - 80.0).abs() < 1e-2);
        assert!(end.0 > 0.0 && end.0 < 40.0);
        assert!((start.1 - 20.0).abs() < 1e-2);
        assert!((end.1 - 20.0).abs() < 1e-2);
    }

    #[test]
    fn test_segment_inside_view_is_unchanged() {
        let camera = Camera::default();
        let a = Vector3::new(0.0, 1.0, 0.0);
        let b = Vector3::new(0.0, -1.0, 0.0);
        let [start, end] = camera
            .project_segment(&a, &b, &Matrix4::identity(), 100, 100)
            .unwrap();
        let expected = camera.project_to_screen(&a, &Matrix4::identity(), 100, 100).unwrap();
        assert!((start.1 - expected.1).abs() < 1e-4);
        assert!(end.1 > 50.0);
    }

    #[test]
    fn test_segment_outside_view_is_rejected() {
        let camera = Camera::default();
        let a = Vector3::new(50.0, 0.0, 0.0);
        let b = Vector3::new(60.0, 1.0, 0.0);
        assert!(camera
            .project_segment(&a, &b, &Matrix4::identity(), 100, 100)
            .is_none());
    }

    #[test]
    fn test_off_screen_point_past_near_plane() {
        let camera = Camera::default();
        let p = Vector3::new(10.0, 0.0, 0.0);
        assert!(camera.project_to_screen(&p, &Matrix4::identity(), 100, 100).is_none());
        let (x, _, _) = camera
            .project_past_near(&p, &Matrix4::identity(), 100, 100)
            .unwrap();
        assert!(x > 100.0);
        assert!(camera
            .project_past_near(&Vector3::new(0.0, 0.0, 10.0), &Matrix4::identity(), 100, 100)
            .is_none());
    }

    #[test]
    fn test_point_behind_camera_is_clipped() {
        let camera = Camera::default();
        let behind = Vector3::new(0.0, 0.0, 10.0);
        assert!(camera
            .project_to_screen(&behind, &Matrix4::identity(), 100, 100)
            .is_none());
    }
}
