/// ASCII rasterizer for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Vector3};
use std::io::Write;
use versor_core::{AxisSegment, Camera, Mesh};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Character used for the rotation axis
const AXIS_CHAR: char = 'o';

/// ASCII renderer that converts 3D meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    pub fn char_at(&self, x: usize, y: usize) -> char {
        self.char_buffer[y * self.width + x]
    }

    pub fn render_mesh(&mut self, mesh: &Mesh, model_matrix: &Matrix4<f32>, camera: &Camera) {
        for (index, triangle) in mesh.triangles().enumerate() {
            let normal = model_matrix.transform_vector(&mesh.face_normal(index));
            self.render_triangle(&triangle, &normal, model_matrix, camera);
        }
    }

    fn render_triangle(
        &mut self,
        triangle: &[Vector3<f32>; 3],
        normal: &Vector3<f32>,
        model_matrix: &Matrix4<f32>,
        camera: &Camera,
    ) {
        // Project vertices to screen space; off-screen parts are cut by the
        // rasterizer's bounding box, only the near plane drops a triangle
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (coord, vertex) in screen_coords.iter_mut().zip(triangle) {
            match camera.project_past_near(vertex, model_matrix, self.width as u32, self.height as u32) {
                Some(projected) => *coord = projected,
                None => return,
            }
        }

        // Screen y grows downwards, so front faces have negative signed area
        let [a, b, c] = screen_coords;
        let signed_area = (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0);
        if signed_area >= 0.0 {
            return;
        }

        // Headlight: faces turned towards the viewer are brightest
        let brightness = normal.dot(&Vector3::z()).max(0.0);
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        let character = LUMINOSITY_RAMP[char_index.min(LUMINOSITY_RAMP.len() - 1)];

        self.rasterize_triangle(&screen_coords, character);
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char) {
        let [v0, v1, v2] = *coords;

        // Bounding box clipped to screen bounds
        let min_x = (v0.0.min(v1.0).min(v2.0).floor() as i32).max(0);
        let max_x = (v0.0.max(v1.0).max(v2.0).ceil() as i32).min(self.width as i32 - 1);
        let min_y = (v0.1.min(v1.1).min(v2.1).floor() as i32).max(0);
        let max_y = (v0.1.max(v1.1).max(v2.1).ceil() as i32).min(self.height as i32 - 1);

        let color = shade_color(character);
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let p = (x as f32 + 0.5, y as f32 + 0.5);

                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), p)
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                        self.plot(x, y, depth, character, color);
                    }
                }
            }
        }
    }

    /// Draw the axis segment, depth tested against the mesh.
    ///
    /// The axis is not transformed by the model matrix; it stays fixed in
    /// world space while the mesh turns around it.
    pub fn render_axis(&mut self, segment: &AxisSegment, camera: &Camera) {
        let [a, b] = &segment.endpoints;
        let Some([head, tail]) =
            camera.project_segment(a, b, &Matrix4::identity(), self.width as u32, self.height as u32)
        else {
            return;
        };
        let head_color = rgb_color(segment.colors[0]);
        let tail_color = rgb_color(segment.colors[1]);

        // Bresenham line with depth interpolated along the longer axis
        let (mut x, mut y) = (head.0.round() as i32, head.1.round() as i32);
        let (x1, y1) = (tail.0.round() as i32, tail.1.round() as i32);
        let dx = (x1 - x).abs();
        let dy = -(y1 - y).abs();
        let sx = if x < x1 { 1 } else { -1 };
        let sy = if y < y1 { 1 } else { -1 };
        let steps = dx.max(-dy).max(1) as f32;
        let mut err = dx + dy;
        let mut step = 0.0;

        loop {
            let t = step / steps;
            let depth = head.2 + (tail.2 - head.2) * t;
            let color = if t < 0.5 { head_color } else { tail_color };
            self.plot(x, y, depth, AXIS_CHAR, color);

            if x == x1 && y == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
            step += 1.0;
        }
    }

    fn plot(&mut self, x: i32, y: i32, depth: f32, character: char, color: Color) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.char_buffer[idx] = character;
            self.color_buffer[idx] = color;
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            let mut current = None;
            for x in 0..self.width {
                let idx = y * self.width + x;
                let color = self.color_buffer[idx];
                if current != Some(color) {
                    writer.queue(SetForegroundColor(color))?;
                    current = Some(color);
                }
                writer.queue(Print(self.char_buffer[idx]))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Color based on character intensity
fn shade_color(c: char) -> Color {
    match c {
        ' ' | '.' | ':' => Color::DarkGrey,
        '-' | '=' => Color::Grey,
        '+' | '*' => Color::White,
        '#' | '%' | '@' => Color::Cyan,
        _ => Color::White,
    }
}

fn rgb_color(rgb: [f32; 3]) -> Color {
    let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color::Rgb {
        r: channel(rgb[0]),
        g: channel(rgb[1]),
        b: channel(rgb[2]),
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use versor_core::VisualizerConfig;

    fn camera() -> Camera {
        Camera::for_viewport(80, 40, 2.0, &VisualizerConfig::default())
    }

    fn filled(renderer: &AsciiRenderer) -> usize {
        (0..renderer.height())
            .flat_map(|y| (0..renderer.width()).map(move |x| (x, y)))
            .filter(|&(x, y)| renderer.char_at(x, y) != ' ')
            .count()
    }

    #[test]
    fn test_cube_covers_center() {
        let mut renderer = AsciiRenderer::new(80, 40);
        renderer.render_mesh(&Mesh::cube(2.0), &Matrix4::identity(), &camera());
        // Front face points straight at the headlight
        assert_eq!(renderer.char_at(40, 20), '@');
        assert!(filled(&renderer) > 100);
    }

    #[test]
    fn test_clear_resets_buffers() {
        let mut renderer = AsciiRenderer::new(20, 10);
        renderer.render_mesh(&Mesh::cube(2.0), &Matrix4::identity(), &camera());
        renderer.clear();
        assert_eq!(filled(&renderer), 0);
    }

    #[test]
    fn test_axis_hidden_inside_cube() {
        let mut renderer = AsciiRenderer::new(80, 40);
        let cam = camera();
        renderer.render_mesh(&Mesh::cube(2.0), &Matrix4::identity(), &cam);
        renderer.render_axis(&AxisSegment::along(&Vector3::y()), &cam);
        // The cube's front face occludes the axis at the center
        assert_eq!(renderer.char_at(40, 20), '@');
        // Outside the cube the axis is visible above the center
        assert_eq!(renderer.char_at(40, 2), AXIS_CHAR);
    }

    #[test]
    fn test_axis_alone_draws_a_line() {
        let mut renderer = AsciiRenderer::new(80, 40);
        renderer.render_axis(&AxisSegment::along(&Vector3::y()), &camera());
        assert_eq!(renderer.char_at(40, 20), AXIS_CHAR);
    }

    #[test]
    fn test_diagonal_axis_is_clipped_not_dropped() {
        let cam = camera();
        for axis in [Vector3::new(1.0, 0.0, 1.0), Vector3::new(0.0, 1.0, 1.0)] {
            let mut renderer = AsciiRenderer::new(80, 40);
            renderer.render_axis(&AxisSegment::along(&axis.normalize()), &cam);
            assert_eq!(renderer.char_at(40, 20), AXIS_CHAR, "axis {:?}", axis);
            assert!(filled(&renderer) > 10);
        }
    }

    #[test]
    fn test_mesh_partly_off_screen_keeps_visible_faces() {
        let mut renderer = AsciiRenderer::new(80, 40);
        // Slide the cube so its front face crosses the right edge
        let model = Matrix4::new_translation(&Vector3::new(2.0, 0.0, 0.0));
        renderer.render_mesh(&Mesh::cube(2.0), &model, &camera());
        assert_eq!(renderer.char_at(79, 20), '@');
    }

    #[test]
    fn test_draw_writes_every_cell() {
        let renderer = AsciiRenderer::new(4, 2);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8_lossy(&out);
        assert_eq!(text.matches(' ').count(), 8);
    }

    #[test]
    fn test_barycentric_degenerate() {
        assert!(barycentric((0.0, 0.0), (1.0, 1.0), (2.0, 2.0), (0.5, 0.5)).is_none());
    }
}
