/// Mesh data for rendering
use nalgebra::{Vector2, Vector3};

/// Unindexed triangle soup: every three consecutive vertices form a triangle.
///
/// The three attribute streams always have the same length, so they can be
/// uploaded as separate vertex buffers and drawn with `vertex_count()`.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    pub positions: Vec<Vector3<f32>>,
    pub texcoords: Vec<Vector2<f32>>,
    pub normals: Vec<Vector3<f32>>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            texcoords: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
        }
    }

    pub fn push_vertex(&mut self, position: Vector3<f32>, texcoord: Vector2<f32>, normal: Vector3<f32>) {
        self.positions.push(position);
        self.texcoords.push(texcoord);
        self.normals.push(normal);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Positions of each triangle in winding order.
    pub fn triangles(&self) -> impl Iterator<Item = [Vector3<f32>; 3]> + '_ {
        self.positions.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Normal of triangle `index`, averaged from its vertex normals.
    pub fn face_normal(&self, index: usize) -> Vector3<f32> {
        let n = &self.normals[index * 3..index * 3 + 3];
        (n[0] + n[1] + n[2])
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros)
    }

    pub fn flat_positions(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }

    pub fn flat_texcoords(&self) -> Vec<f32> {
        self.texcoords.iter().flat_map(|t| [t.x, t.y]).collect()
    }

    pub fn flat_normals(&self) -> Vec<f32> {
        self.normals.iter().flat_map(|n| [n.x, n.y, n.z]).collect()
    }

    /// Axis-aligned cube centred on the origin, used when no mesh file is given.
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        // (normal, u direction, v direction) for each face, counter-clockwise from outside
        let faces = [
            (Vector3::z(), Vector3::x(), Vector3::y()),
            (-Vector3::z(), -Vector3::x(), Vector3::y()),
            (Vector3::y(), Vector3::x(), -Vector3::z()),
            (-Vector3::y(), Vector3::x(), Vector3::z()),
            (Vector3::x(), -Vector3::z(), Vector3::y()),
            (-Vector3::x(), Vector3::z(), Vector3::y()),
        ];
        let corners = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 0.0), (1.0, 1.0), (0.0, 1.0)];

        let mut mesh = Self::with_capacity(faces.len() * corners.len());
        for (normal, u, v) in faces {
            for (s, t) in corners {
                let position = (normal + u * (2.0 * s - 1.0) + v * (2.0 * t - 1.0)) * half;
                mesh.push_vertex(position, Vector2::new(s, t), normal);
            }
        }
        mesh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_counts() {
        let cube = Mesh::cube(2.0);
        assert_eq!(cube.vertex_count(), 36);
        assert_eq!(cube.triangle_count(), 12);
        assert_eq!(cube.texcoords.len(), 36);
        assert_eq!(cube.flat_positions().len(), 108);
        assert_eq!(cube.flat_texcoords().len(), 72);
    }

    #[test]
    fn test_cube_bounds() {
        let cube = Mesh::cube(2.0);
        for p in &cube.positions {
            assert!(p.iter().all(|c| (c.abs() - 1.0).abs() < 1e-6));
        }
    }

    #[test]
    fn test_cube_winding_matches_normals() {
        let cube = Mesh::cube(1.0);
        for (i, [a, b, c]) in cube.triangles().enumerate() {
            let geometric = (b - a).cross(&(c - a)).normalize();
            assert!((geometric - cube.face_normal(i)).norm() < 1e-5, "triangle {}", i);
        }
    }
}
