//! Indexed triangle meshes.
//!
//! A mesh collects vertices, optional per-vertex normals and faces before it
//! is handed to the scene. Face indices are checked as they are added so the
//! ray tracer never sees an out-of-range vertex.

use glint_math::Vec3;

use crate::error::{SceneError, SceneResult};

/// A triangle mesh with optional per-vertex normals.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    vertices: Vec<Vec3>,
    normals: Vec<Vec3>,
    faces: Vec<[usize; 3]>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, v: Vec3) -> usize {
        self.vertices.push(v);
        self.vertices.len() - 1
    }

    pub fn add_normal(&mut self, n: Vec3) {
        self.normals.push(n);
    }

    /// Add a face by vertex index.
    ///
    /// Fails if any index has no vertex yet, or if the face repeats a vertex.
    pub fn add_face(&mut self, a: usize, b: usize, c: usize) -> SceneResult<()> {
        let count = self.vertices.len();
        for index in [a, b, c] {
            if index >= count {
                return Err(SceneError::MissingVertex { index, count });
            }
        }
        if a == b || a == c {
            return Err(SceneError::DegenerateFace { index: a });
        }
        if b == c {
            return Err(SceneError::DegenerateFace { index: b });
        }

        self.faces.push([a, b, c]);
        Ok(())
    }

    /// Check that per-vertex data lines up with the vertex list.
    pub fn validate(&self) -> SceneResult<()> {
        if !self.normals.is_empty() && self.normals.len() != self.vertices.len() {
            return Err(SceneError::NormalCountMismatch {
                normals: self.normals.len(),
                vertices: self.vertices.len(),
            });
        }
        Ok(())
    }

    /// Replace the normals with the average of the unit face normals around
    /// each vertex. Vertices used by no face get a zero normal.
    pub fn generate_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.vertices.len()];
        let mut counts = vec![0u32; self.vertices.len()];

        for face in &self.faces {
            let [a, b, c] = face.map(|i| self.vertices[i]);
            let face_normal = (b - a).cross(c - a).normalize_or_zero();
            for &i in face {
                normals[i] += face_normal;
                counts[i] += 1;
            }
        }

        for (normal, count) in normals.iter_mut().zip(counts) {
            if count > 0 {
                *normal /= count as f64;
            }
        }

        self.normals = normals;
    }

    pub fn vertices(&self) -> &[Vec3] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Corner positions of a face.
    pub fn face_vertices(&self, face: usize) -> [Vec3; 3] {
        self.faces[face].map(|i| self.vertices[i])
    }

    /// Corner normals of a face, when the mesh carries normals.
    pub fn face_normals(&self, face: usize) -> Option<[Vec3; 3]> {
        if self.normals.len() != self.vertices.len() {
            return None;
        }
        Some(self.faces[face].map(|i| self.normals[i]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        let mut mesh = Mesh::new();
        mesh.add_vertex(Vec3::new(0.0, 0.0, 0.0));
        mesh.add_vertex(Vec3::new(1.0, 0.0, 0.0));
        mesh.add_vertex(Vec3::new(1.0, 1.0, 0.0));
        mesh.add_vertex(Vec3::new(0.0, 1.0, 0.0));
        mesh.add_face(0, 1, 2).unwrap();
        mesh.add_face(0, 2, 3).unwrap();
        mesh
    }

    #[test]
    fn test_add_face_rejects_missing_vertex() {
        let mut mesh = quad();
        assert_eq!(
            mesh.add_face(0, 1, 4),
            Err(SceneError::MissingVertex { index: 4, count: 4 })
        );
        assert_eq!(mesh.faces().len(), 2);
    }

    #[test]
    fn test_add_face_rejects_repeated_vertex() {
        let mut mesh = quad();
        assert_eq!(
            mesh.add_face(1, 2, 1),
            Err(SceneError::DegenerateFace { index: 1 })
        );
    }

    #[test]
    fn test_validate_normal_count() {
        let mut mesh = quad();
        assert!(mesh.validate().is_ok());

        mesh.add_normal(Vec3::Z);
        assert_eq!(
            mesh.validate(),
            Err(SceneError::NormalCountMismatch { normals: 1, vertices: 4 })
        );
    }

    #[test]
    fn test_generate_normals_flat_quad() {
        let mut mesh = quad();
        mesh.generate_normals();

        assert!(mesh.validate().is_ok());
        for n in mesh.normals() {
            assert!((*n - Vec3::Z).length() < 1e-12);
        }
        assert_eq!(mesh.face_normals(1), Some([Vec3::Z; 3]));
    }

    #[test]
    fn test_generate_normals_averages_faces() {
        // Two faces folded along the x axis at 90 degrees
        let mut mesh = Mesh::new();
        mesh.add_vertex(Vec3::ZERO);
        mesh.add_vertex(Vec3::X);
        mesh.add_vertex(Vec3::Y);
        mesh.add_vertex(Vec3::Z);
        mesh.add_face(0, 1, 2).unwrap(); // normal +Z
        mesh.add_face(0, 3, 1).unwrap(); // normal +Y
        mesh.generate_normals();

        let shared = mesh.normals()[0];
        assert!((shared - Vec3::new(0.0, 0.5, 0.5)).length() < 1e-12);
        assert!((mesh.normals()[2] - Vec3::Z).length() < 1e-12);
    }
}
