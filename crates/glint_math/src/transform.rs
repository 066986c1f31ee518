// Transform utilities and the transform hierarchy.
//
// Every geometry lives in its own local frame. Frames form a tree rooted at the
// world frame; nodes are stored in an arena and referenced by index so geometry
// can point at its frame without owning it.

use crate::{Aabb, Mat3, Mat4, Vec3, Vec4};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform a vector in 3D space (applies rotation and scale, but NOT translation).
    /// Vectors have an implicit w=0 component.
    fn transform_vector3(&self, vector: Vec3) -> Vec3;

    /// Transform an axis-aligned bounding box.
    /// Computes the bounding box of all 8 transformed corners.
    fn transform_aabb(&self, aabb: &Aabb) -> Aabb;
}

impl Mat4Ext for Mat4 {
    fn transform_vector3(&self, vector: Vec3) -> Vec3 {
        (*self * Vec4::new(vector.x, vector.y, vector.z, 0.0)).truncate()
    }

    fn transform_aabb(&self, aabb: &Aabb) -> Aabb {
        if aabb.is_empty() {
            return *aabb;
        }
        Aabb::enclosing(aabb.corners().map(|c| self.transform_point3(c)))
    }
}

/// Handle to a node in a [`TransformArena`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct TransformId(usize);

/// A coordinate frame with its world matrix and the derived matrices the
/// intersection code needs.
#[derive(Debug, Clone)]
pub struct TransformNode {
    xform: Mat4,
    inverse: Mat4,
    normal_matrix: Mat3,
    parent: Option<TransformId>,
}

impl TransformNode {
    fn new(xform: Mat4, parent: Option<TransformId>) -> Self {
        let inverse = xform.inverse();
        // Inverse-transpose of the upper 3x3 carries local normals to world space
        let normal_matrix = Mat3::from_mat4(inverse).transpose();
        Self {
            xform,
            inverse,
            normal_matrix,
            parent,
        }
    }

    /// Local-to-world matrix.
    pub fn xform(&self) -> Mat4 {
        self.xform
    }

    pub fn parent(&self) -> Option<TransformId> {
        self.parent
    }

    pub fn global_to_local_point(&self, p: Vec3) -> Vec3 {
        self.inverse.transform_point3(p)
    }

    pub fn global_to_local_vector(&self, v: Vec3) -> Vec3 {
        self.inverse.transform_vector3(v)
    }

    pub fn local_to_global_point(&self, p: Vec3) -> Vec3 {
        self.xform.transform_point3(p)
    }

    pub fn local_to_global_vector(&self, v: Vec3) -> Vec3 {
        self.xform.transform_vector3(v)
    }

    /// Map a local-space normal to a unit world-space normal.
    pub fn local_to_global_normal(&self, n: Vec3) -> Vec3 {
        (self.normal_matrix * n).normalize_or_zero()
    }
}

/// Owns every transform node. Node 0 is the world frame.
#[derive(Debug, Clone)]
pub struct TransformArena {
    nodes: Vec<TransformNode>,
}

impl TransformArena {
    /// The world frame.
    pub const ROOT: TransformId = TransformId(0);

    pub fn new() -> Self {
        Self {
            nodes: vec![TransformNode::new(Mat4::IDENTITY, None)],
        }
    }

    /// Add a child frame whose matrix is `local` relative to `parent`.
    ///
    /// An unknown parent is treated as the world frame.
    pub fn create_child(&mut self, parent: TransformId, local: Mat4) -> TransformId {
        let parent = if parent.0 < self.nodes.len() {
            parent
        } else {
            Self::ROOT
        };
        let world = self.nodes[parent.0].xform * local;
        let id = TransformId(self.nodes.len());
        self.nodes.push(TransformNode::new(world, Some(parent)));
        id
    }

    /// Look up a node. Unknown ids resolve to the world frame.
    pub fn get(&self, id: TransformId) -> &TransformNode {
        self.nodes.get(id.0).unwrap_or(&self.nodes[0])
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl Default for TransformArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_transform_vector3_no_translation() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        let vector = Vec3::new(1.0, 0.0, 0.0);

        // Translation should NOT affect vectors (w=0)
        assert_eq!(mat.transform_vector3(vector), vector);
    }

    #[test]
    fn test_transform_vector3_rotation() {
        // 90 degree rotation around Z axis
        let mat = Mat4::from_rotation_z(PI / 2.0);
        let transformed = mat.transform_vector3(Vec3::X);

        assert!((transformed - Vec3::Y).length() < 1e-9);
    }

    #[test]
    fn test_transform_aabb_translation() {
        let mat = Mat4::from_translation(Vec3::new(5.0, 5.0, 5.0));
        let aabb = Aabb::from_points(Vec3::ZERO, Vec3::ONE);
        let transformed = mat.transform_aabb(&aabb);

        assert!((transformed.min() - Vec3::splat(5.0)).length() < 1e-9);
        assert!((transformed.max() - Vec3::splat(6.0)).length() < 1e-9);
    }

    #[test]
    fn test_transform_aabb_rotation_grows_box() {
        let mat = Mat4::from_rotation_z(PI / 4.0);
        let aabb = Aabb::from_points(Vec3::splat(-1.0), Vec3::splat(1.0));
        let transformed = mat.transform_aabb(&aabb);

        let half_diag = 2.0f64.sqrt();
        assert!((transformed.x.max - half_diag).abs() < 1e-9);
        assert!((transformed.z.max - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_arena_root_is_identity() {
        let arena = TransformArena::new();
        let root = arena.get(TransformArena::ROOT);
        assert_eq!(root.xform(), Mat4::IDENTITY);
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_child_composes_with_parent() {
        let mut arena = TransformArena::new();
        let moved = arena.create_child(
            TransformArena::ROOT,
            Mat4::from_translation(Vec3::new(0.0, 0.0, -5.0)),
        );
        let scaled = arena.create_child(moved, Mat4::from_scale(Vec3::splat(2.0)));

        let node = arena.get(scaled);
        assert_eq!(node.parent(), Some(moved));
        assert_eq!(node.local_to_global_point(Vec3::X), Vec3::new(2.0, 0.0, -5.0));

        let back = node.global_to_local_point(Vec3::new(2.0, 0.0, -5.0));
        assert!((back - Vec3::X).length() < 1e-12);
    }

    #[test]
    fn test_normal_matrix_under_nonuniform_scale() {
        let mut arena = TransformArena::new();
        let id = arena.create_child(
            TransformArena::ROOT,
            Mat4::from_scale(Vec3::new(4.0, 1.0, 1.0)),
        );
        let node = arena.get(id);

        // A 45 degree normal leans towards the axis that was NOT stretched
        let n = node.local_to_global_normal(Vec3::new(1.0, 1.0, 0.0).normalize());
        assert!((n.length() - 1.0).abs() < 1e-12);
        assert!(n.y > n.x);

        // Stretched surface tangent stays perpendicular to the mapped normal
        let tangent = node.local_to_global_vector(Vec3::new(1.0, -1.0, 0.0));
        assert!(n.dot(tangent).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_id_falls_back_to_root() {
        let mut arena = TransformArena::new();
        let bogus = TransformId(42);
        let child = arena.create_child(bogus, Mat4::from_translation(Vec3::X));

        assert_eq!(arena.get(child).parent(), Some(TransformArena::ROOT));
        assert_eq!(arena.get(bogus).xform(), Mat4::IDENTITY);
        assert_eq!(arena.len(), 2);
    }
}
