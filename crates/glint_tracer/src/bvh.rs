//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! A binary tree over the scene's objects. Nodes store indices into the
//! scene's object list rather than the objects themselves, so the tree is
//! rebuilt from scratch whenever that list changes.

use glint_math::{Aabb, Interval, Ray, TransformArena};

use crate::geometry::{Geometry, Intersection};
use crate::shape::LocalHit;

/// BVH node - either a branch with two children or a leaf with one object.
#[derive(Debug)]
pub enum BvhNode {
    /// Internal node with two children.
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    /// Leaf node holding one object index.
    Leaf { object: usize, bbox: Aabb },
    /// Empty tree.
    Empty,
}

impl BvhNode {
    /// Build a BVH over every object in `objects`.
    pub fn new(objects: &[Geometry]) -> Self {
        let mut indices: Vec<usize> = (0..objects.len()).collect();
        Self::build(&mut indices, objects)
    }

    /// Recursive median-split construction.
    ///
    /// Sorts the members by box midpoint along the longest axis of their
    /// combined box and splits the sorted list in half.
    fn build(indices: &mut [usize], objects: &[Geometry]) -> Self {
        let bbox = indices.iter().fold(Aabb::EMPTY, |acc, &i| {
            Aabb::surrounding(&acc, &objects[i].bounding_box())
        });

        match indices.len() {
            0 => return BvhNode::Empty,
            1 => {
                return BvhNode::Leaf {
                    object: indices[0],
                    bbox,
                }
            }
            _ => {}
        }

        let axis = bbox.longest_axis();
        indices.sort_by(|&a, &b| {
            let a_mid = objects[a].bounding_box().centroid()[axis];
            let b_mid = objects[b].bounding_box().centroid()[axis];
            a_mid.total_cmp(&b_mid)
        });

        let mid = indices.len() / 2;
        let (left, right) = indices.split_at_mut(mid);

        BvhNode::Branch {
            left: Box::new(Self::build(left, objects)),
            right: Box::new(Self::build(right, objects)),
            bbox,
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } => *bbox,
            BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    /// Number of levels below and including this node.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => left.leaf_count() + right.leaf_count(),
        }
    }

    /// Nearest hit along `ray` among the objects under this node.
    ///
    /// Depth-first with an explicit stack. Every subtree whose box the ray
    /// touches is searched; subtrees are not skipped based on the best hit
    /// found so far.
    pub fn intersect<'a>(
        &self,
        ray: &Ray,
        objects: &'a [Geometry],
        transforms: &TransformArena,
    ) -> Option<Intersection<'a>> {
        if !self.bounding_box().hit(ray, Interval::FORWARD) {
            return None;
        }

        let mut best: Option<Intersection<'a>> = None;
        let mut stack: Vec<&BvhNode> = vec![self];

        while let Some(node) = stack.pop() {
            match node {
                BvhNode::Empty => {}
                BvhNode::Leaf { object, .. } => {
                    let geometry = &objects[*object];
                    let mut hit = LocalHit::default();
                    if geometry.intersect(ray, transforms, &mut hit)
                        && best.map_or(true, |b| hit.t < b.t)
                    {
                        best = Some(Intersection::new(hit, geometry));
                    }
                }
                BvhNode::Branch { left, right, .. } => {
                    // Left is pushed last so it is searched first
                    if right.bounding_box().hit(ray, Interval::FORWARD) {
                        stack.push(right);
                    }
                    if left.bounding_box().hit(ray, Interval::FORWARD) {
                        stack.push(left);
                    }
                }
            }
        }

        best
    }
}
