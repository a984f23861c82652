//! Bounding-box tree: the broad phase of collision detection
//!
//! A recursive spatial index over axis-aligned sub-boxes of the collision
//! world. Nodes live in a generational arena and carry integer handles
//! instead of parent/child pointers, so the shape-to-node back-reference is
//! an index-table update rather than pointer surgery. Children are created
//! lazily by splitting a node's box into two near-cubical halves and are
//! never removed once created; the tree only grows.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use slotmap::{new_key_type, SlotMap};

use crate::error::{CollisionError, ErrorSink};
use crate::foundation::math::Vec3;
use crate::geometry::{Aabb, Ray};
use crate::narrow_phase::{self, ShapePairCollisionStatus};
use crate::result::{DebugRenderLines, RayCastHit};
use crate::shape::{NodeRef, Shape, ShapeId, ShapeRegistry};
use crate::spatial::CollisionCache;

new_key_type! {
    /// Arena handle for a node of a bounding-box tree
    pub struct NodeKey;
}

static NEXT_TREE_ID: AtomicU64 = AtomicU64::new(1);

/// A node of the tree, representing an axis-aligned sub-region of the world
#[derive(Debug)]
struct BoundingBoxNode {
    /// The space represented by this node
    bounds: Aabb,
    /// The containing space, None only for the root
    parent: Option<NodeKey>,
    /// Sub-space partitions; empty until the first insertion attempt here
    children: Vec<NodeKey>,
    /// Shapes in this node's space that cannot fit in a sub-space
    shapes: HashSet<ShapeId>,
}

impl BoundingBoxNode {
    fn new(bounds: Aabb, parent: Option<NodeKey>) -> Self {
        Self {
            bounds,
            parent,
            children: Vec::new(),
            shapes: HashSet::new(),
        }
    }
}

/// Broad-phase spatial index over the collision world
///
/// Not a user-facing type: the worker thread owns the tree exclusively and
/// calls into the narrow phase when appropriate. Callers reach it only
/// through the task protocol.
#[derive(Debug)]
pub struct BoundingBoxTree {
    /// Process-unique tree identity, used to detect foreign-tree membership
    id: u64,
    nodes: SlotMap<NodeKey, BoundingBoxNode>,
    root: Option<NodeKey>,
    world_extents: Aabb,
    errors: ErrorSink,
}

impl BoundingBoxTree {
    /// Create an empty tree covering the given world extents
    pub fn new(world_extents: Aabb, errors: ErrorSink) -> Self {
        Self {
            id: NEXT_TREE_ID.fetch_add(1, AtomicOrdering::Relaxed),
            nodes: SlotMap::with_key(),
            root: None,
            world_extents,
            errors,
        }
    }

    /// Get the world extents this tree was configured with
    pub fn world_extents(&self) -> &Aabb {
        &self.world_extents
    }

    /// Get the number of nodes currently in the tree
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Insert the given shape, or adjust its position if already a member
    ///
    /// The ideal location of a shape is as deep into the tree as its
    /// bounding box fits. It is up to the caller to re-insert a shape when
    /// its bounding box changes; the tree is none the wiser about mutations
    /// made outside its scope, and query results are undefined until the
    /// shape is re-inserted.
    ///
    /// Fails (reporting to the error sink) if the shape is a member of some
    /// other tree, or if its bounding box does not lie within the collision
    /// world extents; in the latter case the shape is left untracked.
    pub fn insert(&mut self, shape: &mut Shape) -> bool {
        let root = *self.root.get_or_insert_with(|| {
            self.nodes
                .insert(BoundingBoxNode::new(self.world_extents, None))
        });

        let mut node = match shape.node {
            None => Some(root),
            Some(node_ref) => {
                if node_ref.tree_id != self.id {
                    self.errors.push(CollisionError::ForeignTree(shape.id()));
                    return false;
                }
                if self.nodes.contains_key(node_ref.node) {
                    self.unbind(node_ref.node, shape);
                    Some(node_ref.node)
                } else {
                    // Back-reference survived a clear; treat as untracked.
                    shape.node = None;
                    Some(root)
                }
            }
        };

        let shape_box = shape.bounding_box();

        // Bring the shape up the tree only as far as is necessary.
        while let Some(key) = node {
            if self.nodes[key].bounds.contains_box(&shape_box) {
                break;
            }
            node = self.nodes[key].parent;
        }

        let Some(mut key) = node else {
            self.errors
                .push(CollisionError::OutOfWorldBounds(shape.id()));
            return false;
        };

        // Now put the shape down the tree as far as possible.
        loop {
            self.split_if_needed(key);

            let found = self.nodes[key]
                .children
                .iter()
                .copied()
                .find(|&child| self.nodes[child].bounds.contains_box(&shape_box));

            match found {
                Some(child) => key = child,
                None => break,
            }
        }

        self.bind(key, shape);
        true
    }

    /// Remove the given shape from this tree
    ///
    /// Fails (reporting to the error sink) if the shape is untracked or a
    /// member of a different tree. The node itself is never removed.
    pub fn remove(&mut self, shape: &mut Shape) -> bool {
        match shape.node {
            None => {
                self.errors.push(CollisionError::NotInTree(shape.id()));
                false
            }
            Some(node_ref) if node_ref.tree_id != self.id => {
                self.errors.push(CollisionError::NotInThisTree(shape.id()));
                false
            }
            Some(node_ref) if !self.nodes.contains_key(node_ref.node) => {
                // Back-reference survived a clear; treat as untracked.
                shape.node = None;
                self.errors.push(CollisionError::NotInTree(shape.id()));
                false
            }
            Some(node_ref) => {
                self.unbind(node_ref.node, shape);
                true
            }
        }
    }

    /// Delete the entire node tree, clearing every tracked shape's
    /// back-reference (the shapes themselves are not touched otherwise)
    pub fn clear(&mut self, registry: &mut ShapeRegistry) {
        for node in self.nodes.values() {
            for shape_id in &node.shapes {
                if let Some(shape) = registry.get_mut(shape_id) {
                    shape.node = None;
                }
            }
        }
        self.nodes.clear();
        self.root = None;
    }

    /// Perform a ray-cast against all shapes within the tree
    ///
    /// Returns the nearest hit by ray parameter, or the no-hit sentinel
    /// (shape ID zero) if the ray hits nothing.
    pub fn ray_cast(&self, ray: &Ray, registry: &ShapeRegistry) -> RayCastHit {
        let mut hit = RayCastHit::none();

        if let Some(root) = self.root {
            if ray.hits_or_originates_in(&self.nodes[root].bounds) {
                self.ray_cast_node(root, ray, registry, &mut hit);
            }
        }

        hit
    }

    /// Determine the collision status of the given shape
    ///
    /// Gathers candidate shapes from every node whose box intersects the
    /// query shape's box, then runs the narrow phase on each candidate pair,
    /// consulting the cache to avoid recomputation when neither shape has
    /// changed. Returns all pairs found in collision, or None (reporting to
    /// the error sink) if the shape is unknown or a pair dispatch fails.
    pub fn calculate_collision(
        &self,
        shape_id: ShapeId,
        registry: &ShapeRegistry,
        cache: &mut CollisionCache,
    ) -> Option<Vec<ShapePairCollisionStatus>> {
        let Some(shape) = registry.get(&shape_id) else {
            self.errors.push(CollisionError::ShapeNotFound(shape_id));
            return None;
        };

        let shape_box = shape.bounding_box();
        let mut candidates = Vec::new();
        if let Some(root) = self.root {
            self.gather_candidates(root, &shape_box, &mut candidates);
        }

        let mut statuses = Vec::new();
        for candidate_id in candidates {
            if candidate_id == shape_id {
                continue;
            }
            let Some(candidate) = registry.get(&candidate_id) else {
                continue;
            };

            // A hit computed from the reverse query is re-oriented so the
            // query shape is always shape_a of every returned entry.
            let status = if let Some(cached) = cache.lookup(shape, candidate) {
                if cached.shape_a == shape_id {
                    cached.clone()
                } else {
                    cached.reversed()
                }
            } else {
                match narrow_phase::calculate(shape, candidate) {
                    Ok(status) => {
                        cache.store(shape, candidate, &status);
                        status
                    }
                    Err(error) => {
                        self.errors.push(error);
                        return None;
                    }
                }
            };

            if status.in_collision {
                statuses.push(status);
            }
        }

        Some(statuses)
    }

    /// Provide a wire-frame visualization of the tree for debugging
    pub fn debug_render(&self, lines: &mut DebugRenderLines) {
        let color = Vec3::new(1.0, 1.0, 1.0);
        for node in self.nodes.values() {
            lines.add_lines_for_box(&node.bounds, color);
        }
    }

    fn gather_candidates(&self, key: NodeKey, shape_box: &Aabb, out: &mut Vec<ShapeId>) {
        let node = &self.nodes[key];
        if !node.bounds.intersects(shape_box) {
            return;
        }

        out.extend(node.shapes.iter().copied());
        for &child in &node.children {
            self.gather_candidates(child, shape_box, out);
        }
    }

    /// Descend the tree, performing a ray-cast as we go
    ///
    /// Returns whether a hit occurred in this node of the tree specifically;
    /// the aggregate best is threaded through `hit`.
    fn ray_cast_node(
        &self,
        key: NodeKey,
        ray: &Ray,
        registry: &ShapeRegistry,
        hit: &mut RayCastHit,
    ) -> bool {
        let node = &self.nodes[key];

        let mut child_hits: Vec<(NodeKey, f32)> = Vec::new();
        for &child in &node.children {
            let bounds = &self.nodes[child].bounds;
            if bounds.contains_point(ray.origin) {
                child_hits.push((child, 0.0));
            } else if let Some(alpha) = ray.cast_against(bounds) {
                child_hits.push((child, alpha));
            }
        }

        child_hits.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

        // The early-out lets us disregard the farther branch entirely: the
        // children's boxes do not overlap, so a hit found in a nearer child
        // cannot be beaten by shapes bound in a farther one.
        for (child, _) in child_hits {
            if self.ray_cast_node(child, ray, registry, hit) {
                break;
            }
        }

        // What remains is to check the current best, if any, against the
        // shapes bound directly at this node.
        let mut hit_occurred_at_this_node = false;
        for shape_id in &node.shapes {
            let Some(shape) = registry.get(shape_id) else {
                continue;
            };

            if let Some((alpha, normal)) = shape.ray_cast(ray) {
                if alpha >= 0.0 && alpha < hit.alpha {
                    hit_occurred_at_this_node = true;
                    hit.shape_id = *shape_id;
                    hit.alpha = alpha;
                    hit.surface_normal = normal;
                    hit.surface_point = ray.point_at(alpha);
                }
            }
        }

        hit_occurred_at_this_node
    }

    /// If this node has no children, create two children partitioning its
    /// space into two ideal-sized sub-spaces
    fn split_if_needed(&mut self, key: NodeKey) {
        if !self.nodes[key].children.is_empty() {
            return;
        }

        let (bounds_a, bounds_b) = self.nodes[key].bounds.split();
        let child_a = self.nodes.insert(BoundingBoxNode::new(bounds_a, Some(key)));
        let child_b = self.nodes.insert(BoundingBoxNode::new(bounds_b, Some(key)));

        let node = &mut self.nodes[key];
        node.children.push(child_a);
        node.children.push(child_b);
    }

    /// Point the given shape to this node, and this node to the shape
    fn bind(&mut self, key: NodeKey, shape: &mut Shape) {
        if shape.node.is_none() {
            self.nodes[key].shapes.insert(shape.id());
            shape.node = Some(NodeRef {
                tree_id: self.id,
                node: key,
            });
        }
    }

    /// Unlink the references between this node and the shape, both ways
    fn unbind(&mut self, key: NodeKey, shape: &mut Shape) {
        let matches_this_node = shape
            .node
            .is_some_and(|node_ref| node_ref.tree_id == self.id && node_ref.node == key);
        if matches_this_node {
            if let Some(node) = self.nodes.get_mut(key) {
                node.shapes.remove(&shape.id());
            }
            shape.node = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Transform;
    use approx::assert_relative_eq;

    fn world_extents() -> Aabb {
        Aabb::new(
            Vec3::new(-100.0, -100.0, -100.0),
            Vec3::new(100.0, 100.0, 100.0),
        )
    }

    fn tree() -> BoundingBoxTree {
        BoundingBoxTree::new(world_extents(), ErrorSink::new())
    }

    fn registered_sphere(registry: &mut ShapeRegistry, position: Vec3, radius: f32) -> ShapeId {
        let shape = Shape::sphere(Vec3::zeros(), radius, Transform::from_position(position));
        let id = shape.id();
        registry.insert(id, shape);
        id
    }

    /// Walk up from the shape's node checking the containment invariant.
    fn assert_containment(tree: &BoundingBoxTree, shape: &Shape) {
        let node_ref = shape.node().expect("shape should be tracked");
        let node = &tree.nodes[node_ref.node];
        assert!(node.bounds.contains_box(&shape.bounding_box()));
        assert!(tree.world_extents().contains_box(&shape.bounding_box()));
        assert!(node.shapes.contains(&shape.id()));
    }

    #[test]
    fn test_insert_binds_and_satisfies_containment() {
        let mut tree = tree();
        let mut registry = ShapeRegistry::new();
        let id = registered_sphere(&mut registry, Vec3::new(10.0, 10.0, 10.0), 1.0);

        let shape = registry.get_mut(&id).unwrap();
        assert!(tree.insert(shape));
        assert_containment(&tree, registry.get(&id).unwrap());
    }

    #[test]
    fn test_insert_descends_past_root() {
        let mut tree = tree();
        let mut registry = ShapeRegistry::new();
        // A small shape far from the center fits in deep sub-boxes.
        let id = registered_sphere(&mut registry, Vec3::new(50.0, 50.0, 50.0), 1.0);

        assert!(tree.insert(registry.get_mut(&id).unwrap()));

        let node_ref = registry.get(&id).unwrap().node().unwrap();
        assert_ne!(Some(node_ref.node), tree.root);
        // Descending splits at least the root.
        assert!(tree.node_count() > 1);
    }

    #[test]
    fn test_children_partition_parent_exactly() {
        let mut tree = tree();
        let mut registry = ShapeRegistry::new();
        let id = registered_sphere(&mut registry, Vec3::new(50.0, 50.0, 50.0), 1.0);
        assert!(tree.insert(registry.get_mut(&id).unwrap()));

        for node in tree.nodes.values() {
            if node.children.is_empty() {
                continue;
            }
            assert_eq!(node.children.len(), 2);
            let a = &tree.nodes[node.children[0]].bounds;
            let b = &tree.nodes[node.children[1]].bounds;

            assert!(node.bounds.contains_box(a));
            assert!(node.bounds.contains_box(b));
            // Disjoint except on the shared boundary plane; volumes sum up.
            let parent_size = node.bounds.dimensions();
            let parent_volume = parent_size.x * parent_size.y * parent_size.z;
            let a_size = a.dimensions();
            let b_size = b.dimensions();
            let child_volume =
                a_size.x * a_size.y * a_size.z + b_size.x * b_size.y * b_size.z;
            assert_relative_eq!(parent_volume, child_volume, epsilon = 1e-2);
        }
    }

    #[test]
    fn test_reinsertion_is_idempotent() {
        let mut tree = tree();
        let mut registry = ShapeRegistry::new();
        let id = registered_sphere(&mut registry, Vec3::new(25.0, -40.0, 10.0), 2.0);

        assert!(tree.insert(registry.get_mut(&id).unwrap()));
        let first_node = registry.get(&id).unwrap().node().unwrap();

        // Unchanged geometry lands in the same node.
        assert!(tree.insert(registry.get_mut(&id).unwrap()));
        let second_node = registry.get(&id).unwrap().node().unwrap();
        assert_eq!(first_node, second_node);
    }

    #[test]
    fn test_reinsertion_after_move_rebinds() {
        let mut tree = tree();
        let mut registry = ShapeRegistry::new();
        let id = registered_sphere(&mut registry, Vec3::new(50.0, 50.0, 50.0), 1.0);
        assert!(tree.insert(registry.get_mut(&id).unwrap()));

        let shape = registry.get_mut(&id).unwrap();
        shape.set_object_to_world(Transform::from_position(Vec3::new(-50.0, -50.0, -50.0)));
        assert!(tree.insert(shape));
        assert_containment(&tree, registry.get(&id).unwrap());
    }

    #[test]
    fn test_insert_fails_outside_world_extents() {
        let errors = ErrorSink::new();
        let mut tree = BoundingBoxTree::new(world_extents(), errors.clone());
        let mut registry = ShapeRegistry::new();
        let id = registered_sphere(&mut registry, Vec3::new(500.0, 0.0, 0.0), 1.0);

        assert!(!tree.insert(registry.get_mut(&id).unwrap()));
        assert!(registry.get(&id).unwrap().node().is_none());
        assert!(matches!(
            errors.drain().as_slice(),
            [CollisionError::OutOfWorldBounds(_)]
        ));
    }

    #[test]
    fn test_insert_into_foreign_tree_fails() {
        let errors = ErrorSink::new();
        let mut tree_a = BoundingBoxTree::new(world_extents(), errors.clone());
        let mut tree_b = BoundingBoxTree::new(world_extents(), errors.clone());
        let mut registry = ShapeRegistry::new();
        let id = registered_sphere(&mut registry, Vec3::zeros(), 1.0);

        assert!(tree_a.insert(registry.get_mut(&id).unwrap()));
        assert!(!tree_b.insert(registry.get_mut(&id).unwrap()));
        assert!(matches!(
            errors.drain().as_slice(),
            [CollisionError::ForeignTree(_)]
        ));
    }

    #[test]
    fn test_remove_untracked_reports_error() {
        let errors = ErrorSink::new();
        let mut tree = BoundingBoxTree::new(world_extents(), errors.clone());
        let mut registry = ShapeRegistry::new();
        let id = registered_sphere(&mut registry, Vec3::zeros(), 1.0);

        assert!(!tree.remove(registry.get_mut(&id).unwrap()));
        assert_eq!(errors.len(), 1);

        // Double-remove after a successful insert+remove also errors.
        assert!(tree.insert(registry.get_mut(&id).unwrap()));
        assert!(tree.remove(registry.get_mut(&id).unwrap()));
        assert!(!tree.remove(registry.get_mut(&id).unwrap()));
    }

    #[test]
    fn test_clear_unbinds_all_shapes() {
        let mut tree = tree();
        let mut registry = ShapeRegistry::new();
        let a = registered_sphere(&mut registry, Vec3::new(10.0, 0.0, 0.0), 1.0);
        let b = registered_sphere(&mut registry, Vec3::new(-10.0, 0.0, 0.0), 1.0);
        assert!(tree.insert(registry.get_mut(&a).unwrap()));
        assert!(tree.insert(registry.get_mut(&b).unwrap()));

        tree.clear(&mut registry);
        assert_eq!(tree.node_count(), 0);
        assert!(registry.get(&a).unwrap().node().is_none());
        assert!(registry.get(&b).unwrap().node().is_none());
    }

    #[test]
    fn test_insert_after_clear_with_out_of_registry_shape() {
        // A shape held outside the registry keeps its back-reference across
        // a clear; the tree must treat that stale reference as untracked
        // instead of indexing a deleted node.
        let errors = ErrorSink::new();
        let mut tree = BoundingBoxTree::new(world_extents(), errors.clone());
        let mut shape = Shape::sphere(
            Vec3::zeros(),
            1.0,
            Transform::from_position(Vec3::new(10.0, 0.0, 0.0)),
        );

        assert!(tree.insert(&mut shape));
        assert!(shape.node().is_some());

        let mut empty_registry = ShapeRegistry::new();
        tree.clear(&mut empty_registry);

        assert!(tree.insert(&mut shape));
        assert!(shape.node().is_some());
        assert!(errors.is_empty());

        // Same guard on the removal path.
        tree.clear(&mut empty_registry);
        assert!(!tree.remove(&mut shape));
        assert!(shape.node().is_none());
        assert!(matches!(
            errors.drain().as_slice(),
            [CollisionError::NotInTree(_)]
        ));
    }

    #[test]
    fn test_ray_cast_hits_sphere_at_radius() {
        let mut tree = tree();
        let mut registry = ShapeRegistry::new();
        let id = registered_sphere(&mut registry, Vec3::new(0.0, 0.0, 20.0), 3.0);
        assert!(tree.insert(registry.get_mut(&id).unwrap()));

        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0));
        let hit = tree.ray_cast(&ray, &registry);

        assert_eq!(hit.shape_id, id);
        assert_relative_eq!(hit.alpha, 17.0, epsilon = 1e-4);
        // Surface point sits one radius from the center along the ray.
        let center_to_surface = (hit.surface_point - Vec3::new(0.0, 0.0, 20.0)).magnitude();
        assert_relative_eq!(center_to_surface, 3.0, epsilon = 1e-4);
    }

    #[test]
    fn test_ray_cast_returns_nearest_of_many() {
        let mut tree = tree();
        let mut registry = ShapeRegistry::new();
        let near = registered_sphere(&mut registry, Vec3::new(0.0, 0.0, 10.0), 1.0);
        let far = registered_sphere(&mut registry, Vec3::new(0.0, 0.0, 40.0), 1.0);
        assert!(tree.insert(registry.get_mut(&near).unwrap()));
        assert!(tree.insert(registry.get_mut(&far).unwrap()));

        let ray = Ray::new(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0));
        let hit = tree.ray_cast(&ray, &registry);

        assert_eq!(hit.shape_id, near);
        assert_relative_eq!(hit.alpha, 9.0, epsilon = 1e-4);
        assert_ne!(hit.shape_id, far);
    }

    #[test]
    fn test_ray_cast_no_false_hits() {
        let mut tree = tree();
        let mut registry = ShapeRegistry::new();
        let id = registered_sphere(&mut registry, Vec3::new(0.0, 0.0, 20.0), 1.0);
        assert!(tree.insert(registry.get_mut(&id).unwrap()));

        let ray = Ray::new(Vec3::new(0.0, 50.0, 0.0), Vec3::new(0.0, 0.0, 1.0));
        let hit = tree.ray_cast(&ray, &registry);

        assert_eq!(hit.shape_id, ShapeId::NONE);
        assert!(!hit.is_hit());
    }

    #[test]
    fn test_ray_cast_empty_tree() {
        let tree = tree();
        let registry = ShapeRegistry::new();
        let ray = Ray::new(Vec3::zeros(), Vec3::new(1.0, 0.0, 0.0));
        assert!(!tree.ray_cast(&ray, &registry).is_hit());
    }

    #[test]
    fn test_calculate_collision_finds_overlapping_pair() {
        let mut tree = tree();
        let mut registry = ShapeRegistry::new();
        let mut cache = CollisionCache::new();
        let a = registered_sphere(&mut registry, Vec3::new(0.0, 0.0, 0.0), 1.0);
        let b = registered_sphere(&mut registry, Vec3::new(1.5, 0.0, 0.0), 1.0);
        let c = registered_sphere(&mut registry, Vec3::new(50.0, 0.0, 0.0), 1.0);
        for id in [a, b, c] {
            assert!(tree.insert(registry.get_mut(&id).unwrap()));
        }

        let statuses = tree.calculate_collision(a, &registry, &mut cache).unwrap();
        assert_eq!(statuses.len(), 1);
        assert!(statuses[0].in_collision);
        assert_eq!(statuses[0].shape_b, b);
        // The untouched far sphere contributes nothing.
        assert!(statuses.iter().all(|s| s.shape_b != c));
        // Computed pairs are now cached.
        assert!(!cache.is_empty());
    }

    #[test]
    fn test_calculate_collision_reverse_query_reorients_cache_hit() {
        let mut tree = tree();
        let mut registry = ShapeRegistry::new();
        let mut cache = CollisionCache::new();
        let a = registered_sphere(&mut registry, Vec3::new(0.0, 0.0, 0.0), 1.0);
        let b = registered_sphere(&mut registry, Vec3::new(1.5, 0.0, 0.0), 1.0);
        for id in [a, b] {
            assert!(tree.insert(registry.get_mut(&id).unwrap()));
        }

        let from_a = tree.calculate_collision(a, &registry, &mut cache).unwrap();
        assert_eq!(from_a[0].shape_a, a);

        // The reverse query is served from the cache but reports the pair
        // from its own point of view, with the push direction flipped.
        let from_b = tree.calculate_collision(b, &registry, &mut cache).unwrap();
        assert_eq!(from_b[0].shape_a, b);
        assert_eq!(from_b[0].shape_b, a);
        assert_relative_eq!(
            from_b[0].separation_delta.x,
            -from_a[0].separation_delta.x,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_calculate_collision_unknown_shape() {
        let errors = ErrorSink::new();
        let tree = BoundingBoxTree::new(world_extents(), errors.clone());
        let registry = ShapeRegistry::new();
        let mut cache = CollisionCache::new();

        let orphan = Shape::sphere(Vec3::zeros(), 1.0, Transform::identity());
        assert!(tree
            .calculate_collision(orphan.id(), &registry, &mut cache)
            .is_none());
        assert!(matches!(
            errors.drain().as_slice(),
            [CollisionError::ShapeNotFound(_)]
        ));
    }

    #[test]
    fn test_debug_render_covers_all_nodes() {
        let mut tree = tree();
        let mut registry = ShapeRegistry::new();
        let id = registered_sphere(&mut registry, Vec3::new(50.0, 50.0, 50.0), 1.0);
        assert!(tree.insert(registry.get_mut(&id).unwrap()));

        let mut lines = DebugRenderLines::new();
        tree.debug_render(&mut lines);
        assert_eq!(lines.len(), tree.node_count() * 12);
    }
}
