//! Collision world: the worker thread's private state
//!
//! Owns the shape registry, the spatial tree, the narrow-phase cache, and
//! the error sink, and executes one task at a time. Only the worker thread
//! touches a world, so none of this needs locking; the task protocol is the
//! only way in.

use crate::error::{CollisionError, ErrorSink};
use crate::foundation::math::{Transform, Vec3};
use crate::geometry::Aabb;
use crate::result::{CollisionResult, DebugRenderLines};
use crate::shape::{Shape, ShapeId, ShapeRegistry};
use crate::spatial::{BoundingBoxTree, CollisionCache};
use crate::task::{DebugDrawFlags, Task, TaskKind};

/// The collision world over which tasks execute
#[derive(Debug)]
pub struct CollisionWorld {
    shapes: ShapeRegistry,
    tree: BoundingBoxTree,
    cache: CollisionCache,
    errors: ErrorSink,
    exit_requested: bool,
}

impl CollisionWorld {
    /// Create an empty world covering the given extents
    pub fn new(world_extents: Aabb, errors: ErrorSink) -> Self {
        Self {
            shapes: ShapeRegistry::new(),
            tree: BoundingBoxTree::new(world_extents, errors.clone()),
            cache: CollisionCache::new(),
            errors,
            exit_requested: false,
        }
    }

    /// Check whether an exit command has been executed
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Get the number of registered shapes
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    /// Execute a single task against this world
    ///
    /// Queries return `Some` result (possibly the `Error` variant); commands
    /// return `None` and report failures to the error sink.
    pub fn execute(&mut self, task: Task) -> Option<CollisionResult> {
        let (id, kind) = task.into_parts();
        log::debug!("executing task {id}");

        match kind {
            TaskKind::RayCast(ray) => {
                Some(CollisionResult::RayCast(self.tree.ray_cast(&ray, &self.shapes)))
            }
            TaskKind::Collision { shape_id } => {
                match self
                    .tree
                    .calculate_collision(shape_id, &self.shapes, &mut self.cache)
                {
                    Some(statuses) => Some(CollisionResult::Collision(statuses)),
                    None => Some(CollisionResult::Error(format!(
                        "collision query failed for shape {shape_id}"
                    ))),
                }
            }
            TaskKind::ObjectToWorld { shape_id } => match self.shapes.get(&shape_id) {
                Some(shape) => Some(CollisionResult::Transform(*shape.object_to_world())),
                None => {
                    self.errors.push(CollisionError::ShapeNotFound(shape_id));
                    Some(CollisionResult::Error(format!(
                        "no shape with ID {shape_id} was found in the system"
                    )))
                }
            },
            TaskKind::DebugRender(flags) => {
                Some(CollisionResult::DebugRender(self.debug_render(flags)))
            }
            TaskKind::AddShape(shape) => {
                self.add_shape(shape);
                None
            }
            TaskKind::RemoveShape(shape_id) => {
                self.remove_shape(shape_id);
                None
            }
            TaskKind::SetObjectToWorldTransform {
                shape_id,
                transform,
            } => {
                self.set_object_to_world(shape_id, transform);
                None
            }
            TaskKind::ExitThread => {
                self.exit_requested = true;
                None
            }
        }
    }

    /// Register a shape and insert it into the spatial tree
    pub fn add_shape(&mut self, mut shape: Shape) -> bool {
        let id = shape.id();
        if self.shapes.contains_key(&id) {
            self.errors.push(CollisionError::DuplicateShape(id));
            return false;
        }
        if !shape.is_valid() {
            self.errors.push(CollisionError::InvalidShape(id));
            return false;
        }

        if !self.tree.insert(&mut shape) {
            return false;
        }
        self.shapes.insert(id, shape);
        true
    }

    /// Unregister a shape, removing it from the tree and the cache
    pub fn remove_shape(&mut self, shape_id: ShapeId) -> bool {
        let Some(mut shape) = self.shapes.remove(&shape_id) else {
            self.errors.push(CollisionError::ShapeNotFound(shape_id));
            return false;
        };

        let removed = self.tree.remove(&mut shape);
        self.cache.purge(shape_id);
        removed
    }

    /// Replace a shape's transform and re-insert it into the tree
    ///
    /// If the moved shape no longer fits within the world extents, it is
    /// unregistered entirely rather than left tracked at a stale location.
    pub fn set_object_to_world(&mut self, shape_id: ShapeId, transform: Transform) -> bool {
        let Some(shape) = self.shapes.get_mut(&shape_id) else {
            self.errors.push(CollisionError::ShapeNotFound(shape_id));
            return false;
        };

        shape.set_object_to_world(transform);
        if self.tree.insert(shape) {
            return true;
        }

        self.shapes.remove(&shape_id);
        self.cache.purge(shape_id);
        false
    }

    /// Remove every shape and delete the spatial tree
    pub fn clear(&mut self) {
        self.tree.clear(&mut self.shapes);
        self.shapes.clear();
        self.cache.clear();
    }

    fn debug_render(&self, flags: DebugDrawFlags) -> DebugRenderLines {
        let mut lines = DebugRenderLines::new();
        if flags.contains(DebugDrawFlags::TREE) {
            self.tree.debug_render(&mut lines);
        }
        if flags.contains(DebugDrawFlags::SHAPES) {
            let color = Vec3::new(0.0, 1.0, 0.0);
            for shape in self.shapes.values() {
                lines.add_lines_for_box(&shape.bounding_box(), color);
            }
        }
        lines
    }
}
