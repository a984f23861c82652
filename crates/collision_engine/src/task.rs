//! Tasks: the units of work submitted to the collision worker thread
//!
//! A task is either a query (produces exactly one result, stored under the
//! task's ID) or a command (produces no result). Task IDs come from a
//! process-wide monotonically increasing counter that is never reset, so an
//! ID uniquely correlates a submission with its result.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use bitflags::bitflags;

use crate::foundation::math::Transform;
use crate::geometry::Ray;
use crate::shape::{Shape, ShapeId};

/// Process-unique identifier correlating a task with its result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

static NEXT_TASK_ID: AtomicU64 = AtomicU64::new(1);

impl TaskId {
    fn next() -> Self {
        TaskId(NEXT_TASK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

bitflags! {
    /// Selects what a debug-render query should visualize
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DebugDrawFlags: u32 {
        /// Wire-frame boxes for every registered shape
        const SHAPES = 1;
        /// Wire-frame boxes for every node of the spatial tree
        const TREE = 2;
    }
}

/// The kind of work a task performs
#[derive(Debug)]
pub enum TaskKind {
    /// Query: cast a ray against all shapes in the collision world
    RayCast(Ray),
    /// Query: determine the collision status of the given shape
    Collision {
        /// The shape whose collision status is requested
        shape_id: ShapeId,
    },
    /// Query: fetch the given shape's object-to-world transform
    ObjectToWorld {
        /// The shape whose transform is requested
        shape_id: ShapeId,
    },
    /// Query: produce wire-frame geometry visualizing the collision world
    DebugRender(DebugDrawFlags),
    /// Command: register a shape and insert it into the spatial tree
    AddShape(Shape),
    /// Command: unregister a shape and remove it from the spatial tree
    RemoveShape(ShapeId),
    /// Command: replace a shape's transform and re-insert it into the tree
    SetObjectToWorldTransform {
        /// The shape to move
        shape_id: ShapeId,
        /// The new object-to-world transform
        transform: Transform,
    },
    /// Command: make the worker thread exit its run loop
    ExitThread,
}

/// A unit of work with a pre-assigned [`TaskId`]
#[derive(Debug)]
pub struct Task {
    id: TaskId,
    kind: TaskKind,
}

impl Task {
    /// Create a task of the given kind, assigning a fresh ID
    pub fn new(kind: TaskKind) -> Self {
        Self {
            id: TaskId::next(),
            kind,
        }
    }

    /// Create a ray-cast query
    pub fn ray_cast(ray: Ray) -> Self {
        Self::new(TaskKind::RayCast(ray))
    }

    /// Create a collision query for the given shape
    pub fn collision(shape_id: ShapeId) -> Self {
        Self::new(TaskKind::Collision { shape_id })
    }

    /// Create an object-to-world transform query for the given shape
    pub fn object_to_world(shape_id: ShapeId) -> Self {
        Self::new(TaskKind::ObjectToWorld { shape_id })
    }

    /// Create a debug-render query
    pub fn debug_render(flags: DebugDrawFlags) -> Self {
        Self::new(TaskKind::DebugRender(flags))
    }

    /// Create an add-shape command
    pub fn add_shape(shape: Shape) -> Self {
        Self::new(TaskKind::AddShape(shape))
    }

    /// Create a remove-shape command
    pub fn remove_shape(shape_id: ShapeId) -> Self {
        Self::new(TaskKind::RemoveShape(shape_id))
    }

    /// Create a set-transform command
    pub fn set_object_to_world(shape_id: ShapeId, transform: Transform) -> Self {
        Self::new(TaskKind::SetObjectToWorldTransform { shape_id, transform })
    }

    /// Create the exit command used by the shutdown path
    pub fn exit_thread() -> Self {
        Self::new(TaskKind::ExitThread)
    }

    /// Get this task's pre-assigned ID
    pub fn id(&self) -> TaskId {
        self.id
    }

    /// Check whether this task produces a result
    pub fn is_query(&self) -> bool {
        matches!(
            self.kind,
            TaskKind::RayCast(_)
                | TaskKind::Collision { .. }
                | TaskKind::ObjectToWorld { .. }
                | TaskKind::DebugRender(_)
        )
    }

    pub(crate) fn into_parts(self) -> (TaskId, TaskKind) {
        (self.id, self.kind)
    }
}
