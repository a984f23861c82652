//! # Collision Engine
//!
//! A real-time 3D collision detection subsystem running on a dedicated
//! worker thread.
//!
//! ## Features
//!
//! - **Shapes**: Spheres, capsules, and oriented boxes with rigid transforms
//! - **Broad Phase**: A lazily partitioned bounding-box tree over the world
//! - **Narrow Phase**: Per-pair contact calculation with a revision-keyed cache
//! - **Task Protocol**: Asynchronous queries and commands with polled results
//! - **Debug Rendering**: Wire-frame visualization of shapes and the tree
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use collision_engine::prelude::*;
//!
//! fn main() {
//!     let mut thread = CollisionThread::new();
//!     thread.startup(Aabb::new(
//!         Vec3::new(-100.0, -100.0, -100.0),
//!         Vec3::new(100.0, 100.0, 100.0),
//!     ));
//!
//!     let shape = Shape::sphere(Vec3::zeros(), 1.0, Transform::identity());
//!     thread.send_task(Task::add_shape(shape));
//!
//!     let ray = Ray::new(Vec3::new(0.0, 0.0, -10.0), Vec3::new(0.0, 0.0, 1.0));
//!     if let Some(task_id) = thread.send_task(Task::ray_cast(ray)) {
//!         // Poll thread.receive_result(task_id) once per frame.
//!         let _ = thread.wait_for_result(task_id, std::time::Duration::from_secs(1));
//!     }
//!
//!     thread.shutdown();
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod foundation;
pub mod geometry;
pub mod narrow_phase;
pub mod spatial;

mod error;
mod result;
mod shape;
mod task;
mod thread;
mod world;

pub use error::{CollisionError, ErrorSink};
pub use result::{CollisionResult, DebugRenderLines, RayCastHit, RenderLine};
pub use shape::{NodeRef, Shape, ShapeGeometry, ShapeId, ShapeRegistry};
pub use task::{DebugDrawFlags, Task, TaskId, TaskKind};
pub use thread::CollisionThread;
pub use world::CollisionWorld;

/// Common imports for collision engine users
pub mod prelude {
    pub use crate::{
        foundation::math::{Quat, Transform, Vec3},
        geometry::{Aabb, LineSegment, Ray},
        narrow_phase::ShapePairCollisionStatus,
        CollisionError, CollisionResult, CollisionThread, DebugDrawFlags, ErrorSink, RayCastHit,
        Shape, ShapeGeometry, ShapeId, Task, TaskId, TaskKind,
    };
}
