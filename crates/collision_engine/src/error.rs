//! Error taxonomy and the shared error sink
//!
//! The collision core never panics for expected failure conditions. Fallible
//! operations return booleans (or options) and append a [`CollisionError`]
//! to the shared [`ErrorSink`], because no exception channel exists across
//! the task boundary between the caller and the worker thread.

use std::sync::{Arc, Mutex, PoisonError};

use thiserror::Error;

use crate::shape::ShapeId;
use crate::task::TaskId;

/// Errors reported by the collision system
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollisionError {
    /// A shape was inserted into a tree while still a member of another tree
    #[error("can't insert shape {0}: it is already a member of some other tree")]
    ForeignTree(ShapeId),

    /// A shape was removed from a tree it never belonged to
    #[error("shape {0} is not a member of any tree")]
    NotInTree(ShapeId),

    /// A shape was removed from a tree other than its owner
    #[error("shape {0} can't be removed from this tree; it is not a member of this tree")]
    NotInThisTree(ShapeId),

    /// A shape's bounding box does not fit within the collision world extents
    #[error("failed to insert shape {0}: it does not lie within the collision world extents")]
    OutOfWorldBounds(ShapeId),

    /// A shape with the same ID already exists in the registry
    #[error("cannot add shape: a shape with ID {0} already exists in the system")]
    DuplicateShape(ShapeId),

    /// No shape with the given ID exists in the registry
    #[error("no shape with ID {0} was found in the system")]
    ShapeNotFound(ShapeId),

    /// A shape failed its geometric validity check
    #[error("shape {0} has invalid geometry")]
    InvalidShape(ShapeId),

    /// The narrow phase has no calculator for this shape-type pair
    #[error("collision between {0} and {1} shapes is not supported")]
    UnsupportedShapePair(&'static str, &'static str),

    /// The worker thread was started twice
    #[error("collision thread already started")]
    AlreadyStarted,

    /// A task was sent after the worker thread shut down
    #[error("collision thread is not running; task {0} was dropped")]
    ThreadNotRunning(TaskId),
}

/// Append-only, thread-safe sink for collision errors
///
/// Cloning the sink shares the underlying message list; the worker thread
/// and the caller thread append to and inspect the same accumulator.
#[derive(Debug, Clone, Default)]
pub struct ErrorSink {
    messages: Arc<Mutex<Vec<CollisionError>>>,
}

impl ErrorSink {
    /// Create a new, empty error sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an error to the sink, also logging it
    pub fn push(&self, error: CollisionError) {
        log::error!("{error}");
        self.lock().push(error);
    }

    /// Take all accumulated errors, leaving the sink empty
    pub fn drain(&self) -> Vec<CollisionError> {
        std::mem::take(&mut *self.lock())
    }

    /// Get the number of accumulated errors
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Check whether any errors have been accumulated
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<CollisionError>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
