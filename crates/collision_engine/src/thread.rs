//! The collision worker thread
//!
//! All collision state lives on a dedicated worker thread; callers interact
//! with it exclusively through the task protocol. Tasks are delivered over a
//! channel whose blocking receiver doubles as the work queue (strict FIFO,
//! zero CPU while idle), and query results are parked in a shared map until
//! the caller polls them out by task ID.

use std::collections::HashMap;
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::JoinHandle;

use crate::error::{CollisionError, ErrorSink};
use crate::geometry::Aabb;
use crate::result::CollisionResult;
use crate::task::{Task, TaskId};
use crate::world::CollisionWorld;

type ResultMap = Arc<Mutex<HashMap<TaskId, CollisionResult>>>;

/// Handle to the collision worker thread
///
/// Dropping the handle shuts the worker down if it is still running.
#[derive(Debug, Default)]
pub struct CollisionThread {
    sender: Option<Sender<Task>>,
    join_handle: Option<JoinHandle<()>>,
    results: ResultMap,
    errors: ErrorSink,
}

impl CollisionThread {
    /// Create a handle with no worker running yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the error sink shared with the worker
    pub fn errors(&self) -> &ErrorSink {
        &self.errors
    }

    /// Check whether the worker thread is running
    pub fn is_running(&self) -> bool {
        self.sender.is_some()
    }

    /// Spawn the worker thread over a world covering the given extents
    ///
    /// Fails (reporting to the error sink) if the worker is already running.
    pub fn startup(&mut self, world_extents: Aabb) -> bool {
        if self.is_running() {
            self.errors.push(CollisionError::AlreadyStarted);
            return false;
        }

        let (sender, receiver) = mpsc::channel::<Task>();
        let results = Arc::clone(&self.results);
        let errors = self.errors.clone();

        let join_handle = std::thread::Builder::new()
            .name("collision".into())
            .spawn(move || {
                log::info!("collision thread starting");
                let mut world = CollisionWorld::new(world_extents, errors);

                // A closed channel means every sender is gone; treat it the
                // same as an explicit exit command.
                while let Ok(task) = receiver.recv() {
                    let id = task.id();
                    if let Some(result) = world.execute(task) {
                        results
                            .lock()
                            .unwrap_or_else(PoisonError::into_inner)
                            .insert(id, result);
                    }
                    if world.exit_requested() {
                        break;
                    }
                }

                world.clear();
                log::info!("collision thread exiting");
            })
            .expect("failed to spawn collision thread");

        self.sender = Some(sender);
        self.join_handle = Some(join_handle);
        true
    }

    /// Stop the worker thread and wait for it to finish
    ///
    /// Queues an exit command behind all pending tasks, so work already
    /// submitted still executes. Pending results are discarded. Harmless if
    /// the worker is not running.
    pub fn shutdown(&mut self) {
        if let Some(sender) = self.sender.take() {
            // Ignore a send failure here: the worker already exited.
            let _ = sender.send(Task::exit_thread());
        }
        if let Some(join_handle) = self.join_handle.take() {
            if join_handle.join().is_err() {
                log::error!("collision thread panicked");
            }
        }
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Submit a task to the worker, returning its ID for later polling
    ///
    /// Tasks execute strictly in submission order. Fails (reporting to the
    /// error sink) if the worker is not running.
    pub fn send_task(&self, task: Task) -> Option<TaskId> {
        let id = task.id();
        let Some(sender) = &self.sender else {
            self.errors.push(CollisionError::ThreadNotRunning(id));
            return None;
        };

        if sender.send(task).is_err() {
            self.errors.push(CollisionError::ThreadNotRunning(id));
            return None;
        }
        Some(id)
    }

    /// Poll for the result of a previously submitted query
    ///
    /// Non-blocking. Returns None while the result is not yet available (or
    /// the ID is unknown); once returned, a result is no longer held and
    /// polling the same ID again yields None.
    pub fn receive_result(&self, task_id: TaskId) -> Option<CollisionResult> {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&task_id)
    }

    /// Block until the result of a previously submitted query arrives
    ///
    /// Spins with a short sleep between polls and gives up once `timeout`
    /// elapses, returning None. Commands never store a result, so waiting on
    /// a command's ID always times out. Intended for tests and shutdown
    /// paths; interactive callers should poll [`Self::receive_result`] once
    /// per frame instead.
    pub fn wait_for_result(
        &self,
        task_id: TaskId,
        timeout: std::time::Duration,
    ) -> Option<CollisionResult> {
        let deadline = std::time::Instant::now() + timeout;
        while self.is_running() {
            if let Some(result) = self.receive_result(task_id) {
                return Some(result);
            }
            if std::time::Instant::now() >= deadline {
                return None;
            }
            std::thread::sleep(std::time::Duration::from_micros(50));
        }
        None
    }
}

impl Drop for CollisionThread {
    fn drop(&mut self) {
        self.shutdown();
    }
}
