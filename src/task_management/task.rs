//! # Task System Core Trait
//!
//! A `Task` is a unit of work executed on a worker thread of a `TaskManager`.
//! The value it returns is handed back to the thread that owns the manager.
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred to a worker
//! - A task owns all of its data; nothing is borrowed from the publishing thread

/// A unit of work that can be executed on a background worker.
///
/// Closures returning `R` are tasks too, which keeps one-off work short:
///
/// ```
/// use voxel_world::task_management::TaskManager;
///
/// let mut manager = TaskManager::new(2);
/// manager.publish_task(7, Box::new(|| 6 * 7));
/// assert_eq!(manager.wait_for_all(), vec![42]);
/// ```
pub trait Task<R>: Send {
    /// Performs the work. Runs on a worker thread, consuming the task.
    ///
    /// Errors are part of `R`: a task reports failure by returning it, never
    /// by panicking.
    fn process(self: Box<Self>) -> R;
}

impl<R, F> Task<R> for F
where
    F: FnOnce() -> R + Send,
{
    fn process(self: Box<Self>) -> R {
        (*self)()
    }
}
