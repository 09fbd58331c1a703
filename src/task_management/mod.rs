//! # Task Management System
//!
//! This module provides a small pool of worker threads for running work off the
//! calling thread and collecting the results back on it.
//!
//! ## Architecture Overview
//!
//! - `TaskManager`: owns the workers and routes tasks to them
//! - `Task`: a unit of work that runs on a worker and returns a value
//! - `TaskChannel`: the pair of channels connecting the manager to one worker
//!
//! Every worker has its own FIFO channel and processes it strictly in order.
//! Tasks are routed by a caller-supplied key (`key % workers`), so all tasks
//! published with the same key run one after another, in publication order,
//! while tasks with different keys can run in parallel.
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()`
//! 2. The worker owning the key's channel processes them in order
//! 3. Results are collected with `process_completed_tasks()` (non-blocking) or
//!    `wait_for_all()` (blocking until nothing is in flight)
//! 4. Dropping the manager closes every channel and joins the workers after
//!    they finish the tasks already sent to them

pub mod task;

use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::{error, info, warn};

pub use task::Task;

/// A communication channel between the manager and one worker thread.
struct TaskChannel<R> {
    /// `None` once the manager is shutting down, which ends the worker loop.
    task_sender: Option<Sender<Box<dyn Task<R>>>>,
    result_receiver: Receiver<R>,
    num_tasks_in_flight: usize,
    worker: Option<JoinHandle<()>>,
}

/// Manages a pool of worker threads and coordinates task execution.
pub struct TaskManager<R> {
    channels: Vec<TaskChannel<R>>,
    /// Results of tasks that had to be run on the calling thread because their
    /// worker was gone.
    completed_inline: Vec<R>,
}

impl<R: Send + 'static> TaskManager<R> {
    /// Creates a new `TaskManager` with `num_workers` worker threads (at least one).
    ///
    /// # Panics
    /// Panics if the operating system refuses to spawn a thread.
    pub fn new(num_workers: usize) -> Self {
        let num_workers = num_workers.max(1);
        let mut channels = Vec::with_capacity(num_workers);

        for worker_index in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task<R>>>();
            let (result_tx, result_rx) = channel::<R>();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            };

            let worker = thread::Builder::new()
                .name(format!("task-worker-{}", worker_index))
                .spawn(task_closure)
                .unwrap_or_else(|err| panic!("failed to spawn task worker: {}", err));

            channels.push(TaskChannel {
                task_sender: Some(task_tx),
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                worker: Some(worker),
            });
        }

        info!("Started {} task workers", num_workers);

        TaskManager {
            channels,
            completed_inline: Vec::new(),
        }
    }

    pub fn num_workers(&self) -> usize {
        self.channels.len()
    }

    /// Number of published tasks whose results have not been collected yet.
    pub fn in_flight(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.num_tasks_in_flight)
            .sum::<usize>()
            + self.completed_inline.len()
    }

    /// Publishes a task to the worker that owns `key`.
    ///
    /// Never blocks. Tasks sharing a key are processed in the order they were
    /// published.
    ///
    /// # Returns
    /// - `true` if the task was handed to its worker
    /// - `false` if that worker has died; the task was then run on the calling
    ///   thread and its result is returned by the next collection
    pub fn publish_task(&mut self, key: u64, task: Box<dyn Task<R>>) -> bool {
        let channel_idx = (key % self.channels.len() as u64) as usize;
        let channel = &mut self.channels[channel_idx];

        let task = match &channel.task_sender {
            Some(sender) => match sender.send(task) {
                Ok(()) => {
                    channel.num_tasks_in_flight += 1;
                    return true;
                }
                Err(err) => err.0,
            },
            None => task,
        };

        warn!("Task worker {} is gone, running task inline", channel_idx);
        self.completed_inline.push(task.process());
        false
    }

    /// Collects the results of every task that has finished, without blocking.
    pub fn process_completed_tasks(&mut self) -> Vec<R> {
        let mut results = std::mem::take(&mut self.completed_inline);
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                results.push(result);
            }
        }
        results
    }

    /// Blocks until every published task has finished and returns all results
    /// not collected before.
    pub fn wait_for_all(&mut self) -> Vec<R> {
        let mut results = std::mem::take(&mut self.completed_inline);
        for (channel_idx, channel) in self.channels.iter_mut().enumerate() {
            while channel.num_tasks_in_flight > 0 {
                match channel.result_receiver.recv() {
                    Ok(result) => {
                        channel.num_tasks_in_flight -= 1;
                        results.push(result);
                    }
                    Err(_) => {
                        error!(
                            "Task worker {} stopped with {} tasks in flight",
                            channel_idx, channel.num_tasks_in_flight
                        );
                        channel.num_tasks_in_flight = 0;
                        channel.task_sender = None;
                    }
                }
            }
        }
        results
    }
}

impl<R> Drop for TaskManager<R> {
    fn drop(&mut self) {
        for channel in &mut self.channels {
            channel.task_sender = None;
        }
        for channel in &mut self.channels {
            if let Some(worker) = channel.worker.take() {
                if worker.join().is_err() {
                    error!("A task worker panicked");
                }
            }
        }
    }
}
