//! Dispatcher - a host-owned queue of jobs that run against the world between ticks
//!
//! Other threads hold a [`DispatchHandle`] and only ever enqueue. The host loop owns the
//! [`Dispatcher`] and calls `drain` at a point where no tick is borrowing the world.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::command::growth::Command;
use crate::core::error::{FlockError, Result};
use crate::world::World;

/// A unit of deferred work
pub type Job = Box<dyn FnOnce(&mut World) + Send + 'static>;

struct Shared {
    queue: Mutex<VecDeque<Job>>,
    running: AtomicBool,
}

impl Shared {
    fn queue(&self) -> MutexGuard<'_, VecDeque<Job>> {
        // A job panicking mid-push cannot leave the deque half-written
        self.queue.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn enqueue(&self, job: Job) -> Result<()> {
        if !self.running.load(Ordering::Acquire) {
            tracing::warn!("Dispatcher stopped, rejecting job");
            return Err(FlockError::DispatcherStopped);
        }
        self.queue().push_back(job);
        Ok(())
    }
}

/// Cloneable, thread-safe enqueue side of a [`Dispatcher`]
#[derive(Clone)]
pub struct DispatchHandle {
    shared: Arc<Shared>,
}

impl DispatchHandle {
    pub fn enqueue<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce(&mut World) + Send + 'static,
    {
        self.shared.enqueue(Box::new(job))
    }

    pub fn enqueue_command(&self, command: Command) -> Result<()> {
        self.enqueue(move |world| command.run(world))
    }
}

/// FIFO executor drained once per host frame
pub struct Dispatcher {
    shared: Arc<Shared>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                queue: Mutex::new(VecDeque::new()),
                running: AtomicBool::new(true),
            }),
        }
    }

    pub fn handle(&self) -> DispatchHandle {
        DispatchHandle {
            shared: Arc::clone(&self.shared),
        }
    }

    pub fn enqueue<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce(&mut World) + Send + 'static,
    {
        self.shared.enqueue(Box::new(job))
    }

    pub fn enqueue_command(&self, command: Command) -> Result<()> {
        self.handle().enqueue_command(command)
    }

    /// Run every queued job in FIFO order; returns how many ran.
    ///
    /// The queue is taken out before any job runs, so jobs enqueued while draining
    /// wait for the next drain and the lock is never held across a job.
    pub fn drain(&self, world: &mut World) -> usize {
        let jobs = std::mem::take(&mut *self.shared.queue());
        let count = jobs.len();
        for job in jobs {
            job(world);
        }
        if count > 0 {
            tracing::debug!("Dispatcher drained {} jobs", count);
        }
        count
    }

    /// Reject further enqueues; already queued jobs still run on the next drain
    pub fn stop(&self) {
        self.shared.running.store(false, Ordering::Release);
        tracing::info!("Dispatcher stopped with {} pending jobs", self.pending());
    }

    pub fn start(&self) {
        self.shared.running.store(true, Ordering::Release);
    }

    pub fn is_running(&self) -> bool {
        self.shared.running.load(Ordering::Acquire)
    }

    pub fn pending(&self) -> usize {
        self.shared.queue().len()
    }
}
