//! Deferred world mutation
//!
//! Growth requests are queued as jobs and applied between ticks:
//! Command -> DispatchHandle::enqueue_command -> Dispatcher::drain -> World::add_agents

pub mod dispatcher;
pub mod growth;

pub use dispatcher::{DispatchHandle, Dispatcher, Job};
pub use growth::Command;
