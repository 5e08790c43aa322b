//! Scheduling infrastructure for periodic job runs
//!
//! Schedulers follow the same runtime rules:
//! - Explicit lifecycle management (start/stop)
//! - Join handles for spawned tasks
//! - Cancellation token support
//! - Timeout wrapping on all async operations

pub mod error;
pub mod run_scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use run_scheduler::{Clock, RunScheduler, RunSchedulerConfig};
