//! Scheduler error types

use std::time::Duration;

use mailcal_domain::MailCalError;
use thiserror::Error;

use crate::errors::InfraError;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Scheduler is already running
    #[error("Scheduler already running")]
    AlreadyRunning,

    /// Scheduler is not running
    #[error("Scheduler not running")]
    NotRunning,

    /// Failed to create scheduler
    #[error("Failed to create scheduler: {0}")]
    CreationFailed(String),

    /// Failed to register job, usually an invalid cron expression
    #[error("Failed to register job '{cron}': {reason}")]
    JobRegistrationFailed { cron: String, reason: String },

    /// Failed to start scheduler
    #[error("Failed to start scheduler: {0}")]
    StartFailed(String),

    /// Failed to stop scheduler
    #[error("Failed to stop scheduler: {0}")]
    StopFailed(String),

    /// Operation timed out
    #[error("{operation} timed out after {duration:?}")]
    Timeout { operation: &'static str, duration: Duration },

    /// Task join failed
    #[error("Task join failed: {0}")]
    TaskJoinFailed(String),
}

impl From<SchedulerError> for InfraError {
    fn from(err: SchedulerError) -> Self {
        let mapped = match err {
            SchedulerError::AlreadyRunning | SchedulerError::NotRunning => {
                MailCalError::InvalidInput(err.to_string())
            }
            SchedulerError::JobRegistrationFailed { .. } => MailCalError::Config(err.to_string()),
            _ => MailCalError::Internal(err.to_string()),
        };
        InfraError(mapped)
    }
}

impl From<SchedulerError> for MailCalError {
    fn from(err: SchedulerError) -> Self {
        InfraError::from(err).into()
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
