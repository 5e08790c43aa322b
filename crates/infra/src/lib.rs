//! # mailcal Infrastructure
//!
//! Infrastructure implementations of core ports.
//!
//! This crate contains:
//! - The Microsoft Graph adapter for `MailAndCalendarClient`
//! - HTTP client with retry support
//! - Configuration loading (environment and TOML)
//! - Cron scheduling of job runs
//!
//! ## Architecture
//! - Implements traits defined in `mailcal-core`
//! - Contains all "impure" code (HTTP, environment, files, timers)

pub mod config;
pub mod errors;
pub mod graph;
pub mod http;
pub mod scheduling;

// Re-export commonly used items
pub use errors::InfraError;
pub use graph::{ClientCredentialsTokenProvider, GraphMailClient, TokenProvider};
pub use http::{HttpClient, HttpClientBuilder};
pub use scheduling::{RunScheduler, RunSchedulerConfig, SchedulerError, SchedulerResult};
