//! # mailcal Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The mail and calendar service port
//! - Appointment building and synthetic mail generation
//! - Mailbox processing and the per-run job driver
//!
//! ## Architecture Principles
//! - Only depends on `mailcal-domain`
//! - No HTTP, environment or platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod appointments;
pub mod processing;
pub mod synthetic;

// Infrastructure ports
pub mod mail_ports;

pub use appointments::{AppointmentBuilder, AppointmentError};
pub use mail_ports::MailAndCalendarClient;
pub use processing::{
    Disposition, JobDriver, MailboxProcessor, MailboxReport, MessageOutcome, RunSummary,
};
pub use synthetic::SyntheticEmailGenerator;
