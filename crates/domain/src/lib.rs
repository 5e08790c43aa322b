//! # mailcal Domain
//!
//! Domain types and rules for the mailbox appointment job.
//!
//! This crate contains:
//! - Message, mailbox and calendar event types
//! - Domain error types and Result definitions
//! - Configuration structures
//! - Date line and subject parsing
//!
//! ## Architecture
//! - No dependencies on other mailcal crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::date_line::{format_date_line, parse_date_line, parse_date_pair, DateParseError};
pub use utils::subject::ParsedSubject;
