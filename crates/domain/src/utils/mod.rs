//! Parsing helpers for message subjects and body date lines

pub mod date_line;
pub mod subject;
