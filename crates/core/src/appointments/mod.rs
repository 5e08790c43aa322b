//! Turning inbound appointment mails into calendar events

pub mod builder;

pub use builder::{AppointmentBuilder, AppointmentError};
