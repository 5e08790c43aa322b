//! Domain types and models
//!
//! Every value here lives for a single scheduled run; nothing is persisted.

pub mod calendar;
pub mod mail;

pub use calendar::{CalendarEvent, DatePair, DateRangeFilter, EventDateTime};
pub use mail::{InboundMessage, MailboxAddress, SyntheticEmail};
