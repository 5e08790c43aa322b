//! Per-mailbox processing and the run loop over all mailboxes

pub mod driver;
pub mod mailbox;
pub mod report;

pub use driver::JobDriver;
pub use mailbox::{Disposition, MailboxProcessor};
pub use report::{MailboxReport, MessageOutcome, RunSummary};
