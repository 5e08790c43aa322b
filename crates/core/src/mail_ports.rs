//! Mail and calendar service port
//!
//! The remote service (authentication, HTTP, retries, pagination) sits behind
//! this trait. Every operation is a network call that may fail; failures come
//! back as `Err` and the orchestrators decide whether to skip or continue.

use async_trait::async_trait;
use mailcal_domain::{
    CalendarEvent, DateRangeFilter, InboundMessage, MailboxAddress, Result, SyntheticEmail,
};

/// Trait for mailbox and calendar operations
#[async_trait]
pub trait MailAndCalendarClient: Send + Sync {
    /// Send a message on behalf of `from`
    async fn send_mail(&self, message: &SyntheticEmail, from: &MailboxAddress) -> Result<()>;

    /// Fetch every message currently in the mailbox inbox
    async fn list_inbox_messages(&self, mailbox: &MailboxAddress) -> Result<Vec<InboundMessage>>;

    /// Delete a message from the mailbox
    async fn delete_message(&self, message_id: &str, mailbox: &MailboxAddress) -> Result<()>;

    /// Create an event in the mailbox's default calendar
    async fn create_calendar_event(
        &self,
        event: &CalendarEvent,
        mailbox: &MailboxAddress,
    ) -> Result<()>;

    /// Delete an event from the mailbox's default calendar
    async fn delete_calendar_event(&self, event_id: &str, mailbox: &MailboxAddress)
        -> Result<()>;

    /// List calendar events falling inside the date window
    async fn list_calendar_events(
        &self,
        mailbox: &MailboxAddress,
        range: &DateRangeFilter,
    ) -> Result<Vec<CalendarEvent>>;
}
