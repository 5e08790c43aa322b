//! Mailbox processor
//!
//! Drains appointment mails from one inbox:
//!
//! 1. Fetch every inbox message.
//! 2. Classify each by subject: no identifier marker means ignored and left
//!    in place; otherwise a deletion request or an appointment request.
//! 3. Appointment requests go through the [`AppointmentBuilder`]; a built
//!    event is submitted to the calendar.
//! 4. Every eligible message is removed from the inbox afterwards. Under
//!    [`RemovalPolicy::Always`] that happens even when the calendar action
//!    failed; under [`RemovalPolicy::OnSuccess`] only when it succeeded.
//!
//! Remote failures are logged and counted, never propagated.

use std::sync::Arc;

use mailcal_domain::{InboundMessage, MailboxAddress, ParsedSubject, RemovalPolicy};
use tracing::{debug, info, instrument, warn};

use super::report::{MailboxReport, MessageOutcome};
use crate::appointments::AppointmentBuilder;
use crate::mail_ports::MailAndCalendarClient;

/// What the subject asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    /// No identifier marker; the message stays in the inbox.
    Ignored,
    /// `delete ... id:<n>`; calendar deletion is not wired up yet.
    DeletionRequested { identifier: u64 },
    /// Any other subject with an identifier marker.
    AppointmentRequested { identifier: u64 },
}

impl Disposition {
    /// Classify a message by its subject.
    pub fn classify(message: &InboundMessage) -> Self {
        match ParsedSubject::parse(&message.subject) {
            None => Self::Ignored,
            Some(parsed) if parsed.is_delete_request => {
                Self::DeletionRequested { identifier: parsed.identifier }
            }
            Some(parsed) => Self::AppointmentRequested { identifier: parsed.identifier },
        }
    }

    pub fn is_eligible(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Processes appointment mails for one mailbox at a time.
pub struct MailboxProcessor {
    client: Arc<dyn MailAndCalendarClient>,
    builder: AppointmentBuilder,
    removal_policy: RemovalPolicy,
}

impl MailboxProcessor {
    /// Create a processor with the default builder and removal policy.
    pub fn new(client: Arc<dyn MailAndCalendarClient>) -> Self {
        Self { client, builder: AppointmentBuilder::new(), removal_policy: RemovalPolicy::default() }
    }

    pub fn with_removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.removal_policy = policy;
        self
    }

    pub fn removal_policy(&self) -> RemovalPolicy {
        self.removal_policy
    }

    /// Process every message currently in the mailbox inbox.
    ///
    /// A failed inbox listing ends processing for this mailbox with an empty
    /// report flagged `list_failed`.
    #[instrument(skip(self), fields(mailbox = %mailbox))]
    pub async fn process(&self, mailbox: &MailboxAddress) -> MailboxReport {
        let mut report = MailboxReport::new(mailbox.clone());

        let messages = match self.client.list_inbox_messages(mailbox).await {
            Ok(messages) => messages,
            Err(err) => {
                warn!(error = %err, kind = err.label(), "failed to list inbox messages");
                report.list_failed = true;
                return report;
            }
        };

        report.fetched = messages.len();
        for message in &messages {
            let outcome = self.process_message(mailbox, message).await;
            report.record(&outcome);
        }

        info!(
            fetched = report.fetched,
            ignored = report.ignored,
            created = report.appointments_created,
            removed = report.removed,
            "mailbox processed"
        );
        report
    }

    /// Classify one message, run its calendar action and remove it.
    pub async fn process_message(
        &self,
        mailbox: &MailboxAddress,
        message: &InboundMessage,
    ) -> MessageOutcome {
        let sent_at = message.sent_at.map(|at| at.to_rfc3339()).unwrap_or_default();
        info!(sent_at = %sent_at, subject = %message.subject, "E-Mail");

        let disposition = Disposition::classify(message);
        let action_succeeded = match disposition {
            Disposition::Ignored => {
                debug!(message_id = %message.id, "no identifier marker; leaving message in inbox");
                return MessageOutcome::ignored();
            }
            Disposition::DeletionRequested { identifier } => {
                debug!(identifier, "calendar deletion requested; no calendar action taken");
                true
            }
            Disposition::AppointmentRequested { .. } => {
                self.add_appointment(mailbox, message).await
            }
        };

        let removed = if self.should_remove(action_succeeded) {
            Some(self.remove_message(mailbox, message).await)
        } else {
            info!(message_id = %message.id, "keeping message after failed calendar action");
            None
        };

        MessageOutcome { disposition, action_succeeded, removed }
    }

    /// Build and submit the appointment; true only when an event was created.
    async fn add_appointment(&self, mailbox: &MailboxAddress, message: &InboundMessage) -> bool {
        let Some(event) = self.builder.build(message) else {
            return false;
        };

        match self.client.create_calendar_event(&event, mailbox).await {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    error = %err,
                    kind = err.label(),
                    subject = %event.subject,
                    "failed to create calendar event"
                );
                false
            }
        }
    }

    async fn remove_message(&self, mailbox: &MailboxAddress, message: &InboundMessage) -> bool {
        match self.client.delete_message(&message.id, mailbox).await {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    error = %err,
                    kind = err.label(),
                    message_id = %message.id,
                    "failed to remove processed message"
                );
                false
            }
        }
    }

    fn should_remove(&self, action_succeeded: bool) -> bool {
        match self.removal_policy {
            RemovalPolicy::Always => true,
            RemovalPolicy::OnSuccess => action_succeeded,
        }
    }
}
