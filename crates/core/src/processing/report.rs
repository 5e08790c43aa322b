//! Per-message, per-mailbox and per-run outcome records

use mailcal_domain::MailboxAddress;
use serde::Serialize;

use super::mailbox::Disposition;

/// Result of processing a single inbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageOutcome {
    pub disposition: Disposition,
    /// Whether the calendar action (if any) succeeded.
    pub action_succeeded: bool,
    /// `None` when removal was not attempted, otherwise whether it succeeded.
    pub removed: Option<bool>,
}

impl MessageOutcome {
    pub fn ignored() -> Self {
        Self { disposition: Disposition::Ignored, action_succeeded: false, removed: None }
    }
}

/// Counters for one mailbox pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailboxReport {
    pub mailbox: MailboxAddress,
    pub list_failed: bool,
    pub fetched: usize,
    pub ignored: usize,
    pub deletion_requests: usize,
    pub appointments_created: usize,
    pub appointment_failures: usize,
    pub removed: usize,
    pub removal_failures: usize,
    pub kept: usize,
}

impl MailboxReport {
    pub fn new(mailbox: MailboxAddress) -> Self {
        Self {
            mailbox,
            list_failed: false,
            fetched: 0,
            ignored: 0,
            deletion_requests: 0,
            appointments_created: 0,
            appointment_failures: 0,
            removed: 0,
            removal_failures: 0,
            kept: 0,
        }
    }

    pub fn record(&mut self, outcome: &MessageOutcome) {
        match outcome.disposition {
            Disposition::Ignored => {
                self.ignored += 1;
                return;
            }
            Disposition::DeletionRequested { .. } => self.deletion_requests += 1,
            Disposition::AppointmentRequested { .. } if outcome.action_succeeded => {
                self.appointments_created += 1;
            }
            Disposition::AppointmentRequested { .. } => self.appointment_failures += 1,
        }

        match outcome.removed {
            Some(true) => self.removed += 1,
            Some(false) => self.removal_failures += 1,
            None => self.kept += 1,
        }
    }
}

/// Aggregate of one full run over all configured mailboxes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub mailboxes: usize,
    pub mails_sent: usize,
    pub send_failures: usize,
    pub calendar_events_listed: usize,
    pub reports: Vec<MailboxReport>,
}

impl RunSummary {
    pub fn appointments_created(&self) -> usize {
        self.reports.iter().map(|report| report.appointments_created).sum()
    }

    pub fn messages_removed(&self) -> usize {
        self.reports.iter().map(|report| report.removed).sum()
    }
}
