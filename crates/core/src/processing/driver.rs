//! Job driver
//!
//! One scheduled run: walks the configured mailboxes in order and, for each,
//! sends the synthetic burst, drains the inbox and lists the calendar window,
//! depending on the enabled tasks. A mailbox is finished before the next one
//! starts. Nothing is checkpointed; the next run starts a fresh pass.

use std::sync::Arc;

use chrono::NaiveDateTime;
use mailcal_domain::constants::{
    CALENDAR_DAYS_AHEAD, CALENDAR_DAYS_BACK, DEFAULT_SYNTHETIC_PER_MAILBOX,
};
use mailcal_domain::{DateRangeFilter, JobConfig, JobTasks, MailboxAddress};
use tracing::{info, instrument, warn};

use super::mailbox::MailboxProcessor;
use super::report::RunSummary;
use crate::mail_ports::MailAndCalendarClient;
use crate::synthetic::SyntheticEmailGenerator;

/// Sequential per-mailbox job runner.
pub struct JobDriver {
    client: Arc<dyn MailAndCalendarClient>,
    generator: SyntheticEmailGenerator,
    processor: MailboxProcessor,
    tasks: JobTasks,
    synthetic_per_mailbox: usize,
}

impl JobDriver {
    /// Create a driver running the default tasks.
    pub fn new(client: Arc<dyn MailAndCalendarClient>, sender: MailboxAddress) -> Self {
        Self {
            processor: MailboxProcessor::new(client.clone()),
            generator: SyntheticEmailGenerator::new(sender),
            client,
            tasks: JobTasks::default(),
            synthetic_per_mailbox: DEFAULT_SYNTHETIC_PER_MAILBOX,
        }
    }

    /// Create a driver from a loaded configuration.
    pub fn from_config(client: Arc<dyn MailAndCalendarClient>, config: &JobConfig) -> Self {
        let processor =
            MailboxProcessor::new(client.clone()).with_removal_policy(config.removal_policy);
        Self::new(client, config.sender.clone())
            .with_processor(processor)
            .with_tasks(config.tasks)
            .with_synthetic_per_mailbox(config.synthetic_per_mailbox)
    }

    pub fn with_tasks(mut self, tasks: JobTasks) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn with_synthetic_per_mailbox(mut self, count: usize) -> Self {
        self.synthetic_per_mailbox = count;
        self
    }

    pub fn with_processor(mut self, processor: MailboxProcessor) -> Self {
        self.processor = processor;
        self
    }

    pub fn tasks(&self) -> JobTasks {
        self.tasks
    }

    /// Run every enabled task for each mailbox, in order.
    ///
    /// `now` anchors the synthetic appointment slots and the calendar window.
    #[instrument(skip(self, mailboxes), fields(mailbox_count = mailboxes.len()))]
    pub async fn run(&self, mailboxes: &[MailboxAddress], now: NaiveDateTime) -> RunSummary {
        info!(%now, "mailcal run");
        info!("Loop through mailboxes");

        let mut summary = RunSummary { mailboxes: mailboxes.len(), ..RunSummary::default() };

        for mailbox in mailboxes {
            if self.tasks.generate {
                self.send_synthetic(mailbox, now, &mut summary).await;
            }
            if self.tasks.process {
                summary.reports.push(self.processor.process(mailbox).await);
            }
            if self.tasks.calendar {
                summary.calendar_events_listed += self.list_calendar(mailbox, now).await;
            }
        }

        info!(
            mails_sent = summary.mails_sent,
            send_failures = summary.send_failures,
            appointments_created = summary.appointments_created(),
            messages_removed = summary.messages_removed(),
            "-- Done. --"
        );
        summary
    }

    async fn send_synthetic(
        &self,
        mailbox: &MailboxAddress,
        now: NaiveDateTime,
        summary: &mut RunSummary,
    ) {
        for _ in 0..self.synthetic_per_mailbox {
            let email = self.generator.generate(mailbox, now);
            match self.client.send_mail(&email, self.generator.sender()).await {
                Ok(()) => {
                    summary.mails_sent += 1;
                    info!(mailbox = %mailbox, subject = %email.subject, "Sent");
                }
                Err(err) => {
                    summary.send_failures += 1;
                    warn!(
                        mailbox = %mailbox,
                        subject = %email.subject,
                        error = %err,
                        kind = err.label(),
                        "failed to send synthetic mail"
                    );
                }
            }
        }
    }

    /// Log the subjects of events in the window around `now`; returns how
    /// many were listed.
    async fn list_calendar(&self, mailbox: &MailboxAddress, now: NaiveDateTime) -> usize {
        let range = DateRangeFilter::around(now, CALENDAR_DAYS_BACK, CALENDAR_DAYS_AHEAD);
        match self.client.list_calendar_events(mailbox, &range).await {
            Ok(events) => {
                for event in &events {
                    info!(mailbox = %mailbox, subject = %event.subject, "calendar event");
                }
                events.len()
            }
            Err(err) => {
                warn!(mailbox = %mailbox, error = %err, kind = err.label(), "failed to list calendar");
                0
            }
        }
    }
}
