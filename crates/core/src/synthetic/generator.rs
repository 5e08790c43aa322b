//! Synthetic appointment mail generator
//!
//! Produces demo messages in exactly the shape the appointment builder reads
//! back: an `ID:<n>` subject and a body whose first two lines are the start
//! and end of a one-hour slot `n` hours from now.

use chrono::{Duration, NaiveDateTime};
use mailcal_domain::constants::{
    SYNTHETIC_ID_MAX_EXCLUSIVE, SYNTHETIC_ID_MIN, SYNTHETIC_LINE_BREAK, SYNTHETIC_SUBJECT_SUFFIX,
};
use mailcal_domain::{format_date_line, MailboxAddress, SyntheticEmail};
use rand::Rng;

/// Generates synthetic appointment mails sent from a fixed sender.
#[derive(Debug, Clone)]
pub struct SyntheticEmailGenerator {
    sender: MailboxAddress,
}

impl SyntheticEmailGenerator {
    pub fn new(sender: MailboxAddress) -> Self {
        Self { sender }
    }

    pub fn sender(&self) -> &MailboxAddress {
        &self.sender
    }

    /// Generate one mail for `target` with a fresh random identifier.
    ///
    /// Identifiers are drawn independently on every call; two mails may share
    /// one.
    pub fn generate(&self, target: &MailboxAddress, now: NaiveDateTime) -> SyntheticEmail {
        self.generate_with_rng(target, now, &mut rand::thread_rng())
    }

    /// Same as [`generate`](Self::generate) with a caller supplied RNG.
    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        target: &MailboxAddress,
        now: NaiveDateTime,
        rng: &mut R,
    ) -> SyntheticEmail {
        let identifier = rng.gen_range(SYNTHETIC_ID_MIN..SYNTHETIC_ID_MAX_EXCLUSIVE);
        self.compose(target, identifier, now)
    }

    /// Compose the mail for a given identifier.
    pub fn compose(
        &self,
        target: &MailboxAddress,
        identifier: u32,
        now: NaiveDateTime,
    ) -> SyntheticEmail {
        let start = now + Duration::hours(i64::from(identifier));
        let end = start + Duration::hours(1);
        let br = SYNTHETIC_LINE_BREAK;

        let body = format!(
            "{start}{br}{end}{br}This is a generated seminar entry with ID:{identifier} sent by the mailcal job.{br}",
            start = format_date_line(&start),
            end = format_date_line(&end),
        );

        SyntheticEmail {
            to: target.clone(),
            from: self.sender.clone(),
            subject: format!("ID:{identifier}{SYNTHETIC_SUBJECT_SUFFIX}"),
            body,
            identifier,
        }
    }
}
