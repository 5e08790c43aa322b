//! Mailbox and message types

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::MAILBOX_LIST_SEPARATOR;
use crate::errors::{MailCalError, Result};

/// A remote mailbox, addressed by its email address.
///
/// Deserialization goes through [`MailboxAddress::new`], so config files get
/// the same trimming and emptiness check as the environment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MailboxAddress(String);

impl MailboxAddress {
    /// Build an address, trimming surrounding whitespace.
    ///
    /// # Errors
    /// Returns `MailCalError::InvalidInput` when the trimmed value is empty.
    pub fn new(address: impl AsRef<str>) -> Result<Self> {
        let trimmed = address.as_ref().trim();
        if trimmed.is_empty() {
            return Err(MailCalError::InvalidInput("mailbox address is empty".into()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Split a semicolon separated list, keeping the given order and
    /// dropping blank entries (`"a@x.com; ;b@x.com;"` yields two mailboxes).
    pub fn parse_list(list: &str) -> Vec<Self> {
        list.split(MAILBOX_LIST_SEPARATOR).filter_map(|entry| Self::new(entry).ok()).collect()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for MailboxAddress {
    type Error = MailCalError;

    fn try_from(address: String) -> Result<Self> {
        Self::new(address)
    }
}

impl From<MailboxAddress> for String {
    fn from(address: MailboxAddress) -> Self {
        address.0
    }
}

impl fmt::Display for MailboxAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A message read from a mailbox inbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Opaque identifier used to delete the message remotely.
    pub id: String,
    pub subject: String,
    /// Body text; lines are separated by carriage returns.
    pub body: String,
    pub sent_at: Option<DateTime<Utc>>,
}

impl InboundMessage {
    pub fn new(id: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self { id: id.into(), subject: subject.into(), body: body.into(), sent_at: None }
    }

    pub fn with_sent_at(mut self, sent_at: DateTime<Utc>) -> Self {
        self.sent_at = Some(sent_at);
        self
    }
}

/// A generated demo message, ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntheticEmail {
    pub to: MailboxAddress,
    pub from: MailboxAddress,
    pub subject: String,
    pub body: String,
    pub identifier: u32,
}
