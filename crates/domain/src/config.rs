//! Configuration structures
//!
//! Plain data only; loading from the environment or a file lives in the infra
//! crate.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AUTHORITY_URL, DEFAULT_GRAPH_BASE_URL, DEFAULT_SCHEDULE,
    DEFAULT_SYNTHETIC_PER_MAILBOX,
};
use crate::impl_domain_option_conversions;
use crate::types::MailboxAddress;

/// Complete job configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfig {
    /// Mailboxes processed in this order on every run.
    pub mailboxes: Vec<MailboxAddress>,
    /// Address synthetic mail is sent from.
    pub sender: MailboxAddress,
    pub credentials: GraphCredentials,
    #[serde(default)]
    pub tasks: JobTasks,
    #[serde(default = "default_synthetic_per_mailbox")]
    pub synthetic_per_mailbox: usize,
    #[serde(default)]
    pub removal_policy: RemovalPolicy,
    #[serde(default = "default_schedule")]
    pub schedule: String,
    #[serde(default = "default_graph_base_url")]
    pub graph_base_url: String,
    #[serde(default = "default_authority_url")]
    pub authority_url: String,
}

impl JobConfig {
    /// Configuration with every optional field at its default.
    pub fn new(
        mailboxes: Vec<MailboxAddress>,
        sender: MailboxAddress,
        credentials: GraphCredentials,
    ) -> Self {
        Self {
            mailboxes,
            sender,
            credentials,
            tasks: JobTasks::default(),
            synthetic_per_mailbox: DEFAULT_SYNTHETIC_PER_MAILBOX,
            removal_policy: RemovalPolicy::default(),
            schedule: default_schedule(),
            graph_base_url: default_graph_base_url(),
            authority_url: default_authority_url(),
        }
    }
}

fn default_synthetic_per_mailbox() -> usize {
    DEFAULT_SYNTHETIC_PER_MAILBOX
}

fn default_schedule() -> String {
    DEFAULT_SCHEDULE.to_string()
}

fn default_graph_base_url() -> String {
    DEFAULT_GRAPH_BASE_URL.to_string()
}

fn default_authority_url() -> String {
    DEFAULT_AUTHORITY_URL.to_string()
}

/// App registration used for the client-credentials grant.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphCredentials {
    pub app_id: String,
    pub secret: String,
    pub tenant: String,
}

impl fmt::Debug for GraphCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphCredentials")
            .field("app_id", &self.app_id)
            .field("secret", &"<redacted>")
            .field("tenant", &self.tenant)
            .finish()
    }
}

/// What to do with an eligible message once its downstream action ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemovalPolicy {
    /// Remove every eligible message, even when the calendar action failed.
    #[default]
    Always,
    /// Remove only when the downstream action succeeded.
    OnSuccess,
}

impl_domain_option_conversions!(RemovalPolicy {
    Always => "always",
    OnSuccess => "on_success",
});

/// A unit of per-mailbox work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobTask {
    Generate,
    Process,
    Calendar,
}

impl_domain_option_conversions!(JobTask {
    Generate => "generate",
    Process => "process",
    Calendar => "calendar",
});

/// Which tasks run for each mailbox. Defaults to synthetic generation only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobTasks {
    #[serde(default)]
    pub generate: bool,
    #[serde(default)]
    pub process: bool,
    #[serde(default)]
    pub calendar: bool,
}

impl Default for JobTasks {
    fn default() -> Self {
        Self { generate: true, process: false, calendar: false }
    }
}

impl JobTasks {
    pub fn none() -> Self {
        Self { generate: false, process: false, calendar: false }
    }

    pub fn with(mut self, task: JobTask) -> Self {
        match task {
            JobTask::Generate => self.generate = true,
            JobTask::Process => self.process = true,
            JobTask::Calendar => self.calendar = true,
        }
        self
    }

    /// Parse a comma separated task list such as `"generate,process"`.
    ///
    /// # Errors
    /// Returns a message naming the first unknown task, or complaining when
    /// the list names no task at all.
    pub fn parse_list(list: &str) -> Result<Self, String> {
        let mut tasks = Self::none();
        for name in list.split(',').map(str::trim).filter(|name| !name.is_empty()) {
            tasks = tasks.with(name.parse::<JobTask>()?);
        }
        if tasks == Self::none() {
            return Err(format!("Invalid JobTasks: no task named in '{list}'"));
        }
        Ok(tasks)
    }
}
