//! Configuration loader
//!
//! Loads the job configuration from environment variables or a TOML file.
//!
//! ## Loading Strategy
//! 1. An explicit path always wins; the environment is not consulted
//! 2. When every required environment variable is set, the environment is
//!    the only source; invalid values are reported, never papered over
//! 3. Otherwise the first probed TOML location that exists is loaded
//!
//! ## Environment Variables
//! Required:
//! - `Inbox`: mailboxes to process, separated by `;`
//! - `SenderEMail`: address synthetic mail is sent from
//! - `AppID`, `Secret`, `Tenant`: app registration for Graph
//!
//! Optional:
//! - `JobTasks`: comma separated subset of `generate,process,calendar`
//! - `SyntheticPerMailbox`: mails generated per mailbox and run
//! - `RemovalPolicy`: `always` or `on_success`
//! - `Schedule`: six-field cron expression
//! - `GraphBaseUrl`, `AuthorityUrl`: endpoint overrides
//!
//! ## File Locations
//! 1. `./mailcal.toml`
//! 2. `../mailcal.toml`
//! 3. `mailcal.toml` next to the executable

use std::path::{Path, PathBuf};

use mailcal_domain::{
    GraphCredentials, JobConfig, JobTasks, MailCalError, MailboxAddress, RemovalPolicy, Result,
};

const CONFIG_FILE_NAME: &str = "mailcal.toml";

const REQUIRED_VARS: [&str; 5] = ["Inbox", "SenderEMail", "AppID", "Secret", "Tenant"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `MailCalError::Config` if neither source yields a complete,
/// valid configuration.
pub fn load(path: Option<PathBuf>) -> Result<JobConfig> {
    load_with(path, |key| std::env::var(key).ok())
}

fn load_with<F>(path: Option<PathBuf>, lookup: F) -> Result<JobConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = path {
        if REQUIRED_VARS.iter().any(|&key| lookup(key).is_some()) {
            tracing::info!(path = %path.display(), "Explicit config file given; ignoring environment");
        }
        return load_from_file(Some(path));
    }

    let env_error = match load_from_lookup(&lookup) {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            return Ok(config);
        }
        Err(err) => err,
    };

    if REQUIRED_VARS.iter().all(|&key| lookup(key).is_some()) {
        return Err(env_error);
    }
    tracing::debug!(error = %env_error, "Environment incomplete, trying config file");

    match probe_config_paths() {
        Some(found) => load_from_file(Some(found)),
        None => Err(env_error),
    }
}

/// Load configuration from an arbitrary key lookup.
///
/// # Errors
/// Returns `MailCalError::Config` if required keys are missing or any value
/// is invalid.
pub fn load_from_lookup<F>(lookup: F) -> Result<JobConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let required = |key: &str| {
        lookup(key).ok_or_else(|| {
            MailCalError::Config(format!("Missing required environment variable: {key}"))
        })
    };

    let mailboxes = MailboxAddress::parse_list(&required("Inbox")?);
    let sender = MailboxAddress::new(required("SenderEMail")?)
        .map_err(|err| MailCalError::Config(format!("Invalid SenderEMail: {err}")))?;
    let credentials = GraphCredentials {
        app_id: required("AppID")?,
        secret: required("Secret")?,
        tenant: required("Tenant")?,
    };

    let mut config = JobConfig::new(mailboxes, sender, credentials);

    if let Some(tasks) = lookup("JobTasks") {
        config.tasks = JobTasks::parse_list(&tasks).map_err(MailCalError::Config)?;
    }
    if let Some(count) = lookup("SyntheticPerMailbox") {
        config.synthetic_per_mailbox = count.trim().parse::<usize>().map_err(|err| {
            MailCalError::Config(format!("Invalid SyntheticPerMailbox '{count}': {err}"))
        })?;
    }
    if let Some(policy) = lookup("RemovalPolicy") {
        config.removal_policy = policy.parse::<RemovalPolicy>().map_err(MailCalError::Config)?;
    }
    if let Some(schedule) = lookup("Schedule") {
        config.schedule = schedule.trim().to_string();
    }
    if let Some(url) = lookup("GraphBaseUrl") {
        config.graph_base_url = url.trim().to_string();
    }
    if let Some(url) = lookup("AuthorityUrl") {
        config.authority_url = url.trim().to_string();
    }

    validate(config)
}

/// Load configuration from a TOML file
///
/// If `path` is `None`, probes the standard locations.
///
/// # Errors
/// Returns `MailCalError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<JobConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(MailCalError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            MailCalError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| MailCalError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<JobConfig> {
    let config: JobConfig = toml::from_str(contents).map_err(|e| {
        MailCalError::Config(format!("Invalid TOML in {}: {e}", path.display()))
    })?;
    validate(config)
}

/// Probe the standard locations for a config file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.push(cwd.join(CONFIG_FILE_NAME));
        candidates.push(cwd.join("..").join(CONFIG_FILE_NAME));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.push(exe_dir.join(CONFIG_FILE_NAME));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn validate(config: JobConfig) -> Result<JobConfig> {
    if config.mailboxes.is_empty() {
        return Err(MailCalError::Config("No mailboxes configured".into()));
    }
    if config.credentials.app_id.trim().is_empty() || config.credentials.tenant.trim().is_empty() {
        return Err(MailCalError::Config("AppID and Tenant must not be empty".into()));
    }
    Ok(config)
}
