//! Cron scheduler for job runs.
//!
//! Fires [`JobDriver::run`] over the configured mailboxes on a cron schedule.
//! Join handles are tracked, cancellation is explicit, and every asynchronous
//! lifecycle operation is wrapped in a timeout. A tick that fires while the
//! previous run is still going is skipped.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::NaiveDateTime;
use mailcal_core::JobDriver;
use mailcal_domain::MailboxAddress;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Source of the "now" each run is anchored to.
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

/// Configuration for the run scheduler.
#[derive(Debug, Clone)]
pub struct RunSchedulerConfig {
    /// Six-field cron expression (seconds first).
    pub cron_expression: String,
    /// Upper bound for a single run.
    pub job_timeout: Duration,
    /// Timeout for starting the underlying scheduler.
    pub start_timeout: Duration,
    /// Timeout for stopping the scheduler.
    pub stop_timeout: Duration,
    /// Timeout for awaiting the monitor task join handle.
    pub join_timeout: Duration,
}

impl Default for RunSchedulerConfig {
    fn default() -> Self {
        Self {
            cron_expression: mailcal_domain::constants::DEFAULT_SCHEDULE.into(),
            job_timeout: Duration::from_secs(240),
            start_timeout: Duration::from_secs(5),
            stop_timeout: Duration::from_secs(5),
            join_timeout: Duration::from_secs(5),
        }
    }
}

/// Periodic job runner with explicit lifecycle management.
pub struct RunScheduler {
    scheduler: Option<JobScheduler>,
    config: RunSchedulerConfig,
    monitor_handle: Option<JoinHandle<()>>,
    cancellation: CancellationToken,
    driver: Arc<JobDriver>,
    mailboxes: Arc<Vec<MailboxAddress>>,
    clock: Clock,
    in_flight: Arc<Mutex<()>>,
}

impl RunScheduler {
    pub fn new(
        config: RunSchedulerConfig,
        driver: Arc<JobDriver>,
        mailboxes: Vec<MailboxAddress>,
        clock: Clock,
    ) -> Self {
        Self {
            scheduler: None,
            config,
            monitor_handle: None,
            cancellation: CancellationToken::new(),
            driver,
            mailboxes: Arc::new(mailboxes),
            clock,
            in_flight: Arc::new(Mutex::new(())),
        }
    }

    /// Start the scheduler, spawning the monitoring task.
    #[instrument(skip(self), fields(cron = %self.config.cron_expression))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.is_running() {
            return Err(SchedulerError::AlreadyRunning);
        }

        self.cancellation = CancellationToken::new();

        let scheduler_instance = self.build_scheduler().await?;
        let start_timeout = self.config.start_timeout;

        tokio::time::timeout(start_timeout, scheduler_instance.start())
            .await
            .map_err(|_| SchedulerError::Timeout { operation: "start", duration: start_timeout })?
            .map_err(|err| SchedulerError::StartFailed(err.to_string()))?;

        self.scheduler = Some(scheduler_instance);

        let cancel = self.cancellation.clone();
        self.monitor_handle = Some(tokio::spawn(async move {
            cancel.cancelled().await;
            debug!("Run scheduler monitor cancelled");
        }));

        info!(mailboxes = self.mailboxes.len(), "Run scheduler started");
        Ok(())
    }

    /// Stop the scheduler and wait for the monitor task to finish.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        let Some(mut scheduler) = self.scheduler.take() else {
            return Err(SchedulerError::NotRunning);
        };

        self.cancellation.cancel();

        let stop_timeout = self.config.stop_timeout;
        tokio::time::timeout(stop_timeout, scheduler.shutdown())
            .await
            .map_err(|_| SchedulerError::Timeout { operation: "stop", duration: stop_timeout })?
            .map_err(|err| SchedulerError::StopFailed(err.to_string()))?;

        if let Some(handle) = self.monitor_handle.take() {
            let join_timeout = self.config.join_timeout;
            tokio::time::timeout(join_timeout, handle)
                .await
                .map_err(|_| SchedulerError::Timeout { operation: "join", duration: join_timeout })?
                .map_err(|err| SchedulerError::TaskJoinFailed(err.to_string()))?;
        }

        info!("Run scheduler stopped");
        Ok(())
    }

    /// Returns true when a scheduler instance is active.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_some()
    }

    async fn build_scheduler(&self) -> SchedulerResult<JobScheduler> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|err| SchedulerError::CreationFailed(err.to_string()))?;

        let cron = self.config.cron_expression.clone();
        let driver = self.driver.clone();
        let mailboxes = self.mailboxes.clone();
        let clock = self.clock.clone();
        let in_flight = self.in_flight.clone();
        let cancel = self.cancellation.clone();
        let job_timeout = self.config.job_timeout;

        let job = Job::new_async(cron.as_str(), move |_id, _lock| {
            let driver = driver.clone();
            let mailboxes = mailboxes.clone();
            let clock = clock.clone();
            let in_flight = in_flight.clone();
            let cancel = cancel.clone();

            Box::pin(async move {
                let Ok(_guard) = in_flight.try_lock() else {
                    warn!("previous run still in progress; skipping this tick");
                    return;
                };
                if cancel.is_cancelled() {
                    return;
                }

                let started = Instant::now();
                let run = driver.run(&mailboxes, clock());

                tokio::select! {
                    _ = cancel.cancelled() => {
                        warn!("run cancelled by scheduler shutdown");
                    }
                    outcome = tokio::time::timeout(job_timeout, run) => match outcome {
                        Ok(summary) => debug!(
                            elapsed_ms = started.elapsed().as_millis() as u64,
                            mails_sent = summary.mails_sent,
                            "scheduled run finished"
                        ),
                        Err(_) => warn!(timeout_secs = job_timeout.as_secs(), "scheduled run timed out"),
                    },
                }
            })
        })
        .map_err(|err| SchedulerError::JobRegistrationFailed { cron: cron.clone(), reason: err.to_string() })?;

        let job_id = scheduler.add(job).await.map_err(|err| {
            SchedulerError::JobRegistrationFailed { cron: cron.clone(), reason: err.to_string() }
        })?;

        debug!(cron = %cron, job_id = %job_id, "Registered job run");
        Ok(scheduler)
    }
}

impl Drop for RunScheduler {
    fn drop(&mut self) {
        if self.is_running() {
            warn!("RunScheduler dropped while running; cancelling tasks");
            self.cancellation.cancel();
        }
    }
}
