//! `mailcal` entry point
//!
//! Loads configuration, wires the Graph client into the job driver and runs
//! it once or on the configured cron schedule until Ctrl-C.

mod logging;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use clap::Parser;
use mailcal_core::JobDriver;
use mailcal_domain::constants::EVENT_TIME_ZONE_IANA;
use mailcal_domain::JobTasks;
use mailcal_infra::scheduling::Clock;
use mailcal_infra::{config, GraphMailClient, RunScheduler, RunSchedulerConfig};
use tracing::{error, info};

use crate::logging::LogFormat;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Run a single pass and exit instead of following the schedule
    #[arg(long)]
    once: bool,

    /// TOML configuration used when the environment is incomplete
    #[arg(short, long, env = "MAILCAL_CONFIG")]
    config: Option<PathBuf>,

    /// Override the configured task list, e.g. `generate,process`
    #[arg(long, value_parser = JobTasks::parse_list)]
    tasks: Option<JobTasks>,

    /// Log output format: pretty or json
    #[arg(long, default_value = "pretty")]
    log_format: LogFormat,

    /// Print the run summary as JSON after a single pass
    #[arg(long, requires = "once")]
    summary: bool,
}

/// Zone the calendar events are written in.
fn event_zone() -> Result<Tz> {
    EVENT_TIME_ZONE_IANA
        .parse::<Tz>()
        .map_err(|err| anyhow!("unknown event time zone {EVENT_TIME_ZONE_IANA}: {err}"))
}

/// Wall-clock time in `zone`, without the offset.
fn local_now(zone: Tz) -> NaiveDateTime {
    Utc::now().with_timezone(&zone).naive_local()
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();
    logging::init(args.log_format)?;

    let mut job_config = config::load(args.config.clone()).context("loading configuration")?;
    if let Some(tasks) = args.tasks {
        job_config.tasks = tasks;
    }
    info!(
        mailboxes = job_config.mailboxes.len(),
        tasks = ?job_config.tasks,
        removal_policy = %job_config.removal_policy,
        "configuration loaded"
    );

    let zone = event_zone()?;
    let client = GraphMailClient::from_config(&job_config).context("building Graph client")?;
    let driver = JobDriver::from_config(Arc::new(client), &job_config);

    if args.once {
        let summary = driver.run(&job_config.mailboxes, local_now(zone)).await;
        if args.summary {
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        return Ok(());
    }

    let clock: Clock = Arc::new(move || local_now(zone));
    let scheduler_config = RunSchedulerConfig {
        cron_expression: job_config.schedule.clone(),
        ..RunSchedulerConfig::default()
    };
    let mut scheduler =
        RunScheduler::new(scheduler_config, Arc::new(driver), job_config.mailboxes.clone(), clock);

    scheduler.start().await.context("starting scheduler")?;
    info!(schedule = %job_config.schedule, "waiting for scheduled runs; Ctrl-C to stop");

    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(error = %err, "failed to listen for Ctrl-C");
    }

    scheduler.stop().await.context("stopping scheduler")?;
    Ok(())
}
