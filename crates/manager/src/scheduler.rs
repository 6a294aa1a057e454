//! Cron scheduling for the renewal check.
//!
//! One scheduled-job slot with two guarantees: firings never overlap (a
//! firing that arrives while the previous job is still running is skipped),
//! and a panicking job never takes down the scheduler or the process — the
//! panic is logged and the next firing proceeds normally.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use cron::Schedule;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Errors raised while setting up the scheduler. Both are fatal at startup.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("cron expression cannot be empty")]
    EmptyExpression,

    #[error("invalid cron expression '{expression}': {source}")]
    InvalidExpression {
        expression: String,
        #[source]
        source: cron::error::Error,
    },
}

/// Handle to the running scheduler task.
pub struct Scheduler {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl Scheduler {
    /// Parse `expression` (six-field, seconds resolution) and start firing
    /// `job` on its schedule in a background task.
    pub fn start<F, Fut>(expression: &str, job: F) -> Result<Self, SchedulerError>
    where
        F: Fn() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        if expression.trim().is_empty() {
            return Err(SchedulerError::EmptyExpression);
        }
        let schedule: Schedule =
            expression
                .parse()
                .map_err(|source| SchedulerError::InvalidExpression {
                    expression: expression.to_string(),
                    source,
                })?;

        let (shutdown, receiver) = watch::channel(false);
        let task = tokio::spawn(run_loop(schedule, job, receiver));
        info!(expression, "cron scheduler started");
        Ok(Self { shutdown, task })
    }

    /// Signal shutdown and block until the in-flight job (if any) and the
    /// scheduler task have finished. An in-progress certbot invocation is
    /// never cancelled; it runs to completion.
    pub async fn stop(self) {
        info!("stopping cron scheduler");
        let _ = self.shutdown.send(true);
        if let Err(error) = self.task.await {
            error!(%error, "scheduler task failed during shutdown");
        }
        info!("cron scheduler stopped");
    }
}

async fn run_loop<F, Fut>(schedule: Schedule, job: F, mut shutdown: watch::Receiver<bool>)
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send + 'static,
{
    let mut in_flight: Option<JoinHandle<()>> = None;

    loop {
        let Some(next) = schedule.upcoming(Utc).next() else {
            warn!("cron schedule has no upcoming firings, scheduler idle");
            break;
        };
        let delay = (next - Utc::now()).to_std().unwrap_or(Duration::ZERO);

        tokio::select! {
            _ = tokio::time::sleep(delay) => {
                if let Some(handle) = &in_flight {
                    if !handle.is_finished() {
                        warn!("previous renewal check still running, skipping this firing");
                        continue;
                    }
                }
                if let Some(handle) = in_flight.take() {
                    reap(handle).await;
                }
                // The job runs in its own task so a panic surfaces as a
                // JoinError instead of unwinding through the scheduler.
                in_flight = Some(tokio::spawn(job()));
            }
            _ = shutdown.changed() => break,
        }
    }

    if let Some(handle) = in_flight.take() {
        reap(handle).await;
    }
}

async fn reap(handle: JoinHandle<()>) {
    if let Err(join_error) = handle.await {
        if join_error.is_panic() {
            error!(%join_error, "renewal job panicked; scheduler continues");
        }
    }
}
