//! Daily job scheduler.
//!
//! Polls at a fixed interval and runs due jobs one at a time on the polling
//! task, so two jobs never write output files concurrently. Jobs that come
//! due in the same tick run back to back in schedule order; a run that
//! overruns later ticks is followed by exactly one run at the job's next
//! daily slot, with no catch-up backlog.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, NaiveDateTime, NaiveTime};
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::clock::Clock;
use crate::config::JobSpec;
use crate::error::{ConfigError, JobError};
use crate::models::ScrapeOutcome;
use crate::pipeline::Orchestrator;
use crate::storage::OutputNames;

/// Executes one scheduled job
#[async_trait]
pub trait JobRunner: Send + Sync {
    async fn run(&self, job: &JobSpec) -> ScrapeOutcome;
}

#[async_trait]
impl JobRunner for Orchestrator {
    async fn run(&self, job: &JobSpec) -> ScrapeOutcome {
        self.scrape_and_save(&job.url, &OutputNames::default()).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Idle,
    Due,
    Running,
}

#[derive(Debug, Clone)]
struct ScheduledJob {
    spec: JobSpec,
    at: NaiveTime,
    next_run: NaiveDateTime,
    state: JobState,
}

/// First occurrence of `at` strictly after `after`
fn next_occurrence(at: NaiveTime, after: NaiveDateTime) -> NaiveDateTime {
    let today = after.date().and_time(at);
    if today > after {
        today
    } else {
        today + ChronoDuration::days(1)
    }
}

pub struct Scheduler {
    jobs: Vec<ScheduledJob>,
    runner: Arc<dyn JobRunner>,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
}

impl Scheduler {
    /// Register every enabled job; disabled jobs are skipped for good
    pub fn new(
        specs: &[JobSpec],
        runner: Arc<dyn JobRunner>,
        clock: Arc<dyn Clock>,
        poll_interval: Duration,
    ) -> Result<Self, ConfigError> {
        let now = clock.now();
        let mut jobs = Vec::new();

        for spec in specs {
            if !spec.enabled {
                info!("⏭️  Skipped:   {:<25} (disabled)", spec.name);
                continue;
            }
            let at = spec.time_of_day()?;
            let next_run = next_occurrence(at, now);
            info!("✅ Scheduled: {:<25} at {} (next run {})", spec.name, spec.time, next_run);
            jobs.push(ScheduledJob {
                spec: spec.clone(),
                at,
                next_run,
                state: JobState::Idle,
            });
        }

        info!("📊 Total jobs scheduled: {}", jobs.len());
        Ok(Self {
            jobs,
            runner,
            clock,
            poll_interval,
        })
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    pub fn next_run(&self, name: &str) -> Option<NaiveDateTime> {
        self.jobs.iter().find(|j| j.spec.name == name).map(|j| j.next_run)
    }

    pub fn state(&self, name: &str) -> Option<JobState> {
        self.jobs.iter().find(|j| j.spec.name == name).map(|j| j.state)
    }

    /// Run every job that is due now, sequentially. Returns how many ran.
    pub async fn run_pending(&mut self) -> usize {
        let now = self.clock.now();

        let mut due: Vec<usize> = Vec::new();
        for (index, job) in self.jobs.iter_mut().enumerate() {
            if job.next_run <= now {
                job.state = JobState::Due;
                due.push(index);
            }
        }
        due.sort_by_key(|&index| (self.jobs[index].next_run, index));

        for &index in &due {
            self.jobs[index].state = JobState::Running;
            let spec = self.jobs[index].spec.clone();

            if let Err(e) = self.execute(&spec).await {
                error!("❌ {}", e);
            }

            let finished = self.clock.now();
            let job = &mut self.jobs[index];
            job.next_run = next_occurrence(job.at, finished);
            job.state = JobState::Idle;
            info!("Next run of '{}' at {}", job.spec.name, job.next_run);
        }

        due.len()
    }

    /// One job, with failures and panics contained
    async fn execute(&self, spec: &JobSpec) -> Result<ScrapeOutcome, JobError> {
        info!("⏰ SCHEDULED JOB STARTED: {} ({})", spec.name, spec.url);

        let outcome = AssertUnwindSafe(self.runner.run(spec))
            .catch_unwind()
            .await
            .map_err(|panic| JobError::Panicked {
                job: spec.name.clone(),
                message: panic_message(panic.as_ref()),
            })?;

        if !outcome.success {
            return Err(JobError::Failed {
                job: spec.name.clone(),
                message: outcome.message,
            });
        }

        info!("✅ Job '{}' completed: scraped {} products", spec.name, outcome.count);
        Ok(outcome)
    }

    /// Poll until `shutdown` resolves. A job already running when the signal
    /// arrives completes normally before the loop exits.
    pub async fn run_until<F>(&mut self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut interval = tokio::time::interval(self.poll_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        info!("🚀 Scheduler is running, polling every {:?}", self.poll_interval);
        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown => {
                    info!("🛑 Scheduler stopped");
                    break;
                }
                _ = interval.tick() => {
                    self.run_pending().await;
                }
            }
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        warn!("Job panicked with a non-string payload");
        "unknown panic".to_string()
    }
}

/// Resolves on Ctrl+C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("received shutdown signal, stopping scheduler");
}
