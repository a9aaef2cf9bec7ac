//! Fixed-time daily scheduler driving the pipeline.
//!
//! The scheduler sleeps until the next configured fire time, runs the job,
//! and repeats. Time is read through the [`Clock`] trait so tests can drive
//! the loop without real wall-clock waits. No state is kept between
//! invocations: a restart near a fire time may miss or duplicate one run,
//! which is an accepted limitation of fixed-time scheduling.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{NaiveTime, Timelike};
use tokio::sync::watch;
use tracing::{error, info, instrument};

use crate::error::{NewswatchError, Result};
use crate::pipeline::RunSummary;

/// Time source and waiting mechanism, injectable for deterministic tests.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Current local time of day.
    fn now(&self) -> NaiveTime;

    /// Wait for the given duration.
    async fn sleep(&self, duration: Duration);
}

/// Wall-clock implementation used in production.
pub struct SystemClock;

#[async_trait]
impl Clock for SystemClock {
    fn now(&self) -> NaiveTime {
        chrono::Local::now().time()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Handle to request a running scheduler loop to stop.
///
/// A stop request interrupts a wait in progress, so the loop exits
/// promptly even when the next fire time is hours away. A job already
/// running finishes first.
#[derive(Clone)]
pub struct StopHandle {
    stop: watch::Sender<bool>,
}

impl StopHandle {
    pub fn stop(&self) {
        let _ = self.stop.send(true);
    }
}

/// Runs a job at fixed local times each day.
pub struct Scheduler {
    times: Vec<NaiveTime>,
    clock: Arc<dyn Clock>,
    stop_tx: watch::Sender<bool>,
    stop_rx: watch::Receiver<bool>,
}

impl Scheduler {
    /// Build a scheduler from `"HH:MM"` strings.
    pub fn new(times: &[String], clock: Arc<dyn Clock>) -> Result<Self> {
        if times.is_empty() {
            return Err(NewswatchError::schedule("no fire times configured"));
        }
        let mut parsed = Vec::with_capacity(times.len());
        for t in times {
            let time = NaiveTime::parse_from_str(t, "%H:%M").map_err(|e| {
                NewswatchError::schedule(format!("invalid fire time {t:?}: {e}"))
            })?;
            parsed.push(time);
        }
        parsed.sort();
        parsed.dedup();

        let (stop_tx, stop_rx) = watch::channel(false);
        Ok(Self {
            times: parsed,
            clock,
            stop_tx,
            stop_rx,
        })
    }

    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            stop: self.stop_tx.clone(),
        }
    }

    /// Duration from `now` until the next fire time, wrapping to the first
    /// time tomorrow when today's are all past. Always positive: a tick
    /// exactly at a fire time waits for the following one.
    fn until_next(&self, now: NaiveTime) -> Duration {
        let next_today = self.times.iter().find(|t| **t > now);
        let delta = match next_today {
            Some(t) => t.signed_duration_since(now),
            None => {
                let day = chrono::Duration::hours(24);
                day - now.signed_duration_since(self.times[0])
            }
        };
        delta.to_std().unwrap_or(Duration::ZERO)
    }

    /// Run `job` at each fire time until the stop handle fires. A stop
    /// request cuts a wait short; one received during a job takes effect
    /// as soon as the job returns.
    ///
    /// A job failure (for example the source page being unreachable) is
    /// logged and the loop continues; the only repetition mechanism is the
    /// next scheduled run.
    #[instrument(level = "info", skip_all, fields(times = ?self.times.iter().map(|t| format!("{:02}:{:02}", t.hour(), t.minute())).collect::<Vec<_>>()))]
    pub async fn run<F, Fut>(&self, mut job: F)
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<RunSummary>>,
    {
        let mut stop_rx = self.stop_rx.clone();
        info!("Scheduler started");
        loop {
            if *stop_rx.borrow() {
                break;
            }

            let wait = self.until_next(self.clock.now());
            info!(wait_secs = wait.as_secs(), "Sleeping until next fire time");
            tokio::select! {
                _ = self.clock.sleep(wait) => {}
                _ = stop_rx.changed() => {
                    continue;
                }
            }

            if *stop_rx.borrow() {
                break;
            }

            match job().await {
                Ok(summary) => {
                    info!(
                        scraped = summary.scraped,
                        matched = summary.matched,
                        attempted = summary.attempted,
                        accepted = summary.accepted,
                        "Scheduled run completed"
                    );
                }
                Err(e) => {
                    error!(error = %e, "Scheduled run aborted");
                }
            }
        }
        info!("Scheduler stopped");
    }
}
