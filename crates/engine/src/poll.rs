// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Completion polling.
//!
//! Fetches a job's status at a fixed interval until it succeeds. Pod failures
//! (`failed > 0`) are reported, not treated as errors: the job keeps running
//! until the cluster either records a success or marks it `Failed`.
//!
//! Transient fetch errors (cluster unavailable, throttling, transport) are
//! retried with exponential backoff up to `max_fetch_retries` consecutive
//! attempts. Anything else, or an exhausted budget, ends the wait with
//! [`PollError::Fetch`].

use cdtool_adapters::{JobStore, StoreError};
use cdtool_core::JobProgress;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Errors that abort a wait.
#[derive(Debug, Error)]
pub enum PollError {
    #[error("failed to get job {job} after {attempts} attempt(s): {source}")]
    Fetch {
        job: String,
        attempts: u32,
        #[source]
        source: StoreError,
    },
}

/// Polling cadence and limits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between status checks
    pub interval: Duration,
    /// Give up waiting after this long (`None` = wait forever)
    pub timeout: Option<Duration>,
    /// Consecutive transient fetch failures tolerated before giving up
    pub max_fetch_retries: u32,
    /// Upper bound for the retry backoff
    pub max_backoff: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: None,
            max_fetch_retries: 5,
            max_backoff: Duration::from_secs(30),
        }
    }
}

impl PollConfig {
    /// Delay before retry number `attempt` (1-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u32 << attempt.saturating_sub(1).min(16);
        self.interval.saturating_mul(factor).min(self.max_backoff)
    }
}

/// What the poller observed, reported as it happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollEvent {
    /// Job still running
    Progress { elapsed: Duration, failed: i32 },
    /// A transient fetch error; the poller will try again after `delay`
    Retrying { attempt: u32, delay: Duration, error: String },
    /// Job succeeded
    Succeeded { elapsed: Duration, failed: i32 },
    /// The cluster marked the job failed
    Failed { elapsed: Duration, failed: i32 },
}

/// How a wait ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitOutcome {
    Succeeded { elapsed: Duration, failed: i32 },
    Failed { elapsed: Duration, failed: i32 },
    TimedOut { elapsed: Duration },
    Cancelled { elapsed: Duration },
}

impl WaitOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, WaitOutcome::Succeeded { .. })
    }
}

/// Poll `namespace/name` until it reaches a terminal state, the timeout
/// passes, or `cancel` fires.
///
/// Returns as soon as a success is observed, without sleeping again.
pub async fn wait_for_completion<S: JobStore>(
    store: &S,
    namespace: &str,
    name: &str,
    config: &PollConfig,
    cancel: &CancellationToken,
    mut on_event: impl FnMut(PollEvent),
) -> Result<WaitOutcome, PollError> {
    let start = Instant::now();
    let deadline = config.timeout.map(|t| start + t);
    let mut failures: u32 = 0;

    loop {
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Ok(WaitOutcome::Cancelled { elapsed: start.elapsed() });
            }
            result = store.get(namespace, name) => result,
        };

        let delay = match fetched {
            Ok(job) => {
                failures = 0;
                let progress = JobProgress::of(&job);
                let elapsed = start.elapsed();
                if progress.is_succeeded() {
                    tracing::info!(%namespace, %name, ?elapsed, "job succeeded");
                    on_event(PollEvent::Succeeded { elapsed, failed: progress.failed });
                    return Ok(WaitOutcome::Succeeded { elapsed, failed: progress.failed });
                }
                if progress.gave_up {
                    tracing::warn!(%namespace, %name, failed = progress.failed, "job failed");
                    on_event(PollEvent::Failed { elapsed, failed: progress.failed });
                    return Ok(WaitOutcome::Failed { elapsed, failed: progress.failed });
                }
                tracing::debug!(%namespace, %name, failed = progress.failed, ?elapsed, "job running");
                on_event(PollEvent::Progress { elapsed, failed: progress.failed });
                config.interval
            }
            Err(e) if e.is_transient() && failures < config.max_fetch_retries => {
                failures += 1;
                let delay = config.backoff(failures);
                tracing::warn!(%namespace, %name, attempt = failures, ?delay, error = %e, "job status fetch failed, retrying");
                on_event(PollEvent::Retrying { attempt: failures, delay, error: e.to_string() });
                delay
            }
            Err(e) => {
                return Err(PollError::Fetch {
                    job: format!("{}/{}", namespace, name),
                    attempts: failures + 1,
                    source: e,
                });
            }
        };

        let wake = Instant::now() + delay;
        let (wake, times_out) = match deadline {
            Some(d) if d <= wake => (d, true),
            _ => (wake, false),
        };
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                return Ok(WaitOutcome::Cancelled { elapsed: start.elapsed() });
            }
            _ = tokio::time::sleep_until(wake) => {}
        }
        if times_out {
            tracing::warn!(%namespace, %name, "timed out waiting for job");
            return Ok(WaitOutcome::TimedOut { elapsed: start.elapsed() });
        }
    }
}

#[cfg(test)]
#[path = "poll_tests.rs"]
mod tests;
