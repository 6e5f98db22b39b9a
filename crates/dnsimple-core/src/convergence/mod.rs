//! Convergence engine for asynchronous registrar operations
//!
//! The ConvergenceEngine is responsible for:
//! - Polling a remote operation until it settles
//! - Stopping immediately on terminal failure states
//! - Enforcing an overall deadline
//! - Waiting a fixed delay between polls, interruptible by cancellation
//!
//! ## Architecture
//!
//! ```text
//!                  ┌───────────────────┐
//!                  │ ConvergenceEngine │
//!                  └───────────────────┘
//!                            │ poll()
//!                            ▼
//!                  ┌───────────────────┐        ┌──────────────┐
//!                  │      Probe        │───────▶│ RegistrarApi │
//!                  └───────────────────┘        └──────────────┘
//!                            │
//!        ┌───────────────────┼───────────────────┐
//!        ▼                   ▼                   ▼
//!      Done           Retry(error)          Halt(error)
//!   (Converged)   (sleep, poll again     (Failed, stop now)
//!                  or TimedOut)
//! ```
//!
//! ## Loop
//!
//! 1. Deadline = now + timeout, computed once
//! 2. Poll immediately
//! 3. `Done` → Converged, `Halt` → Failed
//! 4. `Retry` past the deadline → TimedOut with the last error
//! 5. Otherwise sleep the fixed delay and go to 2
//!
//! There is no backoff and no jitter. Callers tuned their timeouts around a
//! fixed cadence.

pub mod registrar;
pub mod state;

use crate::error::{Error, Result};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Delay between polls used by every registrar call site
pub const DEFAULT_POLL_DELAY: Duration = Duration::from_secs(20);

/// Result of a single poll
#[derive(Debug)]
pub enum PollStatus {
    /// The remote operation reached its success state
    Done,
    /// Not there yet (or a recoverable failure); poll again if time remains
    Retry(Error),
    /// The remote operation can never succeed; stop now
    Halt(Error),
}

/// A single remote query the engine can repeat
#[async_trait]
pub trait Probe: Send {
    /// Perform one remote query and classify the answer
    async fn poll(&mut self) -> PollStatus;
}

/// [`Probe`] backed by a closure returning a future
pub struct FnProbe<F> {
    f: F,
}

/// Wrap a closure as a [`Probe`]
///
/// ```rust,no_run
/// use dnsimple_core::convergence::{from_fn, PollStatus};
///
/// let probe = from_fn(|| async { PollStatus::Done });
/// # drop(probe);
/// ```
pub fn from_fn<F, Fut>(f: F) -> FnProbe<F>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = PollStatus> + Send,
{
    FnProbe { f }
}

#[async_trait]
impl<F, Fut> Probe for FnProbe<F>
where
    F: FnMut() -> Fut + Send,
    Fut: Future<Output = PollStatus> + Send,
{
    async fn poll(&mut self) -> PollStatus {
        (self.f)().await
    }
}

/// Timing parameters for one convergence wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvergencePolicy {
    /// Maximum total time spent waiting
    pub timeout: Duration,
    /// Fixed delay between polls
    pub delay: Duration,
}

impl ConvergencePolicy {
    /// Create a policy with the standard poll delay
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            delay: DEFAULT_POLL_DELAY,
        }
    }

    /// Override the delay between polls
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// How a convergence wait ended
#[derive(Debug)]
pub enum ConvergenceOutcome {
    /// The remote operation reached its success state
    Converged,
    /// A terminal failure state was observed; never retry within this run
    Failed(Error),
    /// The deadline passed while the operation was still in progress
    TimedOut(Error),
}

impl ConvergenceOutcome {
    /// Whether the operation converged
    pub fn is_converged(&self) -> bool {
        matches!(self, Self::Converged)
    }

    /// The error carried by a failure or timeout
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Converged => None,
            Self::Failed(err) | Self::TimedOut(err) => Some(err),
        }
    }
}

/// Outcome plus bookkeeping for logging and tests
#[derive(Debug)]
pub struct ConvergenceReport {
    pub outcome: ConvergenceOutcome,
    /// Number of polls performed
    pub attempts: usize,
    /// Wall time from loop entry to return
    pub elapsed: Duration,
}

/// Convergence engine
///
/// Runs inline on the calling task. It spawns nothing and holds no state
/// between calls, so one engine can serve any number of concurrent waits.
#[derive(Debug, Clone, Copy)]
pub struct ConvergenceEngine {
    policy: ConvergencePolicy,
}

impl ConvergenceEngine {
    /// Create an engine with the given timing
    pub fn new(policy: ConvergencePolicy) -> Self {
        Self { policy }
    }

    /// The timing this engine applies
    pub fn policy(&self) -> ConvergencePolicy {
        self.policy
    }

    /// Poll until the probe converges, fails terminally, or time runs out
    ///
    /// # Parameters
    ///
    /// - `probe`: The remote query to repeat
    /// - `cancel`: Aborts the wait, including mid-delay
    ///
    /// # Returns
    ///
    /// - `Ok(ConvergenceReport)`: One of the three outcomes
    /// - `Err(Error::Cancelled)`: The caller cancelled while waiting
    pub async fn converge<P>(&self, probe: &mut P, cancel: &CancellationToken) -> Result<ConvergenceReport>
    where
        P: Probe + ?Sized,
    {
        let started = Instant::now();
        let deadline = started + self.policy.timeout;
        let mut attempts = 0usize;

        loop {
            attempts += 1;
            let status = probe.poll().await;

            let last_error = match status {
                PollStatus::Done => {
                    info!(attempts, elapsed_ms = started.elapsed().as_millis() as u64, "Converged");
                    return Ok(self.report(ConvergenceOutcome::Converged, attempts, started));
                }
                PollStatus::Halt(err) => {
                    error!(attempts, error = %err, "Terminal state reached, giving up");
                    return Ok(self.report(ConvergenceOutcome::Failed(err), attempts, started));
                }
                PollStatus::Retry(err) => err,
            };

            if Instant::now() >= deadline {
                warn!(
                    attempts,
                    timeout_secs = self.policy.timeout.as_secs(),
                    error = %last_error,
                    "Convergence deadline passed"
                );
                return Ok(self.report(ConvergenceOutcome::TimedOut(last_error), attempts, started));
            }

            debug!(
                attempt = attempts,
                delay_ms = self.policy.delay.as_millis() as u64,
                error = %last_error,
                "Not converged yet, waiting before next poll"
            );

            tokio::select! {
                _ = cancel.cancelled() => {
                    info!(attempts, "Convergence wait cancelled");
                    return Err(Error::Cancelled);
                }
                _ = tokio::time::sleep(self.policy.delay) => {}
            }
        }
    }

    fn report(&self, outcome: ConvergenceOutcome, attempts: usize, started: Instant) -> ConvergenceReport {
        ConvergenceReport {
            outcome,
            attempts,
            elapsed: started.elapsed(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_defaults_to_fixed_twenty_second_delay() {
        let policy = ConvergencePolicy::new(Duration::from_secs(600));
        assert_eq!(policy.delay, Duration::from_secs(20));
        assert_eq!(policy.with_delay(Duration::from_secs(1)).delay, Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_immediate_success_polls_once() {
        let engine = ConvergenceEngine::new(ConvergencePolicy::new(Duration::from_secs(60)));
        let mut probe = from_fn(|| async { PollStatus::Done });

        let report = engine.converge(&mut probe, &CancellationToken::new()).await.unwrap();
        assert!(report.outcome.is_converged());
        assert_eq!(report.attempts, 1);
        assert!(report.outcome.error().is_none());
    }

    #[tokio::test]
    async fn test_zero_timeout_still_polls_once() {
        let engine = ConvergenceEngine::new(
            ConvergencePolicy::new(Duration::ZERO).with_delay(Duration::from_millis(5)),
        );
        let mut probe = from_fn(|| async { PollStatus::Retry(Error::not_converged("domain registration", "new")) });

        let report = engine.converge(&mut probe, &CancellationToken::new()).await.unwrap();
        assert_eq!(report.attempts, 1);
        assert!(matches!(report.outcome, ConvergenceOutcome::TimedOut(Error::NotConverged { .. })));
    }
}
