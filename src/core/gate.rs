use crate::adapters::clock::SystemClock;
use crate::core::{AttemptOutcome, Clock, Probe, ProbeAttempt, Ready};
use crate::utils::error::{ProbeError, Result, WaitError};
use std::time::Duration;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// `None` 代表無限重試
    pub max_attempts: Option<u32>,
    pub poll_interval: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl RetryPolicy {
    pub fn bounded(max_attempts: u32, poll_interval: Duration) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            poll_interval,
        }
    }

    fn exhausted(&self, attempt: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempt >= max)
    }
}

/// Blocks the calling thread until a probe reports the dependency ready.
pub struct ReadinessGate<C: Clock = SystemClock> {
    dependency: String,
    policy: RetryPolicy,
    clock: C,
}

impl ReadinessGate<SystemClock> {
    pub fn new(dependency: impl Into<String>, policy: RetryPolicy) -> Self {
        Self::with_clock(dependency, policy, SystemClock)
    }
}

impl<C: Clock> ReadinessGate<C> {
    pub fn with_clock(dependency: impl Into<String>, policy: RetryPolicy, clock: C) -> Self {
        Self {
            dependency: dependency.into(),
            policy,
            clock,
        }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Probe until ready. Transient errors sleep `poll_interval` and retry; anything else is returned as is.
    pub fn wait_until_ready<P: Probe + ?Sized>(&self, probe: &mut P) -> Result<Ready> {
        let started_at = self.clock.now();
        let mut attempt: u32 = 0;

        tracing::info!("⏳ Waiting for {}...", self.dependency);
        tracing::debug!("Probe: {}", probe.describe());

        loop {
            attempt = next_attempt(attempt);

            match probe.check() {
                Ok(()) => {
                    let ready_at = self.clock.now();
                    self.record(attempt, AttemptOutcome::Ready, ready_at);
                    tracing::info!(
                        "✅ {} available after {} attempt(s)",
                        self.dependency,
                        attempt
                    );
                    return Ok(Ready {
                        dependency: self.dependency.clone(),
                        attempts: attempt,
                        started_at,
                        ready_at,
                    });
                }
                Err(ProbeError::Transient(error)) => {
                    self.record(attempt, AttemptOutcome::TransientFailure, self.clock.now());

                    if self.policy.exhausted(attempt) {
                        tracing::error!(
                            "❌ {} unavailable after {} attempts, giving up",
                            self.dependency,
                            attempt
                        );
                        return Err(WaitError::Exhausted {
                            dependency: self.dependency.clone(),
                            attempts: attempt,
                            last_error: error,
                        });
                    }

                    tracing::info!(
                        "{} unavailable ({}), waiting {:?}...",
                        self.dependency,
                        error,
                        self.policy.poll_interval
                    );
                    self.clock.sleep(self.policy.poll_interval);
                }
                Err(ProbeError::Fatal(source)) => {
                    tracing::error!("❌ {} check failed: {}", self.dependency, source);
                    return Err(WaitError::ProbeFailed {
                        dependency: self.dependency.clone(),
                        attempt,
                        source,
                    });
                }
            }
        }
    }

    fn record(&self, number: u32, outcome: AttemptOutcome, at: chrono::DateTime<chrono::Utc>) {
        let attempt = ProbeAttempt {
            number,
            outcome,
            at,
        };
        tracing::debug!(
            attempt = attempt.number,
            outcome = ?attempt.outcome,
            at = %attempt.at,
            "probe attempt"
        );
    }
}

/// 計數在 u32::MAX 停住，不會溢位
fn next_attempt(attempt: u32) -> u32 {
    attempt.saturating_add(1)
}

/// Waits on `probe` with the system clock.
pub fn wait_until_ready<P: Probe + ?Sized>(
    probe: &mut P,
    max_attempts: Option<u32>,
    poll_interval: Duration,
) -> Result<Ready> {
    let policy = RetryPolicy {
        max_attempts,
        poll_interval,
    };
    ReadinessGate::new("dependency", policy).wait_until_ready(probe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::clock::ManualClock;
    use crate::utils::error::ProbeResult;
    use std::cell::Cell;

    #[test]
    fn test_default_policy_is_unbounded() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, None);
        assert_eq!(policy.poll_interval, Duration::from_secs(1));
        assert!(!policy.exhausted(u32::MAX));
    }

    #[test]
    fn test_attempt_counter_saturates() {
        assert_eq!(next_attempt(0), 1);
        assert_eq!(next_attempt(u32::MAX - 1), u32::MAX);
        assert_eq!(next_attempt(u32::MAX), u32::MAX);
    }

    #[test]
    fn test_exhausted_after_exactly_max_attempts() {
        let calls = Cell::new(0u32);
        let mut probe = || -> ProbeResult {
            calls.set(calls.get() + 1);
            Err(ProbeError::refused("connection refused"))
        };

        let gate = ReadinessGate::with_clock(
            "database",
            RetryPolicy::bounded(4, Duration::from_millis(250)),
            ManualClock::default(),
        );
        let err = gate.wait_until_ready(&mut probe).unwrap_err();

        assert_eq!(calls.get(), 4);
        assert_eq!(gate.clock().sleeps().len(), 3);
        match err {
            WaitError::Exhausted {
                attempts,
                last_error,
                ..
            } => {
                assert_eq!(attempts, 4);
                assert!(last_error.to_string().contains("connection refused"));
            }
            other => panic!("expected Exhausted, got {other:?}"),
        }
    }

    #[test]
    fn test_single_attempt_cap_never_sleeps() {
        let mut probe = || -> ProbeResult { Err(ProbeError::operational("starting up")) };
        let gate = ReadinessGate::with_clock(
            "database",
            RetryPolicy::bounded(1, Duration::from_secs(5)),
            ManualClock::default(),
        );

        assert!(gate.wait_until_ready(&mut probe).is_err());
        assert!(gate.clock().sleeps().is_empty());
    }

    #[test]
    fn test_ready_reports_elapsed_clock_time() {
        let remaining = Cell::new(2u32);
        let mut probe = || -> ProbeResult {
            if remaining.get() == 0 {
                return Ok(());
            }
            remaining.set(remaining.get() - 1);
            Err(ProbeError::operational("starting up"))
        };
        let gate = ReadinessGate::with_clock(
            "database",
            RetryPolicy::bounded(10, Duration::from_secs(3)),
            ManualClock::default(),
        );

        let ready = gate.wait_until_ready(&mut probe).unwrap();
        assert_eq!(ready.attempts, 3);
        assert_eq!(ready.waited(), chrono::Duration::seconds(6));
    }
}
