use crate::utils::error::ProbeResult;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// A single readiness check against an external dependency.
pub trait Probe {
    fn check(&mut self) -> ProbeResult;

    fn describe(&self) -> String {
        "dependency".to_string()
    }
}

impl<F> Probe for F
where
    F: FnMut() -> ProbeResult,
{
    fn check(&mut self) -> ProbeResult {
        self()
    }
}

/// Time source for the gate. Injected so tests can count suspensions without sleeping.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
    fn sleep(&self, duration: Duration);
}
