pub mod gate;

pub use crate::domain::model::{AttemptOutcome, ProbeAttempt, Ready, Target};
pub use crate::domain::ports::{Clock, Probe};
pub use crate::utils::error::Result;
