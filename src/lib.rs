pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{TomlConfig, WaitSettings};

pub use crate::adapters::{build_probe, clock::ManualClock, clock::SystemClock};
pub use crate::core::gate::{wait_until_ready, ReadinessGate, RetryPolicy};
pub use crate::core::{Clock, Probe, Ready, Target};
pub use crate::utils::error::{ProbeError, ProbeResult, Result, TransientError, WaitError};
