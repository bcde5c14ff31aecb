use crate::utils::logger::LogFormat;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "wait-for-db", version)]
#[command(about = "Block until a database (or any TCP/HTTP dependency) is ready to serve")]
pub struct CliConfig {
    /// Postgres connection URL to probe with `SELECT 1`
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Probe a plain TCP endpoint instead (HOST:PORT)
    #[arg(long, conflicts_with = "http")]
    pub tcp: Option<String>,

    /// Probe an HTTP health-check endpoint instead
    #[arg(long)]
    pub http: Option<String>,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Dependency name used in status lines
    #[arg(long)]
    pub name: Option<String>,

    /// Give up after this many attempts (unbounded when unset)
    #[arg(long, env = "WAIT_MAX_ATTEMPTS")]
    pub max_attempts: Option<u32>,

    /// Delay between attempts in milliseconds [default: 1000]
    #[arg(long, env = "WAIT_POLL_INTERVAL_MS")]
    pub poll_interval_ms: Option<u64>,

    /// Per-attempt timeout in milliseconds [default: 5000]
    #[arg(long, env = "WAIT_PROBE_TIMEOUT_MS")]
    pub probe_timeout_ms: Option<u64>,

    /// Print the readiness summary as JSON on success
    #[arg(long)]
    pub json: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
