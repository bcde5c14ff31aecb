#[cfg(feature = "cli")]
pub mod cli;
pub mod env;
pub mod toml_config;

use crate::core::gate::{RetryPolicy, DEFAULT_POLL_INTERVAL};
use crate::core::Target;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_host_port, validate_non_empty_string, validate_positive_number, validate_range,
    validate_url, Validate,
};
use std::time::Duration;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use crate::utils::logger::LogFormat;
pub use toml_config::TomlConfig;

pub const DEFAULT_DEPENDENCY_NAME: &str = "database";
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Upper bound for the interval and timeout knobs, one hour.
const MAX_DELAY_MS: u64 = 60 * 60 * 1000;

/// Fully resolved settings for one gate run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitSettings {
    pub name: String,
    pub target: Target,
    pub policy: RetryPolicy,
    pub probe_timeout: Duration,
}

impl WaitSettings {
    pub fn new(target: Target) -> Self {
        Self {
            name: DEFAULT_DEPENDENCY_NAME.to_string(),
            target,
            policy: RetryPolicy::default(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }

    /// 依序合併：命令列/環境變數 > TOML 檔案 > DB_* 環境變數 > 預設值
    ///
    /// `env_database_url` is only called when no higher-precedence target is set.
    #[cfg(feature = "cli")]
    pub fn resolve<F>(cli: &CliConfig, file: Option<&TomlConfig>, env_database_url: F) -> Result<Self>
    where
        F: FnOnce() -> Result<Option<String>>,
    {
        let target = if let Some(address) = &cli.tcp {
            Target::Tcp {
                address: address.clone(),
            }
        } else if let Some(url) = &cli.http {
            Target::Http { url: url.clone() }
        } else if let Some(url) = &cli.database_url {
            Target::Postgres { url: url.clone() }
        } else if let Some(target) = file.and_then(|f| f.target.clone()) {
            target
        } else if let Some(url) = env_database_url()? {
            Target::Postgres { url }
        } else {
            return Err(crate::utils::error::WaitError::MissingConfigError {
                field: "target".to_string(),
            });
        };

        let name = cli
            .name
            .clone()
            .or_else(|| file.and_then(|f| f.name.clone()))
            .unwrap_or_else(|| DEFAULT_DEPENDENCY_NAME.to_string());

        let max_attempts = cli
            .max_attempts
            .or_else(|| file.and_then(|f| f.max_attempts()));

        let poll_interval = cli
            .poll_interval_ms
            .or_else(|| file.and_then(|f| f.poll_interval_ms()))
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_POLL_INTERVAL);

        let probe_timeout = cli
            .probe_timeout_ms
            .or_else(|| file.and_then(|f| f.probe_timeout_ms()))
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_PROBE_TIMEOUT);

        let settings = Self {
            name,
            target,
            policy: RetryPolicy {
                max_attempts,
                poll_interval,
            },
            probe_timeout,
        };
        settings.validate()?;
        Ok(settings)
    }
}

impl Validate for WaitSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;

        match &self.target {
            Target::Postgres { url } => {
                validate_url("database_url", url, &["postgres", "postgresql"])?;
            }
            Target::Tcp { address } => {
                validate_host_port("tcp", address)?;
            }
            Target::Http { url } => {
                validate_url("http", url, &["http", "https"])?;
            }
        }

        if let Some(max) = self.policy.max_attempts {
            validate_positive_number("max_attempts", u64::from(max), 1)?;
        }

        validate_range(
            "poll_interval_ms",
            self.policy.poll_interval.as_millis() as u64,
            0,
            MAX_DELAY_MS,
        )?;
        validate_range(
            "probe_timeout_ms",
            self.probe_timeout.as_millis() as u64,
            1,
            MAX_DELAY_MS,
        )?;

        Ok(())
    }
}

#[cfg(all(test, feature = "cli"))]
mod tests {
    use super::*;
    use crate::utils::error::WaitError;

    fn no_env() -> Result<Option<String>> {
        Ok(None)
    }

    fn broken_env() -> Result<Option<String>> {
        Err(WaitError::InvalidConfigValueError {
            field: "DB_PORT".to_string(),
            value: "five".to_string(),
            reason: "Port must be a number between 1 and 65535".to_string(),
        })
    }

    fn file_with_target() -> TomlConfig {
        TomlConfig::from_toml_str(
            r#"
name = "recipe-db"

[target]
kind = "postgres"
url = "postgres://app@db:5432/app"

[retry]
max_attempts = 20
poll_interval_ms = 2000
"#,
        )
        .unwrap()
    }

    #[test]
    fn test_defaults_with_env_database_url() {
        let settings = WaitSettings::resolve(
            &CliConfig::default(),
            None,
            || Ok(Some("postgres://devuser:changeme@db:5432/devdb".to_string())),
        )
        .unwrap();

        assert_eq!(settings.name, "database");
        assert_eq!(settings.policy, RetryPolicy::default());
        assert_eq!(settings.probe_timeout, DEFAULT_PROBE_TIMEOUT);
        assert_eq!(settings.target.kind(), "postgres");
    }

    #[test]
    fn test_missing_target() {
        let result = WaitSettings::resolve(&CliConfig::default(), None, no_env);
        assert!(matches!(
            result,
            Err(WaitError::MissingConfigError { ref field }) if field == "target"
        ));
    }

    #[test]
    fn test_file_values_apply_when_cli_is_silent() {
        let file = file_with_target();
        let settings = WaitSettings::resolve(&CliConfig::default(), Some(&file), no_env).unwrap();

        assert_eq!(settings.name, "recipe-db");
        assert_eq!(settings.policy.max_attempts, Some(20));
        assert_eq!(settings.policy.poll_interval, Duration::from_secs(2));
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = file_with_target();
        let cli = CliConfig {
            tcp: Some("db:5432".to_string()),
            max_attempts: Some(3),
            name: Some("postgres-port".to_string()),
            ..CliConfig::default()
        };

        let settings = WaitSettings::resolve(&cli, Some(&file), no_env).unwrap();

        assert_eq!(
            settings.target,
            Target::Tcp {
                address: "db:5432".to_string()
            }
        );
        assert_eq!(settings.name, "postgres-port");
        assert_eq!(settings.policy.max_attempts, Some(3));
        assert_eq!(settings.policy.poll_interval, Duration::from_secs(2));
    }

    #[test]
    fn test_file_target_beats_db_env() {
        let file = file_with_target();
        let settings = WaitSettings::resolve(
            &CliConfig::default(),
            Some(&file),
            || Ok(Some("postgres://other@elsewhere/db".to_string())),
        )
        .unwrap();

        assert_eq!(
            settings.target,
            Target::Postgres {
                url: "postgres://app@db:5432/app".to_string()
            }
        );
    }

    #[test]
    fn test_db_env_not_consulted_when_target_given() {
        let cli = CliConfig {
            tcp: Some("db:5432".to_string()),
            ..CliConfig::default()
        };
        assert!(WaitSettings::resolve(&cli, None, broken_env).is_ok());

        let file = file_with_target();
        assert!(WaitSettings::resolve(&CliConfig::default(), Some(&file), broken_env).is_ok());
    }

    #[test]
    fn test_db_env_error_surfaces_when_it_is_the_only_source() {
        assert!(matches!(
            WaitSettings::resolve(&CliConfig::default(), None, broken_env),
            Err(WaitError::InvalidConfigValueError { ref field, .. }) if field == "DB_PORT"
        ));
    }

    #[test]
    fn test_zero_max_attempts_is_rejected() {
        let cli = CliConfig {
            tcp: Some("db:5432".to_string()),
            max_attempts: Some(0),
            ..CliConfig::default()
        };
        assert!(WaitSettings::resolve(&cli, None, no_env).is_err());
    }

    #[test]
    fn test_invalid_tcp_address_is_rejected() {
        let cli = CliConfig {
            tcp: Some("db".to_string()),
            ..CliConfig::default()
        };
        assert!(matches!(
            WaitSettings::resolve(&cli, None, no_env),
            Err(WaitError::InvalidConfigValueError { .. })
        ));
    }
}
