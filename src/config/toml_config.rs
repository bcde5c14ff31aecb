use crate::core::Target;
use crate::utils::error::{Result, WaitError};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub name: Option<String>,
    pub target: Option<Target>,
    pub retry: Option<RetryConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RetryConfig {
    pub max_attempts: Option<u32>,
    pub poll_interval_ms: Option<u64>,
    pub probe_timeout_ms: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(WaitError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::from_toml_str_with(content, |name| std::env::var(name).ok())
    }

    /// Same as `from_toml_str`, resolving `${VAR}` through `lookup`.
    pub fn from_toml_str_with<F>(content: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let processed_content = Self::substitute_env_vars(content, lookup)?;

        toml::from_str(&processed_content).map_err(|e| WaitError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATABASE_URL})，未設定的變數保持原樣
    fn substitute_env_vars<F>(content: &str, lookup: F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        use regex::Regex;

        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| WaitError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            lookup(var_name).unwrap_or_else(|| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn max_attempts(&self) -> Option<u32> {
        self.retry.as_ref().and_then(|r| r.max_attempts)
    }

    pub fn poll_interval_ms(&self) -> Option<u64> {
        self.retry.as_ref().and_then(|r| r.poll_interval_ms)
    }

    pub fn probe_timeout_ms(&self) -> Option<u64> {
        self.retry.as_ref().and_then(|r| r.probe_timeout_ms)
    }
}
