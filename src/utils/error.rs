use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Dependency is not reachable yet. Always retried by the gate.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransientError {
    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    #[error("not operational yet: {0}")]
    Operational(String),
}

/// What a single probe invocation can report besides "ready".
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error(transparent)]
    Transient(#[from] TransientError),

    #[error("{0}")]
    Fatal(BoxError),
}

pub type ProbeResult = std::result::Result<(), ProbeError>;

impl ProbeError {
    pub fn refused(message: impl Into<String>) -> Self {
        ProbeError::Transient(TransientError::ConnectionRefused(message.into()))
    }

    pub fn operational(message: impl Into<String>) -> Self {
        ProbeError::Transient(TransientError::Operational(message.into()))
    }

    pub fn fatal(source: impl Into<BoxError>) -> Self {
        ProbeError::Fatal(source.into())
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, ProbeError::Transient(_))
    }
}

#[derive(Error, Debug)]
pub enum WaitError {
    #[error("{dependency} check failed on attempt {attempt}: {source}")]
    ProbeFailed {
        dependency: String,
        attempt: u32,
        #[source]
        source: BoxError,
    },

    #[error("{dependency} still unavailable after {attempts} attempts: {last_error}")]
    Exhausted {
        dependency: String,
        attempts: u32,
        last_error: TransientError,
    },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Dependency,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// 可重試
    Medium,
    /// 依賴回報致命錯誤
    High,
    /// 配置或系統錯誤
    Critical,
}

impl WaitError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            WaitError::ProbeFailed { .. } | WaitError::Exhausted { .. } => {
                ErrorCategory::Dependency
            }
            WaitError::IoError(_) => ErrorCategory::System,
            WaitError::ConfigError { .. }
            | WaitError::MissingConfigError { .. }
            | WaitError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            WaitError::Exhausted { .. } => ErrorSeverity::Medium,
            WaitError::ProbeFailed { .. } => ErrorSeverity::High,
            _ => ErrorSeverity::Critical,
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            WaitError::Exhausted { .. } => {
                "Raise --max-attempts or --poll-interval-ms, or check that the dependency is starting"
            }
            WaitError::ProbeFailed { .. } => {
                "The dependency answered but rejected the check; verify credentials and database name"
            }
            WaitError::IoError(_) => "Check file permissions and paths",
            WaitError::MissingConfigError { .. } => {
                "Pass --database-url, --tcp or --http, or set DATABASE_URL / DB_HOST"
            }
            WaitError::ConfigError { .. } | WaitError::InvalidConfigValueError { .. } => {
                "Fix the configuration value and run again"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            WaitError::Exhausted {
                dependency,
                attempts,
                last_error,
            } => format!(
                "{} did not become available after {} attempts (last error: {})",
                dependency, attempts, last_error
            ),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WaitError>;
