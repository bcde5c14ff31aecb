use crate::core::Probe;
use crate::utils::error::{ProbeError, ProbeResult, Result, WaitError};
use crate::utils::validation::{redact, validate_url};
use sqlx::{Connection, PgConnection};
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};

/// SQLSTATE codes meaning the server is up but not accepting this database yet.
const NOT_READY_SQLSTATES: &[&str] = &[
    "57P03", // cannot_connect_now: the database system is starting up
    "3D000", // invalid_catalog_name: database not created yet
    "53300", // too_many_connections
    "57P01", // admin_shutdown
];

/// Opens a fresh connection and runs `SELECT 1` on every check.
pub struct PostgresProbe {
    url: String,
    timeout: Duration,
    runtime: Runtime,
}

impl PostgresProbe {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        validate_url("database_url", url, &["postgres", "postgresql"])?;

        // sqlx 是非同步的，探測本身維持同步阻塞
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(WaitError::IoError)?;

        Ok(Self {
            url: url.to_string(),
            timeout,
            runtime,
        })
    }

    async fn select_one(url: &str) -> std::result::Result<(), sqlx::Error> {
        let mut conn = PgConnection::connect(url).await?;
        sqlx::query("SELECT 1").execute(&mut conn).await?;
        conn.close().await?;
        Ok(())
    }
}

impl Probe for PostgresProbe {
    fn check(&mut self) -> ProbeResult {
        let timeout = self.timeout;
        let url = self.url.as_str();

        let outcome = self
            .runtime
            .block_on(async { tokio::time::timeout(timeout, Self::select_one(url)).await });

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(classify_sqlx_error(e)),
            Err(_) => Err(ProbeError::operational(format!(
                "no answer within {:?}",
                timeout
            ))),
        }
    }

    fn describe(&self) -> String {
        format!("postgres {}", redact(&self.url))
    }
}

pub(crate) fn classify_sqlx_error(error: sqlx::Error) -> ProbeError {
    let not_ready = match &error {
        sqlx::Error::Io(io) => return ProbeError::refused(io.to_string()),
        sqlx::Error::Database(db) => db
            .code()
            .filter(|code| is_not_ready_sqlstate(code))
            .map(|code| format!("{} (SQLSTATE {})", db.message(), code)),
        _ => None,
    };

    match not_ready {
        Some(message) => ProbeError::operational(message),
        None => ProbeError::fatal(error),
    }
}

pub(crate) fn is_not_ready_sqlstate(code: &str) -> bool {
    NOT_READY_SQLSTATES.contains(&code)
}
