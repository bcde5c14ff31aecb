use crate::core::Probe;
use crate::utils::error::{ProbeError, ProbeResult, Result, WaitError};
use crate::utils::validation::{redact, validate_url};
use reqwest::blocking::Client;
use std::time::Duration;

/// GETs a health-check endpoint. 2xx is ready, 5xx is retried, 4xx is fatal.
pub struct HttpProbe {
    url: String,
    client: Client,
}

impl HttpProbe {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        validate_url("http", url, &["http", "https"])?;

        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| WaitError::ConfigError {
                message: format!("Failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            url: url.to_string(),
            client,
        })
    }
}

impl Probe for HttpProbe {
    fn check(&mut self) -> ProbeResult {
        tracing::debug!("Making health check request to: {}", redact(&self.url));

        let response = self
            .client
            .get(&self.url)
            .send()
            .map_err(classify_request_error)?;

        let status = response.status();
        tracing::debug!("Health check response status: {}", status);

        let url = redact(&self.url);
        if status.is_success() {
            Ok(())
        } else if status.is_server_error() {
            Err(ProbeError::operational(format!("{} responded {}", url, status)))
        } else {
            Err(ProbeError::fatal(format!("{} responded {}", url, status)))
        }
    }

    fn describe(&self) -> String {
        format!("http {}", redact(&self.url))
    }
}

fn classify_request_error(error: reqwest::Error) -> ProbeError {
    if error.is_timeout() {
        ProbeError::operational(error.to_string())
    } else if error.is_connect() {
        ProbeError::refused(error.to_string())
    } else {
        ProbeError::fatal(error)
    }
}
