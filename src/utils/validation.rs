use crate::utils::error::{Result, WaitError};
use url::{Host, Url};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str, allowed_schemes: &[&str]) -> Result<Url> {
    if url_str.is_empty() {
        return Err(WaitError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => {
            if allowed_schemes.contains(&url.scheme()) {
                Ok(url)
            } else {
                Err(WaitError::InvalidConfigValueError {
                    field: field_name.to_string(),
                    value: redact(url_str),
                    reason: format!(
                        "Unsupported URL scheme: {}. Allowed schemes: {}",
                        url.scheme(),
                        allowed_schemes.join(", ")
                    ),
                })
            }
        }
        Err(e) => Err(WaitError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: redact(url_str),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// 拆分 `host:port`，IPv6 需要使用 `[::1]:5432` 格式
pub fn validate_host_port(field_name: &str, address: &str) -> Result<(String, u16)> {
    let invalid = |reason: String| WaitError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: address.to_string(),
        reason,
    };

    let (raw_host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| invalid("Expected HOST:PORT".to_string()))?;

    if raw_host.trim().is_empty() {
        return Err(invalid("Host cannot be empty".to_string()));
    }

    let host = match raw_host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
    {
        Some(inner) => {
            Host::parse(raw_host).map_err(|e| invalid(format!("Invalid host: {}", e)))?;
            inner
        }
        None if raw_host.contains(':') => {
            return Err(invalid(
                "Expected HOST:PORT (URLs are not accepted; bracket IPv6 hosts like [::1]:5432)"
                    .to_string(),
            ));
        }
        None => {
            Host::parse(raw_host).map_err(|e| invalid(format!("Invalid host: {}", e)))?;
            raw_host
        }
    };

    let port: u16 = port
        .parse()
        .map_err(|_| invalid("Port must be a number between 1 and 65535".to_string()))?;
    if port == 0 {
        return Err(invalid("Port must be a number between 1 and 65535".to_string()));
    }

    Ok((host.to_string(), port))
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(WaitError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(WaitError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(WaitError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 隱藏 URL 中的密碼，避免寫入日誌
pub fn redact(url_str: &str) -> String {
    match Url::parse(url_str) {
        Ok(mut url) if url.password().is_some() => {
            let _ = url.set_password(Some("****"));
            url.to_string()
        }
        _ => url_str.to_string(),
    }
}
