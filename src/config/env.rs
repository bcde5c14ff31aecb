use crate::utils::error::{Result, WaitError};
use url::Url;

pub const DEFAULT_DB_PORT: u16 = 5432;

/// Builds a Postgres URL from `DB_HOST`, `DB_NAME`, `DB_USER`, `DB_PASS` and optional `DB_PORT`.
///
/// Returns `Ok(None)` when `DB_HOST` is not set.
pub fn database_url_from_env() -> Result<Option<String>> {
    database_url_from_vars(|key| std::env::var(key).ok())
}

pub fn database_url_from_vars<F>(lookup: F) -> Result<Option<String>>
where
    F: Fn(&str) -> Option<String>,
{
    let host = match lookup("DB_HOST").filter(|h| !h.trim().is_empty()) {
        Some(host) => host,
        None => return Ok(None),
    };

    let port = match lookup("DB_PORT") {
        Some(raw) => raw
            .parse::<u16>()
            .map_err(|_| WaitError::InvalidConfigValueError {
                field: "DB_PORT".to_string(),
                value: raw.clone(),
                reason: "Port must be a number between 1 and 65535".to_string(),
            })?,
        None => DEFAULT_DB_PORT,
    };

    let invalid = |field: &str, value: &str| WaitError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: "Cannot be used in a database URL".to_string(),
    };

    // 透過 Url 組裝，帳密中的特殊字元會被正確編碼
    let mut url = Url::parse("postgres://localhost").map_err(|e| WaitError::ConfigError {
        message: e.to_string(),
    })?;
    url.set_host(Some(&host)).map_err(|_| invalid("DB_HOST", &host))?;
    url.set_port(Some(port)).map_err(|_| invalid("DB_PORT", &port.to_string()))?;

    if let Some(user) = lookup("DB_USER") {
        url.set_username(&user).map_err(|_| invalid("DB_USER", &user))?;
    }
    if let Some(pass) = lookup("DB_PASS") {
        url.set_password(Some(&pass))
            .map_err(|_| invalid("DB_PASS", "****"))?;
    }
    if let Some(name) = lookup("DB_NAME") {
        url.set_path(&format!("/{}", name.trim_start_matches('/')));
    }

    Ok(Some(url.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_no_host_means_no_url() {
        assert_eq!(database_url_from_vars(vars(&[])).unwrap(), None);
        assert_eq!(
            database_url_from_vars(vars(&[("DB_NAME", "devdb")])).unwrap(),
            None
        );
    }

    #[test]
    fn test_builds_url_from_parts() {
        let url = database_url_from_vars(vars(&[
            ("DB_HOST", "db"),
            ("DB_NAME", "devdb"),
            ("DB_USER", "devuser"),
            ("DB_PASS", "changeme"),
        ]))
        .unwrap();

        assert_eq!(
            url.as_deref(),
            Some("postgres://devuser:changeme@db:5432/devdb")
        );
    }

    #[test]
    fn test_password_is_percent_encoded() {
        let url = database_url_from_vars(vars(&[
            ("DB_HOST", "db"),
            ("DB_PORT", "6543"),
            ("DB_USER", "app"),
            ("DB_PASS", "p@ss/word"),
        ]))
        .unwrap()
        .unwrap();

        assert!(url.starts_with("postgres://app:p%40ss%2Fword@db:6543"));
    }

    #[test]
    fn test_invalid_port_is_rejected() {
        let result = database_url_from_vars(vars(&[("DB_HOST", "db"), ("DB_PORT", "five")]));
        assert!(matches!(
            result,
            Err(WaitError::InvalidConfigValueError { .. })
        ));
    }
}
