use std::time::Duration;

use crate::error::{AdvisorError, Result};

const DEFAULT_QUOTE_URL: &str = "https://query1.finance.yahoo.com";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_QUOTE_BATCH_SIZE: usize = 50;
const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub quote_url: String,
    pub http_timeout: Duration,
    pub quote_batch_size: usize,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quote_url: DEFAULT_QUOTE_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
            quote_batch_size: DEFAULT_QUOTE_BATCH_SIZE,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Settings {
    /// Read settings from the process environment, loading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let quote_url = lookup("ADVISOR_QUOTE_URL").unwrap_or_else(|| DEFAULT_QUOTE_URL.into());

        let timeout_secs: u64 =
            parse_or("ADVISOR_HTTP_TIMEOUT_SECS", &lookup, DEFAULT_HTTP_TIMEOUT_SECS)?;

        let quote_batch_size: usize =
            parse_or("ADVISOR_QUOTE_BATCH_SIZE", &lookup, DEFAULT_QUOTE_BATCH_SIZE)?;
        if quote_batch_size == 0 {
            return Err(AdvisorError::config("ADVISOR_QUOTE_BATCH_SIZE must be at least 1"));
        }

        let log_filter = lookup("ADVISOR_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.into());

        Ok(Self {
            quote_url,
            http_timeout: Duration::from_secs(timeout_secs),
            quote_batch_size,
            log_filter,
        })
    }
}

fn parse_or<T, F>(key: &str, lookup: &F, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| AdvisorError::config(format!("invalid {key} '{raw}': {e}"))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("ADVISOR_QUOTE_URL", "http://localhost:9000"),
            ("ADVISOR_HTTP_TIMEOUT_SECS", "3"),
            ("ADVISOR_QUOTE_BATCH_SIZE", "5"),
            ("ADVISOR_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(settings.quote_url, "http://localhost:9000");
        assert_eq!(settings.http_timeout, Duration::from_secs(3));
        assert_eq!(settings.quote_batch_size, 5);
        assert_eq!(settings.log_filter, "debug");
    }

    #[test]
    fn test_rejects_malformed_values() {
        let err = Settings::from_lookup(lookup_from(&[("ADVISOR_HTTP_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, AdvisorError::Config { .. }));

        let err = Settings::from_lookup(lookup_from(&[("ADVISOR_QUOTE_BATCH_SIZE", "0")]))
            .unwrap_err();
        assert!(matches!(err, AdvisorError::Config { .. }));
    }
}
