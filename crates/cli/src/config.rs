use std::env;
use std::str::FromStr;
use std::time::Duration;

use ingest_admin_core::store::config::{DEFAULT_API_PREFIX, DEFAULT_BASE_URL};
use ingest_admin_core::store::DeleteFilterPlacement;
use ingest_admin_core::StoreConfig;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" | "text" => Ok(LogFormat::Pretty),
            other => Err(format!("expected `json` or `pretty`, got `{other}`")),
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the document store.
    pub store_url: String,
    /// Path segment before each endpoint (`v2`), empty for none.
    pub api_prefix: String,
    /// Per-request timeout.
    pub timeout: Option<Duration>,
    /// Whether delete filters go in the query string or the body.
    pub delete_placement: DeleteFilterPlacement,
    /// Event bus channel capacity.
    pub event_bus_capacity: usize,
    /// Log level (e.g., "info", "debug", "trace").
    pub log_level: String,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let timeout = parse_opt::<u64>(&lookup, "DOCUMENT_STORE_TIMEOUT_SECS")?
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);

        Ok(Self {
            store_url: lookup("DOCUMENT_STORE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_prefix: lookup("DOCUMENT_STORE_API_PREFIX")
                .unwrap_or_else(|| DEFAULT_API_PREFIX.to_string()),
            timeout,
            delete_placement: parse_opt(&lookup, "DELETE_FILTER_PLACEMENT")?.unwrap_or_default(),
            event_bus_capacity: parse_opt(&lookup, "EVENT_BUS_CAPACITY")?.unwrap_or(1024),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            log_format: parse_opt(&lookup, "LOG_FORMAT")?.unwrap_or(LogFormat::Json),
        })
    }

    /// Store settings for the HTTP client.
    pub fn store_config(&self) -> StoreConfig {
        let mut config = StoreConfig::new(&self.store_url)
            .with_api_prefix(&self.api_prefix)
            .with_delete_placement(self.delete_placement);
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        config
    }
}

fn parse_opt<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(name)
        .map(|raw| {
            raw.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
                name,
                reason: e.to_string(),
            })
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.store_url, "http://localhost:7272");
        assert_eq!(config.api_prefix, "v2");
        assert_eq!(config.timeout, None);
        assert_eq!(config.delete_placement, DeleteFilterPlacement::Query);
        assert_eq!(config.event_bus_capacity, 1024);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(
            config.store_config().endpoint("delete"),
            "http://localhost:7272/v2/delete"
        );
    }

    #[test]
    fn overrides() {
        let config = config_from(&[
            ("DOCUMENT_STORE_URL", "http://r2r:8000"),
            ("DOCUMENT_STORE_API_PREFIX", ""),
            ("DOCUMENT_STORE_TIMEOUT_SECS", "30"),
            ("DELETE_FILTER_PLACEMENT", "body"),
            ("LOG_FORMAT", "pretty"),
        ])
        .unwrap();
        assert_eq!(config.timeout, Some(Duration::from_secs(30)));
        assert_eq!(config.delete_placement, DeleteFilterPlacement::Body);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(
            config.store_config().endpoint("documents_overview"),
            "http://r2r:8000/documents_overview"
        );
    }

    #[test]
    fn invalid_values_are_errors() {
        let err = config_from(&[("DOCUMENT_STORE_TIMEOUT_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().starts_with("DOCUMENT_STORE_TIMEOUT_SECS is invalid"));

        assert!(config_from(&[("DELETE_FILTER_PLACEMENT", "header")]).is_err());
        assert!(config_from(&[("EVENT_BUS_CAPACITY", "-1")]).is_err());
    }

    #[test]
    fn zero_timeout_means_none() {
        let config = config_from(&[("DOCUMENT_STORE_TIMEOUT_SECS", "0")]).unwrap();
        assert_eq!(config.timeout, None);
    }
}
