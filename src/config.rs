/*!
 * Client configuration
 */

use meta_admin_proto::Endpoint;
use meta_admin_resilience::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;

/// Configuration for [`MetaAdminClient`](crate::MetaAdminClient)
///
/// # Example
///
/// ```toml
/// meta_servers = ["10.0.0.1:34601", "10.0.0.2:34601", "10.0.0.3:34601"]
///
/// [retry]
/// max_attempts = 10
/// attempt_timeout_ms = 3000
///
/// [logging]
/// level = "debug"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Ordered `host:port` addresses of the metadata replicas
    pub meta_servers: Vec<String>,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Retry bounds, in TOML-friendly units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub attempt_timeout_ms: u64,
    pub backoff_base_ms: u64,
    pub backoff_cap_ms: u64,
    pub jitter: bool,
    pub deadline_ms: u64,
    pub max_rounds: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::from(&RetryPolicy::default())
    }
}

impl From<&RetryPolicy> for RetryConfig {
    fn from(policy: &RetryPolicy) -> Self {
        Self {
            max_attempts: policy.max_attempts,
            attempt_timeout_ms: policy.attempt_timeout.as_millis() as u64,
            backoff_base_ms: policy.backoff_base.as_millis() as u64,
            backoff_cap_ms: policy.backoff_cap.as_millis() as u64,
            jitter: policy.jitter,
            deadline_ms: policy.deadline.as_millis() as u64,
            max_rounds: policy.max_rounds,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            attempt_timeout: Duration::from_millis(self.attempt_timeout_ms),
            backoff_base: Duration::from_millis(self.backoff_base_ms),
            backoff_cap: Duration::from_millis(self.backoff_cap_ms),
            jitter: self.jitter,
            deadline: Duration::from_millis(self.deadline_ms),
            max_rounds: self.max_rounds,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,

    /// Write JSON logs to this file instead of compact logs to stdout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,

    /// Force debug level regardless of `level`
    pub verbose: bool,
}

/// Logging level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Only errors
    Error,

    /// Warnings and errors
    Warn,

    /// Info, warnings, and errors
    #[default]
    Info,

    /// Debug and above
    Debug,

    /// All messages including traces
    Trace,
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

impl ClientConfig {
    /// Configuration for the given servers with default retry and logging settings
    pub fn new<I, S>(meta_servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            meta_servers: meta_servers.into_iter().map(Into::into).collect(),
            retry: RetryConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Parsed meta server addresses, in configured order
    pub fn endpoints(&self) -> Result<Vec<Endpoint>, ConfigError> {
        self.meta_servers
            .iter()
            .map(|s| s.parse::<Endpoint>().map_err(ConfigError::Endpoint))
            .collect()
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.to_policy()
    }

    /// Check addresses and retry bounds
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.meta_servers.is_empty() {
            return Err(ConfigError::NoMetaServers);
        }
        self.endpoints()?;
        self.retry_policy().validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = ClientConfig::from_toml_str(r#"meta_servers = ["m1:34601"]"#).unwrap();

        assert_eq!(config.retry, RetryConfig::default());
        assert_eq!(config.logging.level, LogLevel::Info);
        assert!(config.logging.file.is_none());

        let policy = config.retry_policy();
        assert_eq!(policy.max_attempts, 10);
        assert_eq!(policy.attempt_timeout, Duration::from_secs(3));
        assert_eq!(policy.backoff_base, Duration::from_millis(50));
        assert_eq!(policy.backoff_cap, Duration::from_secs(2));
        assert!(policy.jitter);
        assert_eq!(policy.deadline, Duration::from_secs(30));
        assert_eq!(policy.max_rounds, 3);
    }

    #[test]
    fn test_partial_retry_table() {
        let config = ClientConfig::from_toml_str(
            r#"
            meta_servers = ["m1:34601", "m2:34601"]

            [retry]
            max_attempts = 4
            jitter = false

            [logging]
            level = "debug"
            verbose = true
            "#,
        )
        .unwrap();

        assert_eq!(config.retry.max_attempts, 4);
        assert!(!config.retry.jitter);
        assert_eq!(config.retry.deadline_ms, 30_000);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert!(config.logging.verbose);
        assert_eq!(config.endpoints().unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        assert!(matches!(
            ClientConfig::from_toml_str("meta_servers = []"),
            Err(ConfigError::NoMetaServers)
        ));
        assert!(matches!(
            ClientConfig::from_toml_str(r#"meta_servers = ["no-port"]"#),
            Err(ConfigError::Endpoint(_))
        ));
        assert!(matches!(
            ClientConfig::from_toml_str(
                "meta_servers = [\"m1:1\"]\n[retry]\nmax_attempts = 0\n"
            ),
            Err(ConfigError::Policy(_))
        ));
        assert!(matches!(
            ClientConfig::from_toml_str("meta_servers = 3"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_retry_config_roundtrips_policy() {
        let policy = RetryPolicy::deterministic().with_max_attempts(7);
        assert_eq!(RetryConfig::from(&policy).to_policy(), policy);
    }

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(LogLevel::Error.to_tracing_level(), tracing::Level::ERROR);
        assert_eq!(LogLevel::Warn.to_tracing_level(), tracing::Level::WARN);
        assert_eq!(LogLevel::Info.to_tracing_level(), tracing::Level::INFO);
        assert_eq!(LogLevel::Debug.to_tracing_level(), tracing::Level::DEBUG);
        assert_eq!(LogLevel::Trace.to_tracing_level(), tracing::Level::TRACE);
    }
}
