//! Loading client configuration from disk

use meta_admin::{ClientConfig, ConfigError, LogLevel, MetaAdminClient};
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

#[test]
fn test_load_config_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
meta_servers = ["10.0.0.1:34601", "10.0.0.2:34601", "10.0.0.1:34601"]

[retry]
max_attempts = 6
attempt_timeout_ms = 1500
deadline_ms = 10000

[logging]
level = "warn"
"#
    )
    .unwrap();

    let config = ClientConfig::from_file(file.path()).unwrap();
    assert_eq!(config.logging.level, LogLevel::Warn);

    let policy = config.retry_policy();
    assert_eq!(policy.max_attempts, 6);
    assert_eq!(policy.attempt_timeout, Duration::from_millis(1500));
    assert_eq!(policy.deadline, Duration::from_secs(10));

    // Duplicates collapse in the pool, order is kept
    let client = MetaAdminClient::new(&config).unwrap();
    let endpoints: Vec<String> = client.endpoints().iter().map(|e| e.to_string()).collect();
    assert_eq!(endpoints, vec!["10.0.0.1:34601", "10.0.0.2:34601"]);
    assert!(client.leader_hint().is_none());
    assert_eq!(client.retry_policy().max_attempts, 6);
}

#[test]
fn test_missing_file_names_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = ClientConfig::from_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_client_rejects_invalid_config() {
    let mut config = ClientConfig::new(["m1:34601"]);
    config.retry.backoff_cap_ms = 1;
    config.retry.backoff_base_ms = 100;

    assert!(matches!(
        MetaAdminClient::new(&config),
        Err(ConfigError::Policy(_))
    ));

    let empty = ClientConfig::new(Vec::<String>::new());
    assert!(matches!(
        MetaAdminClient::new(&empty),
        Err(ConfigError::NoMetaServers)
    ));
}
