use std::path::{Path, PathBuf};

use figment::Jail;

use common::types::{ConfirmWith, Correlation};
use config::{CliConfig, Config, ConfigError, DEFAULT_STREAM_NUMBER};

const CONFIG_FILE: &str = "rollup-bench.toml";

// every test runs in a jail so environment overrides never leak between tests
fn load(network: &str, cli: &CliConfig) -> Result<Config, ConfigError> {
    Config::from_file(Path::new(CONFIG_FILE), network, cli)
}

#[test]
fn test_missing_file_uses_base_config() {
    Jail::expect_with(|_| {
        let path = PathBuf::from("/nonexistent/rollup-bench.toml");
        let config = Config::from_file(&path, "localhost", &CliConfig::default()).unwrap();

        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert_eq!(config.db_port, 5432);
        assert_eq!(config.db_password, "password");
        assert_eq!(config.stream_number, DEFAULT_STREAM_NUMBER);
        assert_eq!(config.correlation, Correlation::InputIndex);
        assert_eq!(config.confirm_with, ConfirmWith::Report);
        assert!(config.token.is_none());
        Ok(())
    });
}

#[test]
fn test_toml_profile_overrides_base() {
    Jail::expect_with(|jail| {
        jail.create_file(
            CONFIG_FILE,
            r#"
            [localhost]
            db_host = "indexer-db"
            max_poll_attempts = 10
            correlation = "latest-input"
            dapp = "0x70ac08179605AF2D9e75782b8DEcDD3c22aA4D0C"

            [staging]
            db_host = "staging-db"
            "#,
        )?;

        let config = load("localhost", &CliConfig::default()).unwrap();

        assert_eq!(config.db_host, "indexer-db");
        assert_eq!(config.max_poll_attempts, 10);
        assert_eq!(config.correlation, Correlation::LatestInput);
        assert!(config.dapp.is_some());
        Ok(())
    });
}

#[test]
fn test_cli_overrides_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            CONFIG_FILE,
            r#"
            [localhost]
            stream_number = 10
            poll_interval_ms = 5
            "#,
        )?;

        let cli = CliConfig {
            stream_number: Some(100),
            confirm_with: Some(ConfirmWith::Notice),
            ..Default::default()
        };
        let config = load("localhost", &cli).unwrap();

        assert_eq!(config.stream_number, 100);
        assert_eq!(config.poll_interval_ms, 5);
        assert_eq!(config.confirm_with, ConfirmWith::Notice);
        Ok(())
    });
}

#[test]
fn test_env_sits_between_toml_and_cli() {
    Jail::expect_with(|jail| {
        jail.create_file(
            CONFIG_FILE,
            r#"
            [localhost]
            db_host = "toml-db"
            db_name = "toml"
            stream_number = 10
            "#,
        )?;
        jail.set_env("ROLLUP_BENCH_DB_HOST", "env-db");
        jail.set_env("ROLLUP_BENCH_STREAM_NUMBER", 20);
        jail.set_env("ROLLUP_BENCH_MAX_POLL_ATTEMPTS", 30);

        let cli = CliConfig {
            stream_number: Some(40),
            ..Default::default()
        };
        let config = load("localhost", &cli).unwrap();

        assert_eq!(config.db_host, "env-db");
        assert_eq!(config.db_name, "toml");
        assert_eq!(config.max_poll_attempts, 30);
        assert_eq!(config.stream_number, 40);
        Ok(())
    });
}

#[test]
fn test_numeric_env_values_for_string_fields() {
    Jail::expect_with(|jail| {
        jail.set_env("ROLLUP_BENCH_DB_PASSWORD", "123456");
        jail.set_env("ROLLUP_BENCH_DB_USER", "1000");
        jail.set_env("ROLLUP_BENCH_DB_NAME", "42");

        let config = load("localhost", &CliConfig::default()).unwrap();

        assert_eq!(config.db_password, "123456");
        assert_eq!(config.db_user, "1000");
        assert_eq!(config.db_name, "42");
        assert_eq!(config.database().password, "123456");
        Ok(())
    });
}

#[test]
fn test_invalid_override_is_rejected() {
    Jail::expect_with(|_| {
        let cli = CliConfig {
            max_poll_attempts: Some(0),
            ..Default::default()
        };
        let err = load("localhost", &cli).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidPollAttempts));
        Ok(())
    });
}
