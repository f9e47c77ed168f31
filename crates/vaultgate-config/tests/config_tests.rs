// SPDX-FileCopyrightText: 2026 Vaultgate Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Vaultgate configuration system.

use figment::Jail;
use vaultgate_config::diagnostic::ConfigError;
use vaultgate_config::{load_and_validate_str, load_config, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[client]
address = "https://vault.internal:8200"
request_timeout_secs = 5

[monitor]
poll_interval_secs = 3

[credentials]
path = "/tmp/vaultgate/credential.json"

[catalog]
prefix = "app/"

[token]
default_ttl = "1h"

[logging]
level = "debug"
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.client.address, "https://vault.internal:8200");
    assert_eq!(config.client.request_timeout_secs, 5);
    assert_eq!(config.monitor.poll_interval_secs, 3);
    assert_eq!(config.credentials.path, "/tmp/vaultgate/credential.json");
    assert_eq!(config.catalog.prefix, "app/");
    assert_eq!(config.token.default_ttl, "1h");
    assert_eq!(config.logging.level, "debug");
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    assert_eq!(config.client.address, "http://127.0.0.1:8200");
    assert_eq!(config.client.request_timeout_secs, 30);
    assert_eq!(config.monitor.poll_interval_secs, 10);
    assert!(config.credentials.path.ends_with("credential.json"));
    assert_eq!(config.catalog.prefix, "");
    assert_eq!(config.token.default_ttl, "24h");
    assert_eq!(config.logging.level, "info");
}

/// Unknown field in [client] is rejected with a suggestion.
#[test]
fn unknown_field_produces_suggestion() {
    let toml = r#"
[client]
adress = "http://127.0.0.1:8200"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown field");
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "adress");
            assert_eq!(suggestion.as_deref(), Some("address"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Wrong value types are reported as InvalidType.
#[test]
fn wrong_type_produces_invalid_type() {
    let toml = r#"
[monitor]
poll_interval_secs = "often"
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject string interval");
    assert!(
        matches!(&errors[0], ConfigError::InvalidType { key, .. } if key == "monitor.poll_interval_secs"),
        "got: {errors:?}"
    );
}

/// Semantically invalid values pass deserialization but fail validation.
#[test]
fn validation_rejects_bad_address() {
    let toml = r#"
[client]
address = "127.0.0.1:8200"
"#;

    let errors = load_and_validate_str(toml).expect_err("address without scheme");
    assert!(matches!(errors[0], ConfigError::Validation { .. }));
}

/// `VAULTGATE_*` variables override file values.
#[test]
fn prefixed_env_overrides_file() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "vaultgate.toml",
            r#"
[monitor]
poll_interval_secs = 30
"#,
        )?;
        jail.set_env("VAULTGATE_MONITOR_POLL_INTERVAL_SECS", "2");
        jail.set_env("VAULTGATE_CLIENT_REQUEST_TIMEOUT_SECS", "7");

        let config = load_config()?;
        assert_eq!(config.monitor.poll_interval_secs, 2);
        assert_eq!(config.client.request_timeout_secs, 7);
        Ok(())
    });
}

/// The conventional `VAULT_ADDR` variable sets the client address.
#[test]
fn vault_addr_sets_client_address() {
    Jail::expect_with(|jail| {
        jail.set_env("VAULTGATE_CLIENT_ADDRESS", "http://ignored:1");
        jail.set_env("VAULT_ADDR", "http://10.0.0.5:8200");

        let config = load_config()?;
        assert_eq!(config.client.address, "http://10.0.0.5:8200");
        Ok(())
    });
}
