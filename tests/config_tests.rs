//! Configuration loading tests

use rolegate::ConfigError;
use rolegate::config::{LogFormat, load_config, load_config_from_str};
use rolegate::roles::{CREATE, DELETE, PermissionMode, READ, UPDATE};
use std::env;
use std::fs;
use tempfile::tempdir;

const MINIMAL_CONFIG: &str = r#"
[policy.allow]
read = ["*"]
"#;

const FULL_CONFIG: &str = r#"
[policy]
owner = "article"

[policy.allow]
read = ["*"]
crud = ["admin"]
update = ["editor"]
"0016 billing refund" = ["finance"]

[policy.deny]
delete = ["intern"]
read = ["banned"]

[policy.deny_another]
update = ["admin", "editor"]

[logging]
level = "warn"
format = "json"
"#;

#[test]
fn test_minimal_config() {
    let config = load_config_from_str(MINIMAL_CONFIG).unwrap();
    let permission = config.policy.build().unwrap();

    assert!(permission.has_permission_for_roles(&READ, &["guest"]));
    assert!(!permission.has_permission_for_roles(&UPDATE, &["guest"]));
    assert_eq!(config.logging.format, LogFormat::Pretty);
}

#[test]
fn test_full_config() {
    let config = load_config_from_str(FULL_CONFIG).unwrap();
    assert_eq!(config.logging.level, "warn");
    assert_eq!(config.logging.format, LogFormat::Json);

    let permission = config.policy.build().unwrap();
    assert_eq!(permission.owner(), Some("article"));

    // crud expands for admin
    assert!(permission.has_permission_for_roles(&CREATE, &["admin"]));
    assert!(permission.has_permission_for_roles(&DELETE, &["admin"]));

    // deny list
    assert!(!permission.has_permission_for_roles(&DELETE, &["intern"]));
    assert!(!permission.has_permission_for_roles(&READ, &["banned"]));
    assert!(permission.has_permission_for_roles(&READ, &["guest"]));

    // deny_another limits update to admin and editor
    assert!(permission.has_permission_for_roles(&UPDATE, &["editor"]));
    assert!(!permission.has_permission_for_roles(&UPDATE, &["intern"]));

    // descriptor keys
    let refund = PermissionMode::new("billing", "refund", 16);
    assert!(permission.has_permission_for_roles(&refund, &["finance"]));
    assert!(!permission.has_permission_for_roles(&refund, &["admin"]));
}

#[test]
fn test_config_defaults() {
    let config = load_config_from_str("").unwrap();
    let permission = config.policy.build().unwrap();

    assert!(permission.is_open());
    assert!(permission.owner().is_none());
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_unknown_mode_key() {
    let config_str = r#"
[policy.deny]
publish = ["intern"]
"#;

    let result = load_config_from_str(config_str);
    assert!(matches!(result, Err(ConfigError::UnknownMode { .. })));
}

#[test]
fn test_malformed_descriptor_key() {
    let config_str = r#"
[policy.allow]
"00x6 billing refund" = ["finance"]
"#;

    let result = load_config_from_str(config_str);
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

#[test]
#[serial_test::serial]
fn test_load_config_from_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("rolegate.toml");
    fs::write(&config_path, FULL_CONFIG).unwrap();

    let config = load_config(Some(config_path.to_str().unwrap())).unwrap();
    assert_eq!(config.policy.owner.as_deref(), Some("article"));
}

#[test]
fn test_load_config_missing_file() {
    let result = load_config(Some("/definitely/not/here/rolegate.toml"));
    assert!(matches!(result, Err(ConfigError::Load(_))));
}

#[test]
#[serial_test::serial]
fn test_env_var_overrides_file() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("rolegate.toml");
    fs::write(&config_path, FULL_CONFIG).unwrap();

    unsafe {
        env::set_var("ROLEGATE__LOGGING__LEVEL", "debug");
        env::set_var("ROLEGATE__POLICY__OWNER", "comment");
    }

    let config = load_config(Some(config_path.to_str().unwrap()));

    unsafe {
        env::remove_var("ROLEGATE__LOGGING__LEVEL");
        env::remove_var("ROLEGATE__POLICY__OWNER");
    }

    let config = config.unwrap();
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.policy.owner.as_deref(), Some("comment"));
}

#[test]
#[serial_test::serial]
fn test_env_var_invalid_level_rejected() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("rolegate.toml");
    fs::write(&config_path, MINIMAL_CONFIG).unwrap();

    unsafe {
        env::set_var("ROLEGATE__LOGGING__LEVEL", "chatty");
    }

    let result = load_config(Some(config_path.to_str().unwrap()));

    unsafe {
        env::remove_var("ROLEGATE__LOGGING__LEVEL");
    }

    assert!(matches!(result, Err(ConfigError::Invalid { .. })));
}

#[test]
#[serial_test::serial]
fn test_env_var_overrides_policy_list() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("rolegate.toml");
    fs::write(&config_path, MINIMAL_CONFIG).unwrap();

    unsafe {
        env::set_var("ROLEGATE__POLICY__ALLOW__UPDATE", "admin,editor");
        env::set_var("ROLEGATE__POLICY__DENY_ANOTHER__DELETE", "admin");
    }

    let config = load_config(Some(config_path.to_str().unwrap()));

    unsafe {
        env::remove_var("ROLEGATE__POLICY__ALLOW__UPDATE");
        env::remove_var("ROLEGATE__POLICY__DENY_ANOTHER__DELETE");
    }

    let config = config.unwrap();
    assert_eq!(
        config.policy.allow.get("update").unwrap(),
        &vec!["admin", "editor"]
    );
    // file entries survive the merge
    assert_eq!(config.policy.allow.get("read").unwrap(), &vec!["*"]);

    let permission = config.policy.build().unwrap();
    assert!(permission.has_permission_for_roles(&UPDATE, &["editor"]));
    assert!(!permission.has_permission_for_roles(&UPDATE, &["guest"]));
    assert!(permission.has_permission_for_roles(&READ, &["guest"]));
    assert_eq!(permission.denied_another_roles(&DELETE), ["admin"]);
}
