//! Configuration types for rolegate
//!
//! This module defines the configuration structure that can be loaded from
//! TOML files and/or environment variables.

use crate::error::ConfigError;
use crate::roles::{Identity, Permission, PermissionDecision, PermissionMode, parse_mode};
use serde::Deserialize;
use std::collections::HashMap;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Permission rules
    pub policy: PolicyConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Permission rules for one protected entity
///
/// Each table maps a mode key to role names. A mode key is either a
/// predefined mode name (`create`, `read`, `update`, `delete`, `crud`) or a
/// mode descriptor such as `"0016 billing refund"`.
///
/// ```toml
/// [policy]
/// owner = "article"
///
/// [policy.allow]
/// read = ["*"]
/// crud = ["admin"]
///
/// [policy.deny]
/// delete = ["intern"]
///
/// [policy.deny_another]
/// update = ["admin", "editor"]
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Name of the role or entity owning this policy
    pub owner: Option<String>,

    /// Roles allowed per mode
    pub allow: HashMap<String, Vec<String>>,

    /// Roles denied per mode
    pub deny: HashMap<String, Vec<String>>,

    /// Per mode, the only roles that are not denied
    pub deny_another: HashMap<String, Vec<String>>,
}

impl PolicyConfig {
    /// Build a [`Permission`] from these rules
    pub fn build(&self) -> Result<Permission, ConfigError> {
        let mut permission = match &self.owner {
            Some(owner) => Permission::new().with_owner(owner.as_str()),
            None => Permission::new(),
        };

        for (key, roles) in &self.allow {
            permission.allow(&resolve_mode(key)?, roles);
        }
        for (key, roles) in &self.deny {
            permission.deny(&resolve_mode(key)?, roles);
        }
        for (key, roles) in &self.deny_another {
            permission.deny_another(&resolve_mode(key)?, roles);
        }

        Ok(permission)
    }

    /// Build the policy and check `identities` against the mode named by `mode_key`
    pub fn check(
        &self,
        mode_key: &str,
        identities: &[Identity<'_>],
    ) -> crate::Result<PermissionDecision> {
        let permission = self.build()?;
        let mode = resolve_mode(mode_key)?;
        Ok(permission.check(&mode, identities))
    }
}

/// Resolve a mode key to a mode
pub fn resolve_mode(key: &str) -> Result<PermissionMode, ConfigError> {
    if let Some(mode) = PermissionMode::from_name(key) {
        return Ok(mode.clone());
    }

    if key.starts_with(|c: char| c.is_ascii_digit()) {
        return Ok(parse_mode(key)?);
    }

    Err(ConfigError::UnknownMode {
        mode: key.to_string(),
    })
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
