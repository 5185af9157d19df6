//! Error types for rolegate
//!
//! This module defines the error hierarchy used throughout the crate.
//! Permission checks themselves never fail with an error: `has_permission`
//! is total and degrades to a denial. Errors surface only from descriptor
//! parsing, configuration loading, and the `require` helper.

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Mode parse error: {0}")]
    Parse(#[from] ParseError),
}

/// Errors raised while decoding a `<level> <group> <name>` mode descriptor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("descriptor '{descriptor}' is too short to hold a level segment")]
    TooShort { descriptor: String },

    #[error("invalid level segment '{segment}': expected 4 decimal digits")]
    InvalidLevel { segment: String },

    #[error("expected whitespace after the level segment in '{descriptor}'")]
    MissingSeparator { descriptor: String },

    #[error("cannot split '{remainder}' into a group and a name")]
    InvalidNameParts { remainder: String },
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Unknown permission mode '{mode}'")]
    UnknownMode { mode: String },

    #[error("Invalid mode descriptor: {0}")]
    Parse(#[from] ParseError),
}

/// Returned by `Permission::require` when a check is denied
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("permission denied for mode '{mode}': {reason}")]
pub struct PermissionDeniedError {
    pub mode: String,
    pub reason: String,
}

impl PermissionDeniedError {
    pub fn new(mode: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            mode: mode.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, AppError>;
