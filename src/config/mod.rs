//! Configuration module
//!
//! Loads policy rules and logging settings from TOML files and environment
//! variables, and turns the policy section into a [`Permission`](crate::roles::Permission).

pub mod loader;
pub mod types;

pub use loader::{load_config, load_config_from_str};
pub use types::{AppConfig, LogFormat, LoggingConfig, PolicyConfig, resolve_mode};
