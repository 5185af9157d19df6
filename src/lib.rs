//! rolegate
//!
//! A small role-based authorization engine: given a permission mode and a
//! set of role identities, decide whether an action is allowed.
//!
//! ## Features
//!
//! - **CRUD permission modes** as bit flags, where update and delete imply read
//! - **Three-tier policies** per mode: allow lists, deny lists and
//!   deny-unless-listed lists
//! - **Policy composition** by concatenating an inherited policy with overrides
//! - **Total checks**: malformed identities deny instead of erroring
//! - **Flexible configuration** via TOML files and environment variables
//!
//! ## Resolution Order
//!
//! ```text
//! deny-unless-listed → deny → open default → allow → deny
//! ```
//!
//! ## Example Configuration
//!
//! ```toml
//! [policy]
//! owner = "article"
//!
//! [policy.allow]
//! read = ["*"]                    # Anyone may read
//! crud = ["admin"]
//!
//! [policy.deny]
//! delete = ["intern"]
//! ```

pub mod config;
pub mod error;
pub mod roles;

// Re-export main types
pub use config::{AppConfig, load_config};
pub use error::{AppError, ConfigError, ParseError, PermissionDeniedError, Result};
pub use roles::{Identity, Permission, PermissionDecision, PermissionMode};
