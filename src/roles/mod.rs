//! Role-based permissions
//!
//! Provides CRUD permission modes and a per-entity allow/deny resolver.
//!
//! ## Permission Model
//!
//! Each [`Permission`] keeps three role lists per atomic mode:
//!
//! - `allow` - roles that may act in the mode
//! - `deny` - roles that may not, even if allowed
//! - `deny_another` - when non-empty, only these roles may act in the mode
//!
//! A permission with no allow rules at all is open: anything not denied is
//! allowed. The first allow rule for any mode closes it.
//!
//! ## Example
//!
//! ```rust
//! use rolegate::roles::{ANYONE, CRUD, DELETE, Identity, Permission, READ};
//!
//! let mut permission = Permission::new().with_owner("article");
//! permission
//!     .allow(&READ, &[ANYONE])
//!     .allow(&CRUD, &["admin"])
//!     .deny(&DELETE, &["intern"]);
//!
//! assert!(permission.has_permission(&READ, &[Identity::from("guest")]));
//! assert!(permission.has_permission(&DELETE, &[Identity::from("admin")]));
//! assert!(!permission.has_permission(&DELETE, &[Identity::from("guest")]));
//! ```

pub mod identity;
pub mod mode;
pub mod permission;

pub use identity::{ANYONE, Identity, LocalRoleExtender, Principal, RoleLister};
pub use mode::{
    CREATE, CRUD, DELETE, GLOBAL_GROUP, L_CREATE, L_CRUD, L_DELETE, L_NONE, L_READ, L_UPDATE,
    Level, NONE, PermissionMode, READ, UPDATE, parse_mode,
};
pub use permission::{Permission, PermissionDecision};
