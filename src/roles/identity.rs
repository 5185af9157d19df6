//! Role identities
//!
//! A permission check is made on behalf of one or more identities. An
//! identity is either a bare role name or a subject that can list its own
//! role names. Input coming from untyped sources (JSON request payloads)
//! may be neither; such identities are kept as [`Identity::Unrecognized`]
//! so the check can fail closed instead of erroring.

use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use tracing::warn;

/// Sentinel role name that matches any identity
pub const ANYONE: &str = "*";

/// A subject that can enumerate its own role names
pub trait RoleLister {
    fn roles(&self) -> Vec<String>;
}

/// A subject whose role list can be extended with locally granted roles
pub trait LocalRoleExtender {
    fn extend_local_roles(&mut self, roles: &[&str]);
}

/// A user or service principal holding a flat list of roles
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    roles: Vec<String>,
}

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            roles: Vec::new(),
        }
    }

    /// Add a role (builder style)
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

impl RoleLister for Principal {
    fn roles(&self) -> Vec<String> {
        self.roles.clone()
    }
}

impl LocalRoleExtender for Principal {
    fn extend_local_roles(&mut self, roles: &[&str]) {
        for role in roles {
            if !self.has_role(role) {
                self.roles.push((*role).to_string());
            }
        }
    }
}

/// One identity taking part in a permission check
pub enum Identity<'a> {
    /// A single role name
    Role(Cow<'a, str>),
    /// A subject exposing its role names
    Subject(&'a dyn RoleLister),
    /// An owned list of role names
    Roles(Vec<String>),
    /// Input that is neither a role name nor a role list
    Unrecognized(String),
}

impl<'a> Identity<'a> {
    /// Interpret an untyped JSON value as an identity.
    ///
    /// Strings become role names; arrays of strings and objects with a
    /// `roles` array of strings become role lists. Anything else is
    /// unrecognized.
    pub fn from_json(value: &Value) -> Identity<'static> {
        match value {
            Value::String(role) => Identity::Role(Cow::Owned(role.clone())),
            Value::Array(items) => string_list(items)
                .map(Identity::Roles)
                .unwrap_or_else(|| Identity::Unrecognized(value.to_string())),
            Value::Object(fields) => fields
                .get("roles")
                .and_then(Value::as_array)
                .and_then(|items| string_list(items))
                .map(Identity::Roles)
                .unwrap_or_else(|| Identity::Unrecognized(value.to_string())),
            _ => Identity::Unrecognized(value.to_string()),
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Identity::Unrecognized(_))
    }
}

fn string_list(items: &[Value]) -> Option<Vec<String>> {
    items
        .iter()
        .map(|item| item.as_str().map(str::to_string))
        .collect()
}

impl fmt::Debug for Identity<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identity::Role(role) => f.debug_tuple("Role").field(role).finish(),
            Identity::Subject(subject) => {
                f.debug_tuple("Subject").field(&subject.roles()).finish()
            }
            Identity::Roles(roles) => f.debug_tuple("Roles").field(roles).finish(),
            Identity::Unrecognized(raw) => f.debug_tuple("Unrecognized").field(raw).finish(),
        }
    }
}

impl<'a> From<&'a str> for Identity<'a> {
    fn from(role: &'a str) -> Self {
        Identity::Role(Cow::Borrowed(role))
    }
}

impl From<String> for Identity<'static> {
    fn from(role: String) -> Self {
        Identity::Role(Cow::Owned(role))
    }
}

impl<'a> From<&'a Principal> for Identity<'a> {
    fn from(principal: &'a Principal) -> Self {
        Identity::Subject(principal)
    }
}

/// Flatten identities into candidate role names.
///
/// Returns `None` as soon as an unrecognized identity is found.
pub(crate) fn candidate_roles(identities: &[Identity<'_>]) -> Option<Vec<String>> {
    let mut names = Vec::new();
    for identity in identities {
        match identity {
            Identity::Role(role) => names.push(role.to_string()),
            Identity::Subject(subject) => names.extend(subject.roles()),
            Identity::Roles(roles) => names.extend(roles.iter().cloned()),
            Identity::Unrecognized(raw) => {
                warn!(identity = %raw, "Invalid role identity, denying");
                return None;
            }
        }
    }
    Some(names)
}

/// True if any candidate role appears in `listed`, or either side holds [`ANYONE`]
pub(crate) fn includes_role(listed: &[String], candidates: &[String]) -> bool {
    let anyone = |roles: &[String]| roles.iter().any(|role| role == ANYONE);
    if anyone(listed) || anyone(candidates) {
        return true;
    }
    candidates
        .iter()
        .any(|candidate| listed.iter().any(|role| role == candidate))
}
