//! Permission resolver
//!
//! A [`Permission`] holds three role lists per atomic mode and decides
//! whether a set of identities may act in a given mode. Rules are evaluated
//! in a fixed order; the first rule that matches decides:
//!
//! 1. `deny_another` - if the mode has a non-empty list and no candidate role
//!    is on it, deny
//! 2. `deny` - if any candidate role is on the mode's deny list, deny
//! 3. If no allow rule exists for any mode, allow (open policy)
//! 4. `allow` - if any candidate role is on the mode's allow list, allow
//! 5. Otherwise deny
//!
//! The [`ANYONE`](crate::roles::ANYONE) role matches in every membership test.

use crate::error::PermissionDeniedError;
use crate::roles::identity::{Identity, candidate_roles, includes_role};
use crate::roles::mode::PermissionMode;
use std::borrow::Cow;
use std::collections::HashMap;
use tracing::{debug, trace};

type RoleTable = HashMap<PermissionMode, Vec<String>>;

/// Result of a permission check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PermissionDecision {
    /// Access is allowed
    Allowed,
    /// Access is denied with a reason
    Denied(String),
}

impl PermissionDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, PermissionDecision::Allowed)
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, PermissionDecision::Denied(_))
    }
}

/// Allow/deny policy for a single protected entity
///
/// Lists are keyed by atomic modes only: passing the composite CRUD mode to
/// a mutator writes one entry per constituent mode.
#[derive(Debug, Clone, Default)]
pub struct Permission {
    owner: Option<String>,
    allowed: RoleTable,
    denied: RoleTable,
    denied_another: RoleTable,
}

impl Permission {
    /// Create an empty (open) permission
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the name of the role or entity this permission belongs to
    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Allow `roles` to act in `mode`
    pub fn allow<S: AsRef<str>>(&mut self, mode: &PermissionMode, roles: &[S]) -> &mut Self {
        trace!(mode = mode.name(), count = roles.len(), "Adding allow rule");
        append(&mut self.allowed, mode, roles);
        self
    }

    /// Deny `roles` from acting in `mode`
    pub fn deny<S: AsRef<str>>(&mut self, mode: &PermissionMode, roles: &[S]) -> &mut Self {
        trace!(mode = mode.name(), count = roles.len(), "Adding deny rule");
        append(&mut self.denied, mode, roles);
        self
    }

    /// Deny every role except `roles` from acting in `mode`
    pub fn deny_another<S: AsRef<str>>(
        &mut self,
        mode: &PermissionMode,
        roles: &[S],
    ) -> &mut Self {
        trace!(mode = mode.name(), count = roles.len(), "Adding deny-another rule");
        append(&mut self.denied_another, mode, roles);
        self
    }

    /// Combine two permissions into a new one.
    ///
    /// Every list is the concatenation of `self`'s entries followed by
    /// `other`'s. The owner comes from `other` when it has one, otherwise
    /// from `self`. Neither input is modified.
    pub fn concat(&self, other: &Permission) -> Permission {
        Permission {
            owner: other.owner.clone().or_else(|| self.owner.clone()),
            allowed: merge(&self.allowed, &other.allowed),
            denied: merge(&self.denied, &other.denied),
            denied_another: merge(&self.denied_another, &other.denied_another),
        }
    }

    pub fn allowed_roles(&self, mode: &PermissionMode) -> &[String] {
        lookup(&self.allowed, mode)
    }

    pub fn denied_roles(&self, mode: &PermissionMode) -> &[String] {
        lookup(&self.denied, mode)
    }

    pub fn denied_another_roles(&self, mode: &PermissionMode) -> &[String] {
        lookup(&self.denied_another, mode)
    }

    /// True while no allow rule has been added for any mode
    pub fn is_open(&self) -> bool {
        self.allowed.is_empty()
    }

    /// Decide whether `identities` may act in `mode`.
    ///
    /// An unrecognized identity denies the whole check. A composite mode is
    /// granted only if each of its atomic modes is.
    pub fn check(&self, mode: &PermissionMode, identities: &[Identity<'_>]) -> PermissionDecision {
        let Some(roles) = candidate_roles(identities) else {
            return PermissionDecision::Denied("unrecognized identity".to_string());
        };

        debug!(mode = mode.name(), roles = ?roles, "Checking permission");

        if mode.is_composite() {
            for atomic in mode.atomics() {
                let decision = self.check_roles(&atomic, &roles);
                if decision.is_denied() {
                    return decision;
                }
            }
            return PermissionDecision::Allowed;
        }

        self.check_roles(mode, &roles)
    }

    fn check_roles(&self, mode: &PermissionMode, roles: &[String]) -> PermissionDecision {
        if let Some(listed) = self.denied_another.get(mode)
            && !listed.is_empty()
            && !includes_role(listed, roles)
        {
            trace!(mode = mode.name(), "Matched deny-another rule");
            return PermissionDecision::Denied(format!(
                "only {:?} may {}",
                listed,
                mode.name()
            ));
        }

        if let Some(listed) = self.denied.get(mode)
            && includes_role(listed, roles)
        {
            trace!(mode = mode.name(), "Matched deny rule");
            return PermissionDecision::Denied(format!("role denied for {}", mode.name()));
        }

        if self.allowed.is_empty() {
            trace!(mode = mode.name(), "No allow rules defined, open policy");
            return PermissionDecision::Allowed;
        }

        if let Some(listed) = self.allowed.get(mode)
            && includes_role(listed, roles)
        {
            trace!(mode = mode.name(), "Matched allow rule");
            return PermissionDecision::Allowed;
        }

        PermissionDecision::Denied(format!("no role is allowed to {}", mode.name()))
    }

    pub fn has_permission(&self, mode: &PermissionMode, identities: &[Identity<'_>]) -> bool {
        self.check(mode, identities).is_allowed()
    }

    /// Check plain role names
    pub fn has_permission_for_roles<S: AsRef<str>>(
        &self,
        mode: &PermissionMode,
        roles: &[S],
    ) -> bool {
        let identities: Vec<Identity<'_>> = roles
            .iter()
            .map(|role| Identity::Role(Cow::Borrowed(role.as_ref())))
            .collect();
        self.has_permission(mode, &identities)
    }

    /// Check a permission, returning an error if denied
    pub fn require(
        &self,
        mode: &PermissionMode,
        identities: &[Identity<'_>],
    ) -> Result<(), PermissionDeniedError> {
        match self.check(mode, identities) {
            PermissionDecision::Allowed => Ok(()),
            PermissionDecision::Denied(reason) => {
                Err(PermissionDeniedError::new(mode.name(), reason))
            }
        }
    }
}

fn append<S: AsRef<str>>(table: &mut RoleTable, mode: &PermissionMode, roles: &[S]) {
    for atomic in mode.atomics() {
        table
            .entry(atomic)
            .or_default()
            .extend(roles.iter().map(|role| role.as_ref().to_string()));
    }
}

fn merge(first: &RoleTable, second: &RoleTable) -> RoleTable {
    let mut merged = first.clone();
    for (mode, roles) in second {
        merged
            .entry(mode.clone())
            .or_default()
            .extend(roles.iter().cloned());
    }
    merged
}

fn lookup<'a>(table: &'a RoleTable, mode: &PermissionMode) -> &'a [String] {
    table.get(mode).map(Vec::as_slice).unwrap_or(&[])
}
