//! Permission modes
//!
//! A mode is a `(group, name, level)` triple. Levels are bit flags, so
//! "does this mode cover that level" is a single bitwise test. Update and
//! delete carry the read bit, which makes both imply read without any
//! hierarchy lookup.
//!
//! Modes can also be decoded from descriptor strings of the form
//! `<level:4> <group> <name>`, e.g. `0002 system read`.

use crate::error::ParseError;
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Bitmask type for mode levels
pub type Level = u32;

/// Group of the predefined modes
pub const GLOBAL_GROUP: &str = "";

pub const L_NONE: Level = 0;
pub const L_CREATE: Level = 1;
pub const L_READ: Level = 2;
pub const L_UPDATE: Level = L_READ | 4;
pub const L_DELETE: Level = L_READ | 8;
pub const L_CRUD: Level = L_CREATE | L_READ | L_UPDATE | L_DELETE;

/// No permission
pub const NONE: PermissionMode = PermissionMode::predefined("none", L_NONE);
/// Create permission
pub const CREATE: PermissionMode = PermissionMode::predefined("create", L_CREATE);
/// Read permission
pub const READ: PermissionMode = PermissionMode::predefined("read", L_READ);
/// Update permission (implies read)
pub const UPDATE: PermissionMode = PermissionMode::predefined("update", L_UPDATE);
/// Delete permission (implies read)
pub const DELETE: PermissionMode = PermissionMode::predefined("delete", L_DELETE);
/// Create + read + update + delete
pub const CRUD: PermissionMode = PermissionMode::predefined("crud", L_CRUD);

static PREDEFINED: [PermissionMode; 6] = [NONE, CREATE, READ, UPDATE, DELETE, CRUD];
static CRUD_ATOMICS: [PermissionMode; 4] = [CREATE, READ, UPDATE, DELETE];

/// A named permission level within a group
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PermissionMode {
    group: Cow<'static, str>,
    name: Cow<'static, str>,
    level: Level,
}

impl PermissionMode {
    /// Create a custom mode
    pub fn new(group: impl Into<String>, name: impl Into<String>, level: Level) -> Self {
        Self {
            group: Cow::Owned(group.into()),
            name: Cow::Owned(name.into()),
            level,
        }
    }

    const fn predefined(name: &'static str, level: Level) -> Self {
        Self {
            group: Cow::Borrowed(GLOBAL_GROUP),
            name: Cow::Borrowed(name),
            level,
        }
    }

    /// All predefined modes, composite last
    pub fn predefined_modes() -> &'static [PermissionMode] {
        &PREDEFINED
    }

    /// Look up a predefined mode by name
    pub fn from_name(name: &str) -> Option<&'static PermissionMode> {
        PREDEFINED.iter().find(|mode| mode.name() == name)
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// True if this mode shares at least one bit with `level`
    pub fn accept(&self, level: Level) -> bool {
        self.level & level != 0
    }

    /// True for the global CRUD composite
    pub fn is_composite(&self) -> bool {
        self.group == GLOBAL_GROUP && self.level == L_CRUD
    }

    /// Atomic modes this mode stands for.
    ///
    /// The composite expands to create, read, update and delete; every other
    /// mode is its own single atomic.
    pub fn atomics(&self) -> Vec<PermissionMode> {
        if self.is_composite() {
            CRUD_ATOMICS.to_vec()
        } else {
            vec![self.clone()]
        }
    }
}

impl fmt::Display for PermissionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04} {} {}", self.level, self.group, self.name)
    }
}

impl FromStr for PermissionMode {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_mode(s)
    }
}

/// Decode a `<level:4> <group> <name>` descriptor.
///
/// Fields are separated by single whitespace characters. The group may be
/// empty (`"0002  read"` is the global read mode); the name must be a single
/// non-empty token.
pub fn parse_mode(descriptor: &str) -> Result<PermissionMode, ParseError> {
    if descriptor.len() < 4 {
        return Err(ParseError::TooShort {
            descriptor: descriptor.to_string(),
        });
    }

    let segment = descriptor
        .get(..4)
        .filter(|segment| segment.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| ParseError::InvalidLevel {
            segment: descriptor.chars().take(4).collect(),
        })?;

    let level: Level = segment.parse().map_err(|_| ParseError::InvalidLevel {
        segment: segment.to_string(),
    })?;

    let remainder = descriptor[4..]
        .strip_prefix(char::is_whitespace)
        .ok_or_else(|| ParseError::MissingSeparator {
            descriptor: descriptor.to_string(),
        })?;

    let invalid_parts = || ParseError::InvalidNameParts {
        remainder: remainder.to_string(),
    };

    let (group, name) = remainder
        .split_once(char::is_whitespace)
        .ok_or_else(invalid_parts)?;
    if name.is_empty()
        || name.contains(char::is_whitespace)
        || group.contains(char::is_whitespace)
    {
        return Err(invalid_parts());
    }

    Ok(PermissionMode::new(group, name, level))
}
