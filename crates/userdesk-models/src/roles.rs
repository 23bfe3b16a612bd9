//! Role tags and the role filter used by the user list.
//!
//! The role set is closed. Tags are parsed case-insensitively and always
//! serialized in lowercase, matching what the API sends.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Manager,
    Financial,
    Academic,
    State,
    Center,
    Teacher,
    #[serde(rename = "cardadmin")]
    CardAdmin,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown role: {0}")]
pub struct RoleParseError(pub String);

impl Role {
    pub const ALL: [Role; 8] = [
        Role::Admin,
        Role::Manager,
        Role::Financial,
        Role::Academic,
        Role::State,
        Role::Center,
        Role::Teacher,
        Role::CardAdmin,
    ];

    /// Wire tag of the role.
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Financial => "financial",
            Role::Academic => "academic",
            Role::State => "state",
            Role::Center => "center",
            Role::Teacher => "teacher",
            Role::CardAdmin => "cardadmin",
        }
    }

    /// Human-readable label for selection lists.
    pub const fn label(self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::Manager => "Manager",
            Role::Financial => "Financial Partner",
            Role::Academic => "Academic Coordinator",
            Role::State => "State",
            Role::Center => "Center",
            Role::Teacher => "Teacher",
            Role::CardAdmin => "Card Admin",
        }
    }

    /// Case-insensitive tag comparison.
    pub fn matches_tag(self, tag: &str) -> bool {
        self.as_str().eq_ignore_ascii_case(tag.trim())
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|role| role.matches_tag(s))
            .ok_or_else(|| RoleParseError(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let tag = String::deserialize(deserializer)?;
        tag.parse().map_err(serde::de::Error::custom)
    }
}

/// Role filter selected in the list toolbar.
///
/// `"all"` lifts the restriction; any other value must match a role tag
/// exactly (ignoring case). A value that names no role matches nothing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RoleFilter {
    #[default]
    All,
    Only(Role),
    Unmatched(String),
}

impl RoleFilter {
    pub const ALL_TAG: &'static str = "all";

    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.eq_ignore_ascii_case(Self::ALL_TAG) {
            return RoleFilter::All;
        }
        match value.parse::<Role>() {
            Ok(role) => RoleFilter::Only(role),
            Err(_) => RoleFilter::Unmatched(value.to_string()),
        }
    }

    pub fn admits(&self, role: Role) -> bool {
        match self {
            RoleFilter::All => true,
            RoleFilter::Only(only) => *only == role,
            RoleFilter::Unmatched(_) => false,
        }
    }

    /// The selected role, if the filter names exactly one.
    pub fn role(&self) -> Option<Role> {
        match self {
            RoleFilter::Only(role) => Some(*role),
            _ => None,
        }
    }
}

impl fmt::Display for RoleFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoleFilter::All => f.write_str(Self::ALL_TAG),
            RoleFilter::Only(role) => write!(f, "{}", role),
            RoleFilter::Unmatched(raw) => f.write_str(raw),
        }
    }
}

impl From<&str> for RoleFilter {
    fn from(value: &str) -> Self {
        RoleFilter::parse(value)
    }
}
