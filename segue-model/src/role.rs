//! Viewer and creator roles.
//!
//! Upstream role strings arrive with inconsistent casing and stray whitespace
//! ("Admin", " ADMIN\n"), so parsing normalizes before matching.

use std::fmt;

/// Well-known role names
pub mod roles {
    pub const ADMIN: &str = "admin";
    pub const USER: &str = "user";
    pub const GUEST: &str = "guest";
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub enum Role {
    Admin,
    #[default]
    User,
    Guest,
    /// Any other role, stored normalized.
    Other(String),
}

impl Role {
    pub fn parse(raw: &str) -> Self {
        let normalized = normalize(raw);
        match normalized.as_str() {
            roles::ADMIN => Role::Admin,
            roles::USER => Role::User,
            roles::GUEST => Role::Guest,
            _ => Role::Other(normalized),
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Role::Admin => roles::ADMIN,
            Role::User => roles::USER,
            Role::Guest => roles::GUEST,
            Role::Other(name) => name,
        }
    }
}

/// Trim and lowercase a role string for comparison.
pub fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl From<&str> for Role {
    fn from(raw: &str) -> Self {
        Role::parse(raw)
    }
}

impl From<String> for Role {
    fn from(raw: String) -> Self {
        Role::parse(&raw)
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        role.as_str().to_string()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
