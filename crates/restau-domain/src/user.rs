//! User domain types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Access level of an account.
///
/// Wire and storage format: `"admin"`, `"employe"`, `"client"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    Employe,
    Client,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Employe => "employe",
            Self::Client => "client",
        }
    }

    pub fn is_admin(self) -> bool {
        self == Self::Admin
    }

    /// Admins and employees.
    pub fn is_staff(self) -> bool {
        matches!(self, Self::Admin | Self::Employe)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string cannot be parsed as a [`UserRole`].
#[derive(Debug, Error)]
#[error("unknown user role: {0:?}")]
pub struct UnknownRole(pub String);

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "employe" => Ok(Self::Employe),
            "client" => Ok(Self::Client),
            other => Err(UnknownRole(other.to_owned())),
        }
    }
}
