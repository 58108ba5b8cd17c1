//! Typed role enumeration.
//!
//! Roles are stored as lowercase text in `users.role` (CHECK-constrained
//! by the migration that creates the table) and compared as an enum
//! everywhere else. The string forms here must match that constraint.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Engineering,
    Maintenance,
    Viewer,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Admin,
        Role::Engineering,
        Role::Maintenance,
        Role::Viewer,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Engineering => "engineering",
            Role::Maintenance => "maintenance",
            Role::Viewer => "viewer",
        }
    }

    /// Staff roles may mutate inventory data (equipment, work orders).
    pub fn is_staff(self) -> bool {
        !matches!(self, Role::Viewer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "engineering" => Ok(Role::Engineering),
            "maintenance" => Ok(Role::Maintenance),
            "viewer" => Ok(Role::Viewer),
            _ => Err(()),
        }
    }
}
