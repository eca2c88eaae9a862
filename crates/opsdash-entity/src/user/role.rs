//! User role enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Management tiers recognized by the dashboard.
///
/// Only seniors interact with the file lifecycle; juniors have read-only
/// dashboard access gated by a per-user flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Senior management: may upload, edit, and (with authority) approve files.
    Senior,
    /// Junior management: dashboard viewing only.
    Junior,
}

impl Role {
    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Senior => "senior",
            Self::Junior => "junior",
        }
    }

    /// Check if this role is senior management.
    pub fn is_senior(&self) -> bool {
        matches!(self, Self::Senior)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = opsdash_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "senior" => Ok(Self::Senior),
            "junior" => Ok(Self::Junior),
            _ => Err(opsdash_core::AppError::validation(format!(
                "Invalid user role: '{s}'. Expected one of: senior, junior"
            ))),
        }
    }
}
