//! Approval authority resolved from a user's designation.

use serde::{Deserialize, Serialize};

/// Approval authority conferred by a designation.
///
/// Resolved exactly once when a principal is loaded; no other code
/// re-derives authority from designation text. The matching rules follow
/// the provisioning data: the designation "CMD" (case-insensitive exact
/// match) acts across all departments, and any designation containing
/// "director" (case-insensitive) acts within its own department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Authority {
    /// Unrestricted visibility and mutation rights across all departments.
    Global,
    /// Elevated rights scoped to the user's own department.
    Department,
    /// No approval authority.
    None,
}

impl Authority {
    /// Resolve the authority conferred by a free-text designation.
    pub fn from_designation(designation: &str) -> Self {
        if designation.eq_ignore_ascii_case("cmd") {
            Self::Global
        } else if designation.to_lowercase().contains("director") {
            Self::Department
        } else {
            Self::None
        }
    }

    /// Whether this authority acts across every department.
    pub fn is_global(&self) -> bool {
        matches!(self, Self::Global)
    }
}
