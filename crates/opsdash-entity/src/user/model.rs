//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use opsdash_core::types::id::{DepartmentId, UserId};

use super::Role;

/// An employee account. Provisioned by admin flows; never deleted
/// (juniors are soft-disabled via `dashboard_access_enabled`).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Full display name.
    pub name: String,
    /// Login email, unique, matched case-insensitively.
    pub email: String,
    /// Argon2 hash of the login password.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Management tier.
    pub role: Role,
    /// Free-text designation (e.g., "CMD", "Director (HR)", "GGM (Production)").
    pub designation: String,
    /// The department this user belongs to.
    pub department_id: DepartmentId,
    /// The user this user reports to, if any. Organizational metadata;
    /// not consulted by the file lifecycle.
    pub reporting_to: Option<UserId>,
    /// Whether a junior account may view the dashboards.
    pub dashboard_access_enabled: bool,
    /// When the account was provisioned.
    pub created_at: DateTime<Utc>,
}
