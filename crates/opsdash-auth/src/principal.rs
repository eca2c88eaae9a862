//! The authenticated principal threaded through every operation.

use serde::{Deserialize, Serialize};

use opsdash_core::types::id::{DepartmentId, UserId};
use opsdash_entity::user::{Authority, Role, User};

/// The identity acting in a request.
///
/// Supplied by the session layer (decoded from the session token) and
/// trusted verbatim by the lifecycle engine and query layer. The
/// [`Authority`] is resolved exactly once, here, from the designation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    /// The user's ID.
    pub id: UserId,
    /// Full display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Management tier.
    pub role: Role,
    /// Free-text designation.
    pub designation: String,
    /// The user's own department.
    pub department_id: DepartmentId,
    /// Junior dashboard soft-disable flag.
    pub dashboard_access_enabled: bool,
    /// Approval authority resolved from the designation.
    pub authority: Authority,
}

impl Principal {
    /// Build a principal from a user row, resolving authority.
    pub fn from_user(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            designation: user.designation.clone(),
            department_id: user.department_id,
            dashboard_access_enabled: user.dashboard_access_enabled,
            authority: Authority::from_designation(&user.designation),
        }
    }

    /// Whether this principal is senior management.
    pub fn is_senior(&self) -> bool {
        self.role.is_senior()
    }
}
