//! Profile lookups and junior dashboard-access management.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use opsdash_auth::principal::Principal;
use opsdash_core::error::AppError;
use opsdash_core::result::AppResult;
use opsdash_core::types::id::{DepartmentId, UserId};
use opsdash_database::repositories::department::DepartmentRepository;
use opsdash_database::repositories::user::UserRepository;
use opsdash_entity::user::{Role, User};

/// A user's own profile, resolved with the department name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// User identifier.
    pub id: UserId,
    /// Full display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Management tier.
    pub role: Role,
    /// Free-text designation.
    pub designation: String,
    /// Department identifier.
    pub department_id: DepartmentId,
    /// Resolved department name.
    pub department_name: Option<String>,
    /// Junior dashboard soft-disable flag.
    pub dashboard_access_enabled: bool,
}

/// User directory: profile reads and junior access toggling.
#[derive(Debug, Clone)]
pub struct DirectoryService {
    users: Arc<UserRepository>,
    departments: Arc<DepartmentRepository>,
}

impl DirectoryService {
    /// Create a new directory service.
    pub fn new(users: Arc<UserRepository>, departments: Arc<DepartmentRepository>) -> Self {
        Self { users, departments }
    }

    /// The principal's own profile, read fresh from the database.
    pub async fn profile(&self, principal: &Principal) -> AppResult<Profile> {
        let user = self
            .users
            .find_by_id(principal.id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let department_name = self
            .departments
            .find_by_id(user.department_id)
            .await?
            .map(|d| d.name);

        Ok(Profile {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            designation: user.designation,
            department_id: user.department_id,
            department_name,
            dashboard_access_enabled: user.dashboard_access_enabled,
        })
    }

    /// Junior users visible to a senior: all of them for globally-acting
    /// principals, own department otherwise.
    pub async fn juniors(&self, principal: &Principal) -> AppResult<Vec<User>> {
        if !principal.is_senior() {
            return Err(AppError::forbidden("Access denied. Senior management only."));
        }

        if principal.authority.is_global() {
            self.users.list_juniors().await
        } else {
            self.users
                .list_juniors_by_department(principal.department_id)
                .await
        }
    }

    /// Toggle a junior account's dashboard access.
    pub async fn set_dashboard_access(
        &self,
        principal: &Principal,
        junior_id: UserId,
        enabled: bool,
    ) -> AppResult<()> {
        if !principal.is_senior() {
            return Err(AppError::forbidden("Access denied. Senior management only."));
        }

        let updated = self.users.set_dashboard_access(junior_id, enabled).await?;
        if !updated {
            return Err(AppError::not_found("Junior user not found or not a junior"));
        }

        info!(
            user_id = %principal.id,
            junior_id = %junior_id,
            enabled,
            "Junior dashboard access updated"
        );
        Ok(())
    }
}
