//! User repository implementation.

use sqlx::PgPool;

use opsdash_core::error::{AppError, ErrorKind};
use opsdash_core::result::AppResult;
use opsdash_core::types::id::{DepartmentId, UserId};
use opsdash_entity::user::{Role, User};

/// Repository for user accounts.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a user by ID.
    pub async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }

    /// Find a user by email, matched case-insensitively.
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER($1)")
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by email", e)
            })
    }

    /// Find a user by email and role, matched case-insensitively.
    pub async fn find_by_email_and_role(&self, email: &str, role: Role) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE LOWER(email) = LOWER($1) AND role = $2",
        )
        .bind(email.trim())
        .bind(role)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find user by email/role", e)
        })
    }

    /// List all junior users, ordered by department then name.
    pub async fn list_juniors(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = 'junior' ORDER BY department_id, name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list juniors", e))
    }

    /// List junior users of one department, ordered by name.
    pub async fn list_juniors_by_department(
        &self,
        department_id: DepartmentId,
    ) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>(
            "SELECT * FROM users WHERE role = 'junior' AND department_id = $1 ORDER BY name",
        )
        .bind(department_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list juniors", e))
    }

    /// Toggle the dashboard-access flag of a junior account.
    ///
    /// Returns `false` when the target does not exist or is not a junior.
    pub async fn set_dashboard_access(&self, user_id: UserId, enabled: bool) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET dashboard_access_enabled = $2 WHERE id = $1 AND role = 'junior'",
        )
        .bind(user_id)
        .bind(enabled)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update dashboard access", e)
        })?;
        Ok(result.rows_affected() > 0)
    }
}
