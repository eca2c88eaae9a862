//! Department repository implementation.

use sqlx::PgPool;

use opsdash_core::error::{AppError, ErrorKind};
use opsdash_core::result::AppResult;
use opsdash_core::types::id::DepartmentId;
use opsdash_entity::department::Department;

/// Repository for department reference data.
#[derive(Debug, Clone)]
pub struct DepartmentRepository {
    pool: PgPool,
}

impl DepartmentRepository {
    /// Create a new department repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a department by ID.
    pub async fn find_by_id(&self, id: DepartmentId) -> AppResult<Option<Department>> {
        sqlx::query_as::<_, Department>("SELECT * FROM departments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find department", e))
    }

    /// List all departments ordered by name.
    pub async fn list_all(&self) -> AppResult<Vec<Department>> {
        sqlx::query_as::<_, Department>("SELECT * FROM departments ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list departments", e)
            })
    }

    /// Check that a department exists.
    pub async fn exists(&self, id: DepartmentId) -> AppResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM departments WHERE id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to check department", e)
            })?;
        Ok(count > 0)
    }
}
