//! Action log repository implementation.
//!
//! The log is append-only. The two sanctioned mutations are the approval
//! stamp written at entry creation time and the explicit nulling of
//! `pending_file_id` before a referenced pending row is deleted; the
//! column is a weak reference with no database constraint.

use sqlx::{PgConnection, PgPool};

use opsdash_core::error::{AppError, ErrorKind};
use opsdash_core::result::AppResult;
use opsdash_core::types::id::{DepartmentId, FileId, UserId};
use opsdash_entity::log::{ActionLogEntry, ActivityEntry, CreateActionLogEntry};

/// Columns selected for the activity projection. Approval statuses are
/// subqueried live so the screen reflects decisions made after the entry
/// was written.
const ACTIVITY_SELECT: &str = "SELECT \
     l.id, l.file_id, l.action, l.created_at, l.details, \
     l.target_department_id, l.pending_file_id, l.actor_id, \
     u_actor.name AS actor_name, \
     u_actor.designation AS actor_designation, \
     d_actor.name AS actor_department_name, \
     f.display_name AS file_display_name, \
     d_target.name AS target_department_name, \
     (SELECT approval FROM file_records WHERE id = l.file_id) AS file_approval_status, \
     (SELECT approval FROM file_records WHERE id = l.pending_file_id) AS pending_file_approval_status, \
     u_approval.name AS approval_actor_name, \
     l.approval_at, l.notes \
     FROM file_actions_log l \
     LEFT JOIN users u_actor ON l.actor_id = u_actor.id \
     LEFT JOIN departments d_actor ON l.actor_department_id = d_actor.id \
     LEFT JOIN file_records f ON l.file_id = f.id \
     LEFT JOIN departments d_target ON l.target_department_id = d_target.id \
     LEFT JOIN users u_approval ON l.approval_actor_id = u_approval.id";

/// Repository for the append-only file action log.
#[derive(Debug, Clone)]
pub struct ActionLogRepository {
    pool: PgPool,
}

impl ActionLogRepository {
    /// Create a new action log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append a new entry within a lifecycle transaction.
    ///
    /// Accept/reject entries carry their approval stamp from creation;
    /// `approval_at` is set whenever an approval actor is present.
    pub async fn append(
        &self,
        conn: &mut PgConnection,
        entry: &CreateActionLogEntry,
    ) -> AppResult<ActionLogEntry> {
        sqlx::query_as::<_, ActionLogEntry>(
            "INSERT INTO file_actions_log \
             (file_id, action, actor_id, actor_department_id, target_department_id, \
              details, approval_actor_id, approval_at, notes, pending_file_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, \
                     CASE WHEN $7::uuid IS NULL THEN NULL ELSE NOW() END, $8, $9) \
             RETURNING *",
        )
        .bind(entry.file_id)
        .bind(entry.action)
        .bind(entry.actor_id)
        .bind(entry.actor_department_id)
        .bind(entry.target_department_id)
        .bind(&entry.details)
        .bind(entry.approval_actor_id)
        .bind(&entry.notes)
        .bind(entry.pending_file_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to append log entry", e))
    }

    /// Null out every log reference to a pending record that is about to
    /// be removed, so no entry dangles.
    pub async fn clear_pending_references(
        &self,
        conn: &mut PgConnection,
        pending_id: FileId,
    ) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE file_actions_log SET pending_file_id = NULL WHERE pending_file_id = $1",
        )
        .bind(pending_id)
        .execute(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to clear log references", e)
        })?;
        Ok(result.rows_affected())
    }

    /// List the newest entries across all departments.
    pub async fn list_all(&self, limit: i64) -> AppResult<Vec<ActivityEntry>> {
        let query = format!("{ACTIVITY_SELECT} ORDER BY l.created_at DESC LIMIT $1");
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list activity log", e)
            })
    }

    /// List the newest entries targeting one department.
    pub async fn list_by_target_department(
        &self,
        department_id: DepartmentId,
        limit: i64,
    ) -> AppResult<Vec<ActivityEntry>> {
        let query = format!(
            "{ACTIVITY_SELECT} WHERE l.target_department_id = $1 \
             ORDER BY l.created_at DESC LIMIT $2"
        );
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(department_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list activity log", e)
            })
    }

    /// List the newest entries authored by one user.
    pub async fn list_by_actor(&self, actor_id: UserId, limit: i64) -> AppResult<Vec<ActivityEntry>> {
        let query = format!(
            "{ACTIVITY_SELECT} WHERE l.actor_id = $1 ORDER BY l.created_at DESC LIMIT $2"
        );
        sqlx::query_as::<_, ActivityEntry>(&query)
            .bind(actor_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list activity log", e)
            })
    }
}
