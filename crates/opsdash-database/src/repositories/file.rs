//! File record repository implementation.
//!
//! Read-side queries run against the pool; every method that takes a
//! `&mut PgConnection` is meant to be called inside a lifecycle
//! transaction so the `FOR UPDATE` locks serialize writers per lineage.

use sqlx::{PgConnection, PgPool};

use opsdash_core::error::{AppError, ErrorKind};
use opsdash_core::result::AppResult;
use opsdash_core::types::id::{DepartmentId, FileId, UserId};
use opsdash_entity::file::{CreateFileRecord, FileOverview, FileRecord};

/// Columns selected for the listing projection.
const OVERVIEW_SELECT: &str = "SELECT \
     f.id, f.stored_key, f.display_name, f.uploaded_at, f.status, f.approval, \
     f.uploaded_by, f.department_id, f.parent_file_id, \
     u.name AS uploader_name, d.name AS department_name, \
     EXISTS(SELECT 1 FROM file_records p WHERE p.parent_file_id = f.id AND p.status = 'pending_edit') AS has_pending_edit \
     FROM file_records f \
     JOIN users u ON f.uploaded_by = u.id \
     JOIN departments d ON f.department_id = d.id \
     WHERE f.status IN ('active', 'pending_edit')";

/// Repository for file record CRUD and listing queries.
#[derive(Debug, Clone)]
pub struct FileRepository {
    pool: PgPool,
}

impl FileRepository {
    /// Create a new file repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a file record by ID.
    pub async fn find_by_id(&self, id: FileId) -> AppResult<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>("SELECT * FROM file_records WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find file", e))
    }

    /// List active and pending records across all departments, newest-first.
    pub async fn list_overview_all(&self) -> AppResult<Vec<FileOverview>> {
        let query = format!("{OVERVIEW_SELECT} ORDER BY f.uploaded_at DESC");
        sqlx::query_as::<_, FileOverview>(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    /// List active and pending records of one department, newest-first.
    pub async fn list_overview_by_department(
        &self,
        department_id: DepartmentId,
    ) -> AppResult<Vec<FileOverview>> {
        let query = format!("{OVERVIEW_SELECT} AND f.department_id = $1 ORDER BY f.uploaded_at DESC");
        sqlx::query_as::<_, FileOverview>(&query)
            .bind(department_id)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list files", e))
    }

    // -- Transactional operations --

    /// Lock and return the active record with the given ID.
    pub async fn find_active_for_update(
        &self,
        conn: &mut PgConnection,
        id: FileId,
    ) -> AppResult<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(
            "SELECT * FROM file_records WHERE id = $1 AND status = 'active' FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock active file", e))
    }

    /// Lock and return the pending-edit child of the given active record.
    ///
    /// At most one such row exists per parent; a second edit submission
    /// overwrites the first instead of inserting a sibling.
    pub async fn find_pending_child_for_update(
        &self,
        conn: &mut PgConnection,
        parent_id: FileId,
    ) -> AppResult<Option<FileRecord>> {
        sqlx::query_as::<_, FileRecord>(
            "SELECT * FROM file_records \
             WHERE parent_file_id = $1 AND status = 'pending_edit' AND approval = 'pending' \
             FOR UPDATE",
        )
        .bind(parent_id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to lock pending edit", e))
    }

    /// Insert a new file record.
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        data: &CreateFileRecord,
    ) -> AppResult<FileRecord> {
        sqlx::query_as::<_, FileRecord>(
            "INSERT INTO file_records \
             (stored_key, display_name, uploaded_by, department_id, status, approval, parent_file_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
        )
        .bind(&data.stored_key)
        .bind(&data.display_name)
        .bind(data.uploaded_by)
        .bind(data.department_id)
        .bind(data.status)
        .bind(data.approval)
        .bind(data.parent_file_id)
        .fetch_one(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create file record", e))
    }

    /// Replace a pending record's content fields in place (a newer edit
    /// submission overwrites the outstanding one).
    pub async fn overwrite_pending(
        &self,
        conn: &mut PgConnection,
        pending_id: FileId,
        stored_key: &str,
        display_name: &str,
        uploaded_by: UserId,
    ) -> AppResult<FileRecord> {
        sqlx::query_as::<_, FileRecord>(
            "UPDATE file_records SET \
             stored_key = $2, display_name = $3, uploaded_by = $4, \
             uploaded_at = NOW(), approval = 'pending' \
             WHERE id = $1 AND status = 'pending_edit' RETURNING *",
        )
        .bind(pending_id)
        .bind(stored_key)
        .bind(display_name)
        .bind(uploaded_by)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to overwrite pending edit", e)
        })?
        .ok_or_else(|| AppError::not_found(format!("Pending record {pending_id} not found")))
    }

    /// Promote approved content into the active record: the row absorbs the
    /// pending submission's content fields and stays active/approved.
    pub async fn promote_active(
        &self,
        conn: &mut PgConnection,
        active_id: FileId,
        stored_key: &str,
        display_name: &str,
        uploaded_by: UserId,
    ) -> AppResult<FileRecord> {
        sqlx::query_as::<_, FileRecord>(
            "UPDATE file_records SET \
             stored_key = $2, display_name = $3, uploaded_by = $4, \
             uploaded_at = NOW(), status = 'active', approval = 'approved' \
             WHERE id = $1 RETURNING *",
        )
        .bind(active_id)
        .bind(stored_key)
        .bind(display_name)
        .bind(uploaded_by)
        .fetch_optional(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to promote file", e))?
        .ok_or_else(|| AppError::not_found(format!("File record {active_id} not found")))
    }

    /// Delete a file record row outright (pending rows after accept/reject).
    pub async fn delete_row(&self, conn: &mut PgConnection, id: FileId) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM file_records WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to delete file record", e)
            })?;
        Ok(result.rows_affected())
    }

    /// Flip an active record to the terminal deleted status.
    pub async fn mark_deleted(&self, conn: &mut PgConnection, id: FileId) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE file_records SET status = 'deleted' WHERE id = $1 AND status = 'active'",
        )
        .bind(id)
        .execute(&mut *conn)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark file deleted", e))?;
        Ok(result.rows_affected())
    }
}
