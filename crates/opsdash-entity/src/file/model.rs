//! File record entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use opsdash_core::error::AppError;
use opsdash_core::result::AppResult;
use opsdash_core::types::id::{DepartmentId, FileId, UserId};

use super::state::{ApprovalState, FileState, FileStatus};

/// One logical file version, active or pending.
///
/// An active record's id is stable for the lifetime of its lineage:
/// accepted edits replace its content fields in place. Pending-edit
/// records are transient and reference their active parent.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileRecord {
    /// Unique record identifier.
    pub id: FileId,
    /// Opaque blob locator. Globally unique; regenerated on every
    /// physical write, never reused across accept/reject cycles.
    pub stored_key: String,
    /// User-supplied original file name, preserved across edits.
    pub display_name: String,
    /// The user who uploaded this content.
    pub uploaded_by: UserId,
    /// The owning department.
    pub department_id: DepartmentId,
    /// When this content was uploaded (refreshed on accept).
    pub uploaded_at: DateTime<Utc>,
    /// Lifecycle status.
    pub status: FileStatus,
    /// Approval state.
    pub approval: ApprovalState,
    /// For pending-edit records, the active record this would replace.
    pub parent_file_id: Option<FileId>,
}

impl FileRecord {
    /// Project the row into its lifecycle state.
    ///
    /// Fails with an internal error on rows that violate the schema
    /// invariants (a pending-edit row without a parent), which can only
    /// arise from out-of-band database edits.
    pub fn state(&self) -> AppResult<FileState> {
        match self.status {
            FileStatus::Active => Ok(FileState::Active {
                approval: self.approval,
            }),
            FileStatus::PendingEdit => {
                let parent = self.parent_file_id.ok_or_else(|| {
                    AppError::internal(format!(
                        "File record {} is pending_edit but has no parent",
                        self.id
                    ))
                })?;
                Ok(FileState::PendingEdit { parent })
            }
            FileStatus::Deleted => Ok(FileState::Deleted),
        }
    }

}

/// Data required to create a new file record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFileRecord {
    /// Opaque blob locator the bytes were stored under.
    pub stored_key: String,
    /// User-supplied original file name.
    pub display_name: String,
    /// The uploading user.
    pub uploaded_by: UserId,
    /// The owning department.
    pub department_id: DepartmentId,
    /// Lifecycle status of the new record.
    pub status: FileStatus,
    /// Approval state of the new record.
    pub approval: ApprovalState,
    /// Parent record for pending-edit submissions.
    pub parent_file_id: Option<FileId>,
}

impl CreateFileRecord {
    /// Payload for a fresh upload: active, approved, no parent.
    pub fn upload(
        stored_key: String,
        display_name: String,
        uploaded_by: UserId,
        department_id: DepartmentId,
    ) -> Self {
        Self {
            stored_key,
            display_name,
            uploaded_by,
            department_id,
            status: FileStatus::Active,
            approval: ApprovalState::Approved,
            parent_file_id: None,
        }
    }

    /// Payload for an edit submission: pending_edit, pending, parented.
    pub fn pending_edit(
        stored_key: String,
        display_name: String,
        uploaded_by: UserId,
        department_id: DepartmentId,
        parent: FileId,
    ) -> Self {
        Self {
            stored_key,
            display_name,
            uploaded_by,
            department_id,
            status: FileStatus::PendingEdit,
            approval: ApprovalState::Pending,
            parent_file_id: Some(parent),
        }
    }
}
