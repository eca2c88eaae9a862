//! Read-side projection of file records for listing screens.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use opsdash_core::types::id::{DepartmentId, FileId, UserId};

use super::state::{ApprovalState, FileStatus};

/// A file record joined with uploader/department names and the
/// pending-edit marker, as shown on the listing screens.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FileOverview {
    /// Record identifier.
    pub id: FileId,
    /// Opaque blob locator (feeds the content URL).
    pub stored_key: String,
    /// User-supplied original file name.
    pub display_name: String,
    /// When this content was uploaded.
    pub uploaded_at: DateTime<Utc>,
    /// Lifecycle status.
    pub status: FileStatus,
    /// Approval state.
    pub approval: ApprovalState,
    /// The uploading user.
    pub uploaded_by: UserId,
    /// The owning department.
    pub department_id: DepartmentId,
    /// Parent record for pending-edit rows.
    pub parent_file_id: Option<FileId>,
    /// Resolved uploader display name.
    pub uploader_name: String,
    /// Resolved department display name.
    pub department_name: String,
    /// Whether a pending edit currently references this record as parent.
    pub has_pending_edit: bool,
}
