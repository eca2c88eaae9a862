//! Read-side projection of action log entries for the activity screen.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use opsdash_core::types::id::{DepartmentId, FileId, LogId, UserId};

use crate::file::ApprovalState;

use super::ActionKind;

/// An action log entry resolved with human-readable names and the live
/// approval status of the involved records.
///
/// Approval statuses are looked up at read time, not denormalized: a
/// pending edit's status can change after the entry was written, and a
/// removed pending row simply resolves to `None`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityEntry {
    /// Log entry identifier.
    pub id: LogId,
    /// The file the action targeted.
    pub file_id: FileId,
    /// The recorded transition.
    pub action: ActionKind,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
    /// Free-form audit facts.
    pub details: serde_json::Value,
    /// The department owning the targeted file.
    pub target_department_id: DepartmentId,
    /// Weak reference to the pending record involved, if still present.
    pub pending_file_id: Option<FileId>,
    /// The acting user.
    pub actor_id: UserId,
    /// Resolved actor name.
    pub actor_name: Option<String>,
    /// Actor designation at provisioning time.
    pub actor_designation: Option<String>,
    /// Resolved actor department name.
    pub actor_department_name: Option<String>,
    /// Display name of the targeted file.
    pub file_display_name: Option<String>,
    /// Resolved target department name.
    pub target_department_name: Option<String>,
    /// Live approval status of the targeted file record.
    pub file_approval_status: Option<ApprovalState>,
    /// Live approval status of the referenced pending record.
    pub pending_file_approval_status: Option<ApprovalState>,
    /// Resolved name of the approving director/CMD, if any.
    pub approval_actor_name: Option<String>,
    /// When the approval decision was made.
    pub approval_at: Option<DateTime<Utc>>,
    /// Notes attached to the approval decision.
    pub notes: Option<String>,
}
