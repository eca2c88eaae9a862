//! Action log entry entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use opsdash_core::types::id::{DepartmentId, FileId, LogId, UserId};

use super::ActionKind;

/// A record of one lifecycle transition.
///
/// Append-only, with two sanctioned mutations: `pending_file_id` is
/// nulled before the referenced pending row is deleted (it is a weak
/// reference with no database constraint), and accept/reject entries
/// carry the approval stamp written at creation time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActionLogEntry {
    /// Unique log entry identifier.
    pub id: LogId,
    /// The file the action targeted (the active record of the lineage).
    pub file_id: FileId,
    /// The transition that occurred.
    pub action: ActionKind,
    /// The user who performed the action.
    pub actor_id: UserId,
    /// The acting user's department at the time of the action.
    pub actor_department_id: DepartmentId,
    /// The department owning the targeted file.
    pub target_department_id: DepartmentId,
    /// Free-form audit facts (filenames, actor name, designation).
    pub details: serde_json::Value,
    /// The director/CMD who decided an accept/reject, if any.
    pub approval_actor_id: Option<UserId>,
    /// When the approval decision was made.
    pub approval_at: Option<DateTime<Utc>>,
    /// Free-text notes attached to an approval decision.
    pub notes: Option<String>,
    /// Weak reference to the pending record involved, nulled once that
    /// record is removed.
    pub pending_file_id: Option<FileId>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

/// Data required to append a new action log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateActionLogEntry {
    /// The file the action targets.
    pub file_id: FileId,
    /// The transition being recorded.
    pub action: ActionKind,
    /// The acting user.
    pub actor_id: UserId,
    /// The acting user's department.
    pub actor_department_id: DepartmentId,
    /// The department owning the targeted file.
    pub target_department_id: DepartmentId,
    /// Free-form audit facts.
    pub details: serde_json::Value,
    /// Approval actor for accept/reject entries.
    pub approval_actor_id: Option<UserId>,
    /// Approval notes for accept/reject entries.
    pub notes: Option<String>,
    /// The pending record involved, if any.
    pub pending_file_id: Option<FileId>,
}

impl CreateActionLogEntry {
    /// A plain entry with no approval stamp or pending reference.
    pub fn new(
        file_id: FileId,
        action: ActionKind,
        actor_id: UserId,
        actor_department_id: DepartmentId,
        target_department_id: DepartmentId,
        details: serde_json::Value,
    ) -> Self {
        Self {
            file_id,
            action,
            actor_id,
            actor_department_id,
            target_department_id,
            details,
            approval_actor_id: None,
            notes: None,
            pending_file_id: None,
        }
    }

    /// Attach a pending-record reference.
    pub fn with_pending_file(mut self, pending_file_id: FileId) -> Self {
        self.pending_file_id = Some(pending_file_id);
        self
    }

    /// Attach an approval stamp (actor and optional notes).
    pub fn with_approval(mut self, approver: UserId, notes: Option<String>) -> Self {
        self.approval_actor_id = Some(approver);
        self.notes = notes;
        self
    }
}
