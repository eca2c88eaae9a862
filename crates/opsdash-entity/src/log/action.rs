//! Lifecycle action kinds recorded in the action log.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The lifecycle transition an action log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "action_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// A fresh file upload.
    Upload,
    /// A new edit submission against an active file.
    EditRequest,
    /// An edit submission that replaced an earlier, still-pending one.
    EditRequestOverwritePending,
    /// A pending edit was approved and promoted.
    AcceptEdit,
    /// A pending edit was rejected and discarded.
    RejectEdit,
    /// An active file was deleted.
    DeleteRequest,
}

impl ActionKind {
    /// Return the action as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::EditRequest => "edit_request",
            Self::EditRequestOverwritePending => "edit_request_overwrite_pending",
            Self::AcceptEdit => "accept_edit",
            Self::RejectEdit => "reject_edit",
            Self::DeleteRequest => "delete_request",
        }
    }

}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
