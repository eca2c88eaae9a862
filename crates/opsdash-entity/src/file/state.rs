//! File lifecycle status, approval state, and the derived state sum type.

use serde::{Deserialize, Serialize};
use std::fmt;

use opsdash_core::types::id::FileId;

/// Lifecycle status column of a file record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "file_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    /// The live record of its lineage.
    Active,
    /// An edit submission awaiting approval, parented to an active record.
    PendingEdit,
    /// Terminal: the record never transitions again.
    Deleted,
}

impl FileStatus {
    /// Return the status as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::PendingEdit => "pending_edit",
            Self::Deleted => "deleted",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Approval state column of a file record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "approval_state", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ApprovalState {
    /// Approved content (every active record).
    Approved,
    /// Awaiting director/CMD decision (every pending-edit record).
    Pending,
    /// Terminal rejection. Rejected pending rows are removed outright, so
    /// this value appears on the wire but never in a stored row.
    Rejected,
}

impl ApprovalState {
    /// Return the state as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Pending => "pending",
            Self::Rejected => "rejected",
        }
    }
}

impl fmt::Display for ApprovalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The lifecycle state of a file record as a tagged union.
///
/// Projected from the status/approval/parent columns so the engine can
/// match on legal states instead of re-checking column combinations at
/// every call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileState {
    /// The live record of its lineage.
    Active {
        /// Approval state; `Approved` for every well-formed active record.
        approval: ApprovalState,
    },
    /// An edit submission awaiting decision.
    PendingEdit {
        /// The active record this submission would replace.
        parent: FileId,
    },
    /// Terminal.
    Deleted,
}
