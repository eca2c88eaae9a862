//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use opsdash_auth::principal::Principal;
use opsdash_core::types::id::FileId;

/// Body returned by a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    /// Always `true`.
    pub success: bool,
    /// Signed bearer token.
    pub token: String,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
    /// The authenticated principal.
    pub user: Principal,
}

/// Body returned by upload and edit-submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMutationResponse {
    /// Always `true`.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// The targeted active file.
    pub file_id: FileId,
    /// The pending record involved, for edit submissions.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_file_id: Option<FileId>,
}
