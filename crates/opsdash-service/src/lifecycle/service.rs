//! The lifecycle state machine for departmental data files.
//!
//! Every operation is one bounded unit of work: a single transaction
//! around the relational effects, with `FOR UPDATE` locks on the active
//! record (and any pending child) serializing writers per lineage.
//!
//! Blob ordering: new bytes are written before the transaction commits;
//! superseded blobs are deleted only after a successful commit, and those
//! deletes are best-effort. An orphaned blob is acceptable, a record
//! pointing at missing bytes is not.

use std::sync::Arc;

use bytes::Bytes;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::{info, warn};

use opsdash_auth::policy;
use opsdash_auth::principal::Principal;
use opsdash_core::error::AppError;
use opsdash_core::result::AppResult;
use opsdash_core::traits::storage::BlobStore;
use opsdash_core::types::id::{DepartmentId, FileId};
use opsdash_database::repositories::action_log::ActionLogRepository;
use opsdash_database::repositories::department::DepartmentRepository;
use opsdash_database::repositories::file::FileRepository;
use opsdash_entity::file::{CreateFileRecord, FileRecord, FileState};
use opsdash_entity::log::{ActionKind, CreateActionLogEntry};
use opsdash_storage::keys;

/// Parameters for a fresh upload.
#[derive(Debug, Clone)]
pub struct UploadParams {
    /// Target department. Mandatory for globally-acting principals;
    /// everyone else defaults to their own department.
    pub target_department_id: Option<DepartmentId>,
    /// User-supplied original file name.
    pub display_name: String,
    /// Declared MIME type, recorded in the audit log.
    pub mime_type: Option<String>,
    /// File content.
    pub data: Bytes,
}

/// Parameters for an edit submission.
#[derive(Debug, Clone)]
pub struct EditParams {
    /// User-supplied original file name of the replacement content.
    pub display_name: String,
    /// Declared MIME type, recorded in the audit log.
    pub mime_type: Option<String>,
    /// Replacement file content.
    pub data: Bytes,
}

/// Stored bytes plus the display name for attachment semantics.
#[derive(Debug, Clone)]
pub struct FileContent {
    /// The stored bytes.
    pub data: Bytes,
    /// Original file name to present to the client.
    pub display_name: String,
}

/// Orchestrates upload, edit-submission, approval, and deletion.
#[derive(Debug, Clone)]
pub struct LifecycleService {
    pool: PgPool,
    files: Arc<FileRepository>,
    departments: Arc<DepartmentRepository>,
    log: Arc<ActionLogRepository>,
    blobs: Arc<dyn BlobStore>,
}

impl LifecycleService {
    /// Create a new lifecycle service.
    pub fn new(
        pool: PgPool,
        files: Arc<FileRepository>,
        departments: Arc<DepartmentRepository>,
        log: Arc<ActionLogRepository>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            pool,
            files,
            departments,
            log,
            blobs,
        }
    }

    /// Upload a new file, creating an active, approved record.
    pub async fn upload(
        &self,
        principal: &Principal,
        params: UploadParams,
    ) -> AppResult<FileRecord> {
        if !principal.is_senior() {
            return Err(AppError::forbidden("Access denied. Senior management only."));
        }

        let target = if principal.authority.is_global() {
            let target = params.target_department_id.ok_or_else(|| {
                AppError::invariant(
                    "MISSING_TARGET",
                    "A target department must be specified for this upload",
                )
            })?;
            if !self.departments.exists(target).await? {
                return Err(AppError::invariant(
                    "INVALID_DEPARTMENT",
                    "Unknown target department",
                ));
            }
            target
        } else {
            principal.department_id
        };

        if let Some(requested) = params.target_department_id {
            if !policy::can_upload(principal, requested) {
                return Err(AppError::forbidden(
                    "Files can only be uploaded to your own department",
                ));
            }
        }

        let stored_key = keys::fresh_key(&params.display_name);
        self.blobs.put(&stored_key, params.data.clone()).await?;

        match self.upload_tx(principal, target, &stored_key, &params).await {
            Ok(record) => {
                info!(
                    user_id = %principal.id,
                    file_id = %record.id,
                    department_id = %target,
                    "File uploaded"
                );
                Ok(record)
            }
            Err(e) => {
                self.discard_blob(&stored_key).await;
                Err(e)
            }
        }
    }

    /// Submit replacement content for an active file.
    ///
    /// If a pending edit is already outstanding it is overwritten in
    /// place; the lineage never carries two pending rows.
    pub async fn submit_edit(
        &self,
        principal: &Principal,
        active_file_id: FileId,
        params: EditParams,
    ) -> AppResult<FileRecord> {
        if !principal.is_senior() {
            return Err(AppError::forbidden("Access denied. Senior management only."));
        }

        let stored_key = keys::fresh_key(&params.display_name);
        self.blobs.put(&stored_key, params.data.clone()).await?;

        match self
            .submit_edit_tx(principal, active_file_id, &stored_key, &params)
            .await
        {
            Ok((pending, replaced_key)) => {
                if let Some(key) = replaced_key {
                    self.discard_blob(&key).await;
                }
                info!(
                    user_id = %principal.id,
                    file_id = %active_file_id,
                    pending_file_id = %pending.id,
                    "Edit submitted for approval"
                );
                Ok(pending)
            }
            Err(e) => {
                self.discard_blob(&stored_key).await;
                Err(e)
            }
        }
    }

    /// Approve the pending edit of an active file and promote its content.
    ///
    /// The promoted record keeps its id but receives a freshly generated
    /// stored key; pending keys are never adopted verbatim, so repeated
    /// accept/reject cycles cannot collide on a previously-issued key.
    pub async fn accept(
        &self,
        principal: &Principal,
        active_file_id: FileId,
        notes: Option<String>,
    ) -> AppResult<FileRecord> {
        let (tx, active, pending) = self.lock_decision_pair(principal, active_file_id).await?;

        let promoted_key = keys::fresh_key(&pending.display_name);
        let data = self.blobs.get(&pending.stored_key).await?;
        self.blobs.put(&promoted_key, data).await?;

        match self
            .accept_tx(tx, principal, &active, &pending, &promoted_key, notes)
            .await
        {
            Ok(promoted) => {
                self.discard_blob(&active.stored_key).await;
                self.discard_blob(&pending.stored_key).await;
                info!(
                    user_id = %principal.id,
                    file_id = %active.id,
                    pending_file_id = %pending.id,
                    "Pending edit accepted"
                );
                Ok(promoted)
            }
            Err(e) => {
                self.discard_blob(&promoted_key).await;
                Err(e)
            }
        }
    }

    /// Reject the pending edit of an active file, discarding it.
    /// The active record is untouched.
    pub async fn reject(
        &self,
        principal: &Principal,
        active_file_id: FileId,
        notes: Option<String>,
    ) -> AppResult<()> {
        let (mut tx, active, pending) = self.lock_decision_pair(principal, active_file_id).await?;

        self.log.clear_pending_references(&mut tx, pending.id).await?;
        self.files.delete_row(&mut tx, pending.id).await?;

        let details = serde_json::json!({
            "file_original_name": active.display_name,
            "action": "reject",
            "acted_by_name": principal.name,
            "acted_by_designation": principal.designation,
            "pending_file_id_acted_on": pending.id,
        });
        self.log
            .append(
                &mut tx,
                &CreateActionLogEntry::new(
                    active.id,
                    ActionKind::RejectEdit,
                    principal.id,
                    principal.department_id,
                    active.department_id,
                    details,
                )
                .with_approval(principal.id, notes),
            )
            .await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit rejection: {e}")))?;

        self.discard_blob(&pending.stored_key).await;
        info!(
            user_id = %principal.id,
            file_id = %active.id,
            pending_file_id = %pending.id,
            "Pending edit rejected"
        );
        Ok(())
    }

    /// Delete an active file with no outstanding pending edit.
    pub async fn delete(&self, principal: &Principal, active_file_id: FileId) -> AppResult<()> {
        let mut tx = self.begin().await?;

        let active = self
            .files
            .find_active_for_update(&mut tx, active_file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found or already deleted"))?;

        if !policy::can_mutate(principal, &active) {
            return Err(AppError::forbidden(
                "Files can only be deleted within your own department",
            ));
        }

        if self
            .files
            .find_pending_child_for_update(&mut tx, active.id)
            .await?
            .is_some()
        {
            return Err(AppError::invariant(
                "HAS_PENDING_EDIT",
                "Cannot delete an active file that has a pending edit. Reject the pending edit first.",
            ));
        }

        self.log.clear_pending_references(&mut tx, active.id).await?;
        self.files.mark_deleted(&mut tx, active.id).await?;

        let details = serde_json::json!({
            "stored_key": active.stored_key,
            "display_name": active.display_name,
            "deleted_by_name": principal.name,
            "deleted_by_designation": principal.designation,
            "file_status_before_delete": active.status,
        });
        self.log
            .append(
                &mut tx,
                &CreateActionLogEntry::new(
                    active.id,
                    ActionKind::DeleteRequest,
                    principal.id,
                    principal.department_id,
                    active.department_id,
                    details,
                ),
            )
            .await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit deletion: {e}")))?;

        // Physical removal is best-effort; a missing blob is logged, not fatal.
        self.discard_blob(&active.stored_key).await;
        info!(user_id = %principal.id, file_id = %active.id, "File deleted");
        Ok(())
    }

    /// Read the stored bytes of a non-deleted record.
    ///
    /// Content is as department-sensitive as mutation, so the read check
    /// is the mutation policy.
    pub async fn read_content(
        &self,
        principal: &Principal,
        file_id: FileId,
    ) -> AppResult<FileContent> {
        let record = self
            .files
            .find_by_id(file_id)
            .await?
            .ok_or_else(|| AppError::not_found("File not found"))?;

        match record.state()? {
            FileState::Deleted => {
                return Err(AppError::not_found("File not found or has been deleted"));
            }
            FileState::Active { .. } | FileState::PendingEdit { .. } => {}
        }

        if !policy::can_mutate(principal, &record) {
            return Err(AppError::forbidden(
                "Files can only be viewed within your own department",
            ));
        }

        let data = self.blobs.get(&record.stored_key).await?;
        Ok(FileContent {
            data,
            display_name: record.display_name,
        })
    }

    // -- Transactional internals --

    async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        self.pool
            .begin()
            .await
            .map_err(|e| AppError::database(format!("Failed to open transaction: {e}")))
    }

    async fn upload_tx(
        &self,
        principal: &Principal,
        target: DepartmentId,
        stored_key: &str,
        params: &UploadParams,
    ) -> AppResult<FileRecord> {
        let mut tx = self.begin().await?;

        let record = self
            .files
            .insert(
                &mut tx,
                &CreateFileRecord::upload(
                    stored_key.to_string(),
                    params.display_name.clone(),
                    principal.id,
                    target,
                ),
            )
            .await?;

        let details = serde_json::json!({
            "stored_key": stored_key,
            "display_name": params.display_name,
            "file_mimetype": params.mime_type,
            "uploaded_by_name": principal.name,
            "uploaded_by_designation": principal.designation,
        });
        self.log
            .append(
                &mut tx,
                &CreateActionLogEntry::new(
                    record.id,
                    ActionKind::Upload,
                    principal.id,
                    principal.department_id,
                    target,
                    details,
                ),
            )
            .await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit upload: {e}")))?;
        Ok(record)
    }

    async fn submit_edit_tx(
        &self,
        principal: &Principal,
        active_file_id: FileId,
        stored_key: &str,
        params: &EditParams,
    ) -> AppResult<(FileRecord, Option<String>)> {
        let mut tx = self.begin().await?;

        let active = self
            .files
            .find_active_for_update(&mut tx, active_file_id)
            .await?
            .ok_or_else(|| AppError::not_found("Original active file not found"))?;

        if !policy::can_mutate(principal, &active) {
            return Err(AppError::forbidden(
                "Files can only be edited within your own department",
            ));
        }

        let existing = self
            .files
            .find_pending_child_for_update(&mut tx, active.id)
            .await?;

        match existing {
            Some(old_pending) => {
                // The discarded submission's log references are nulled
                // first; the row itself is reused for the new content.
                self.log
                    .clear_pending_references(&mut tx, old_pending.id)
                    .await?;

                let updated = self
                    .files
                    .overwrite_pending(
                        &mut tx,
                        old_pending.id,
                        stored_key,
                        &params.display_name,
                        principal.id,
                    )
                    .await?;

                let details = serde_json::json!({
                    "original_file_name": active.display_name,
                    "new_pending_original_name": params.display_name,
                    "new_pending_stored_key": stored_key,
                    "file_mimetype": params.mime_type,
                    "edited_by_name": principal.name,
                    "edited_by_designation": principal.designation,
                });
                self.log
                    .append(
                        &mut tx,
                        &CreateActionLogEntry::new(
                            active.id,
                            ActionKind::EditRequestOverwritePending,
                            principal.id,
                            principal.department_id,
                            active.department_id,
                            details,
                        )
                        .with_pending_file(updated.id),
                    )
                    .await?;

                tx.commit().await.map_err(|e| {
                    AppError::database(format!("Failed to commit edit submission: {e}"))
                })?;
                Ok((updated, Some(old_pending.stored_key)))
            }
            None => {
                let pending = self
                    .files
                    .insert(
                        &mut tx,
                        &CreateFileRecord::pending_edit(
                            stored_key.to_string(),
                            params.display_name.clone(),
                            principal.id,
                            active.department_id,
                            active.id,
                        ),
                    )
                    .await?;

                let details = serde_json::json!({
                    "original_file_name": active.display_name,
                    "new_pending_original_name": params.display_name,
                    "new_pending_stored_key": stored_key,
                    "file_mimetype": params.mime_type,
                    "edited_by_name": principal.name,
                    "edited_by_designation": principal.designation,
                });
                self.log
                    .append(
                        &mut tx,
                        &CreateActionLogEntry::new(
                            active.id,
                            ActionKind::EditRequest,
                            principal.id,
                            principal.department_id,
                            active.department_id,
                            details,
                        )
                        .with_pending_file(pending.id),
                    )
                    .await?;

                tx.commit().await.map_err(|e| {
                    AppError::database(format!("Failed to commit edit submission: {e}"))
                })?;
                Ok((pending, None))
            }
        }
    }

    /// Lock the active record and its pending child for a decision.
    ///
    /// The second of two racing decisions finds the pending row gone and
    /// fails here with `NotFound` instead of double-applying.
    async fn lock_decision_pair(
        &self,
        principal: &Principal,
        active_file_id: FileId,
    ) -> AppResult<(Transaction<'static, Postgres>, FileRecord, FileRecord)> {
        let mut tx = self.begin().await?;

        let active = self
            .files
            .find_active_for_update(&mut tx, active_file_id)
            .await?
            .ok_or_else(|| AppError::not_found("Active file not found"))?;

        let pending = self
            .files
            .find_pending_child_for_update(&mut tx, active.id)
            .await?
            .ok_or_else(|| {
                AppError::not_found("No pending edit awaiting approval for this file")
            })?;

        if !policy::can_approve(principal, &active) {
            return Err(AppError::forbidden(
                "Only directors or CMD can approve or reject files of this department",
            ));
        }

        Ok((tx, active, pending))
    }

    async fn accept_tx(
        &self,
        mut tx: Transaction<'static, Postgres>,
        principal: &Principal,
        active: &FileRecord,
        pending: &FileRecord,
        promoted_key: &str,
        notes: Option<String>,
    ) -> AppResult<FileRecord> {
        self.log.clear_pending_references(&mut tx, pending.id).await?;

        let promoted = self
            .files
            .promote_active(
                &mut tx,
                active.id,
                promoted_key,
                &pending.display_name,
                pending.uploaded_by,
            )
            .await?;

        self.files.delete_row(&mut tx, pending.id).await?;

        let details = serde_json::json!({
            "file_original_name": active.display_name,
            "action": "accept",
            "acted_by_name": principal.name,
            "acted_by_designation": principal.designation,
            "pending_file_id_acted_on": pending.id,
        });
        self.log
            .append(
                &mut tx,
                &CreateActionLogEntry::new(
                    active.id,
                    ActionKind::AcceptEdit,
                    principal.id,
                    principal.department_id,
                    active.department_id,
                    details,
                )
                .with_approval(principal.id, notes),
            )
            .await?;

        tx.commit()
            .await
            .map_err(|e| AppError::database(format!("Failed to commit acceptance: {e}")))?;
        Ok(promoted)
    }

    /// Best-effort blob removal for superseded or orphaned content.
    async fn discard_blob(&self, key: &str) {
        if let Err(e) = self.blobs.delete(key).await {
            warn!(key, error = %e, "Failed to remove blob; leaving orphan");
        }
    }
}
