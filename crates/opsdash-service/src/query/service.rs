//! File listing and activity log projections.

use std::sync::Arc;

use opsdash_auth::policy::{self, ActivityScope, FileScope};
use opsdash_auth::principal::Principal;
use opsdash_core::error::AppError;
use opsdash_core::result::AppResult;
use opsdash_database::repositories::action_log::ActionLogRepository;
use opsdash_database::repositories::department::DepartmentRepository;
use opsdash_database::repositories::file::FileRepository;
use opsdash_entity::department::Department;
use opsdash_entity::file::FileOverview;
use opsdash_entity::log::ActivityEntry;

/// Default number of activity entries returned.
const DEFAULT_ACTIVITY_LIMIT: i64 = 50;
/// Upper bound on requested activity entries.
const MAX_ACTIVITY_LIMIT: i64 = 200;

/// Serves the read-side listing screens, scoped by access policy.
///
/// Reads run against the pool at read-committed isolation and are never
/// blocked by in-flight lifecycle transactions beyond that.
#[derive(Debug, Clone)]
pub struct QueryService {
    files: Arc<FileRepository>,
    log: Arc<ActionLogRepository>,
    departments: Arc<DepartmentRepository>,
}

impl QueryService {
    /// Create a new query service.
    pub fn new(
        files: Arc<FileRepository>,
        log: Arc<ActionLogRepository>,
        departments: Arc<DepartmentRepository>,
    ) -> Self {
        Self {
            files,
            log,
            departments,
        }
    }

    /// List the files visible to a principal, newest-first, each
    /// annotated with uploader/department names and the pending marker.
    pub async fn list_files(&self, principal: &Principal) -> AppResult<Vec<FileOverview>> {
        match policy::file_scope(principal) {
            FileScope::All => self.files.list_overview_all().await,
            FileScope::Department(dept) => self.files.list_overview_by_department(dept).await,
            FileScope::Denied => Err(AppError::forbidden(
                "Access denied. Only seniors can view files.",
            )),
        }
    }

    /// List the newest activity log entries visible to a principal.
    pub async fn activity_log(
        &self,
        principal: &Principal,
        limit: Option<i64>,
    ) -> AppResult<Vec<ActivityEntry>> {
        let limit = limit.unwrap_or(DEFAULT_ACTIVITY_LIMIT).clamp(1, MAX_ACTIVITY_LIMIT);

        match policy::activity_scope(principal) {
            ActivityScope::All => self.log.list_all(limit).await,
            ActivityScope::Department(dept) => {
                self.log.list_by_target_department(dept, limit).await
            }
            ActivityScope::Own(user) => self.log.list_by_actor(user, limit).await,
            ActivityScope::Denied => Err(AppError::forbidden(
                "Access denied. Only seniors can view activity logs.",
            )),
        }
    }

    /// List all departments (feeds the upload target picker).
    pub async fn departments(&self, principal: &Principal) -> AppResult<Vec<Department>> {
        if !principal.is_senior() {
            return Err(AppError::forbidden("Access denied. Senior management only."));
        }
        self.departments.list_all().await
    }
}
