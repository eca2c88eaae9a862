//! Pure access-policy decision functions.
//!
//! Every function here is side-effect free and consulted by the lifecycle
//! engine and query layer before any state mutation. A `false` answer
//! surfaces as a 403 with no partial effects.

use opsdash_core::types::id::{DepartmentId, UserId};
use opsdash_entity::file::FileRecord;
use opsdash_entity::user::Authority;

use crate::principal::Principal;

/// Whether a principal may upload a file into the target department.
///
/// Global authority may target any department; any other senior only
/// their own. Juniors never upload.
pub fn can_upload(principal: &Principal, target_department: DepartmentId) -> bool {
    principal.is_senior()
        && (principal.authority.is_global() || principal.department_id == target_department)
}

/// Whether a principal may mutate (edit-submit, delete) a file record.
///
/// Department scoping only: directors have no extra mutation rights over
/// plain seniors of the same department. Also used as the read check for
/// file content, which is equally department-sensitive.
pub fn can_mutate(principal: &Principal, file: &FileRecord) -> bool {
    principal.is_senior()
        && (principal.authority.is_global() || principal.department_id == file.department_id)
}

/// Whether a principal may approve or reject a pending edit of this file.
pub fn can_approve(principal: &Principal, file: &FileRecord) -> bool {
    if !principal.is_senior() {
        return false;
    }
    match principal.authority {
        Authority::Global => true,
        Authority::Department => principal.department_id == file.department_id,
        Authority::None => false,
    }
}

/// Which file records a principal may list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileScope {
    /// Every department.
    All,
    /// One department only.
    Department(DepartmentId),
    /// No listing access.
    Denied,
}

/// Resolve the listing scope for a principal.
pub fn file_scope(principal: &Principal) -> FileScope {
    if !principal.is_senior() {
        return FileScope::Denied;
    }
    if principal.authority.is_global() {
        FileScope::All
    } else {
        FileScope::Department(principal.department_id)
    }
}

/// Which activity log entries a principal may read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityScope {
    /// Every entry.
    All,
    /// Entries targeting one department.
    Department(DepartmentId),
    /// Entries the principal personally authored.
    Own(UserId),
    /// No log access.
    Denied,
}

/// Resolve the activity log scope for a principal.
pub fn activity_scope(principal: &Principal) -> ActivityScope {
    if !principal.is_senior() {
        return ActivityScope::Denied;
    }
    match principal.authority {
        Authority::Global => ActivityScope::All,
        Authority::Department => ActivityScope::Department(principal.department_id),
        Authority::None => ActivityScope::Own(principal.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use opsdash_core::types::id::FileId;
    use opsdash_entity::file::{ApprovalState, FileStatus};
    use opsdash_entity::user::Role;

    fn principal(role: Role, designation: &str, department_id: DepartmentId) -> Principal {
        Principal {
            id: UserId::new(),
            name: "Test User".into(),
            email: "test@example.com".into(),
            role,
            designation: designation.into(),
            department_id,
            dashboard_access_enabled: true,
            authority: Authority::from_designation(designation),
        }
    }

    fn file_in(department_id: DepartmentId) -> FileRecord {
        FileRecord {
            id: FileId::new(),
            stored_key: "key.csv".into(),
            display_name: "report.csv".into(),
            uploaded_by: UserId::new(),
            department_id,
            uploaded_at: Utc::now(),
            status: FileStatus::Active,
            approval: ApprovalState::Approved,
            parent_file_id: None,
        }
    }

    #[test]
    fn test_cmd_uploads_anywhere() {
        let dept_a = DepartmentId::new();
        let dept_b = DepartmentId::new();
        let cmd = principal(Role::Senior, "CMD", dept_a);
        assert!(can_upload(&cmd, dept_a));
        assert!(can_upload(&cmd, dept_b));
    }

    #[test]
    fn test_plain_senior_uploads_own_department_only() {
        let dept_a = DepartmentId::new();
        let dept_b = DepartmentId::new();
        let senior = principal(Role::Senior, "GGM (Production)", dept_a);
        assert!(can_upload(&senior, dept_a));
        assert!(!can_upload(&senior, dept_b));
    }

    #[test]
    fn test_junior_never_uploads() {
        let dept = DepartmentId::new();
        let junior = principal(Role::Junior, "Officer (Sales)", dept);
        assert!(!can_upload(&junior, dept));
    }

    #[test]
    fn test_foreign_department_mutation_denied() {
        let dept_a = DepartmentId::new();
        let dept_b = DepartmentId::new();
        let senior = principal(Role::Senior, "ED (Marketing)", dept_a);
        assert!(can_mutate(&senior, &file_in(dept_a)));
        assert!(!can_mutate(&senior, &file_in(dept_b)));

        let cmd = principal(Role::Senior, "cmd", dept_a);
        assert!(can_mutate(&cmd, &file_in(dept_b)));
    }

    #[test]
    fn test_director_approves_own_department_only() {
        let dept_1 = DepartmentId::new();
        let dept_2 = DepartmentId::new();
        let director = principal(Role::Senior, "Director (Production)", dept_1);
        assert!(can_approve(&director, &file_in(dept_1)));
        assert!(!can_approve(&director, &file_in(dept_2)));
    }

    #[test]
    fn test_plain_senior_cannot_approve_even_in_own_department() {
        let dept = DepartmentId::new();
        let senior = principal(Role::Senior, "GGM (Production)", dept);
        assert!(!can_approve(&senior, &file_in(dept)));
    }

    #[test]
    fn test_cmd_approves_anywhere() {
        let cmd = principal(Role::Senior, "CMD", DepartmentId::new());
        assert!(can_approve(&cmd, &file_in(DepartmentId::new())));
    }

    #[test]
    fn test_junior_director_designation_confers_nothing() {
        // Role gates first: a junior with "director" in the designation
        // still has no rights over the lifecycle.
        let dept = DepartmentId::new();
        let odd = principal(Role::Junior, "Deputy Director (HR)", dept);
        assert!(!can_approve(&odd, &file_in(dept)));
        assert_eq!(activity_scope(&odd), ActivityScope::Denied);
    }

    #[test]
    fn test_file_scope() {
        let dept = DepartmentId::new();
        assert_eq!(
            file_scope(&principal(Role::Senior, "CMD", dept)),
            FileScope::All
        );
        assert_eq!(
            file_scope(&principal(Role::Senior, "Director (HR)", dept)),
            FileScope::Department(dept)
        );
        assert_eq!(
            file_scope(&principal(Role::Junior, "Officer (HR)", dept)),
            FileScope::Denied
        );
    }

    #[test]
    fn test_activity_scope() {
        let dept = DepartmentId::new();
        let plain = principal(Role::Senior, "GGM (H&A)", dept);
        assert_eq!(activity_scope(&plain), ActivityScope::Own(plain.id));
        assert_eq!(
            activity_scope(&principal(Role::Senior, "Director (Commercial)", dept)),
            ActivityScope::Department(dept)
        );
        assert_eq!(
            activity_scope(&principal(Role::Senior, "CMD", dept)),
            ActivityScope::All
        );
    }
}
