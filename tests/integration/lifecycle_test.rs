//! Integration tests for the file lifecycle engine.
//!
//! All tests here require a live PostgreSQL instance (`DATABASE_URL`);
//! run with `cargo test -- --ignored` against a scratch database.

mod helpers;

use bytes::Bytes;

use helpers::TestApp;
use opsdash_core::error::ErrorKind;
use opsdash_core::types::id::{DepartmentId, UserId};
use opsdash_entity::file::{ApprovalState, FileRecord, FileStatus};
use opsdash_entity::user::Role;
use opsdash_service::lifecycle::{EditParams, UploadParams};

async fn seed_senior(app: &TestApp, email: &str, designation: &str, dept: DepartmentId) -> UserId {
    app.create_user("Test Senior", email, Role::Senior, designation, dept)
        .await
}

fn upload_params(dept: Option<DepartmentId>, name: &str, content: &str) -> UploadParams {
    UploadParams {
        target_department_id: dept,
        display_name: name.into(),
        mime_type: Some("text/csv".into()),
        data: Bytes::from(content.to_string()),
    }
}

fn edit_params(name: &str, content: &str) -> EditParams {
    EditParams {
        display_name: name.into(),
        mime_type: Some("text/csv".into()),
        data: Bytes::from(content.to_string()),
    }
}

async fn fetch_record(app: &TestApp, id: opsdash_core::types::id::FileId) -> Option<FileRecord> {
    sqlx::query_as::<_, FileRecord>("SELECT * FROM file_records WHERE id = $1")
        .bind(id)
        .fetch_optional(&app.db_pool)
        .await
        .unwrap()
}

async fn count_pending_children(
    app: &TestApp,
    parent: opsdash_core::types::id::FileId,
) -> i64 {
    sqlx::query_scalar(
        "SELECT COUNT(*) FROM file_records WHERE parent_file_id = $1 AND status = 'pending_edit'",
    )
    .bind(parent)
    .fetch_one(&app.db_pool)
    .await
    .unwrap()
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_upload_read_content_roundtrip() {
    let app = TestApp::new().await;
    let dept = app.department_id("Production").await;
    let uploader = seed_senior(&app, "ggm.prod@example.com", "GGM (Production)", dept).await;
    let principal = app.principal_for(uploader).await;

    let content = "date,output\n2026-01-01,420\n";
    let record = app
        .state
        .lifecycle
        .upload(&principal, upload_params(None, "output.csv", content))
        .await
        .unwrap();

    assert_eq!(record.status, FileStatus::Active);
    assert_eq!(record.approval, ApprovalState::Approved);
    assert!(record.parent_file_id.is_none());

    let read = app
        .state
        .lifecycle
        .read_content(&principal, record.id)
        .await
        .unwrap();
    assert_eq!(read.data, Bytes::from(content.to_string()));
    assert_eq!(read.display_name, "output.csv");
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_cmd_upload_without_target_fails_with_missing_target() {
    let app = TestApp::new().await;
    let dept = app.department_id("Production").await;
    let cmd = seed_senior(&app, "cmd@example.com", "CMD", dept).await;
    let principal = app.principal_for(cmd).await;

    let err = app
        .state
        .lifecycle
        .upload(&principal, upload_params(None, "report.csv", "a,b\n"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Invariant);
    assert_eq!(err.reason, Some("MISSING_TARGET"));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_cmd_uploads_into_foreign_department() {
    let app = TestApp::new().await;
    let production = app.department_id("Production").await;
    let sales = app.department_id("Sales").await;
    let cmd = seed_senior(&app, "cmd@example.com", "CMD", production).await;
    let principal = app.principal_for(cmd).await;

    let record = app
        .state
        .lifecycle
        .upload(&principal, upload_params(Some(sales), "sales.csv", "q,v\n"))
        .await
        .unwrap();

    assert_eq!(record.department_id, sales);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_senior_cannot_target_foreign_department() {
    let app = TestApp::new().await;
    let production = app.department_id("Production").await;
    let sales = app.department_id("Sales").await;
    let senior = seed_senior(&app, "ggm@example.com", "GGM (Production)", production).await;
    let principal = app.principal_for(senior).await;

    let err = app
        .state
        .lifecycle
        .upload(&principal, upload_params(Some(sales), "sales.csv", "q,v\n"))
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_second_edit_overwrites_pending_row() {
    let app = TestApp::new().await;
    let dept = app.department_id("HR").await;
    let senior = seed_senior(&app, "hr@example.com", "GGM (H&A)", dept).await;
    let principal = app.principal_for(senior).await;

    let active = app
        .state
        .lifecycle
        .upload(&principal, upload_params(None, "headcount.csv", "v1\n"))
        .await
        .unwrap();

    let first = app
        .state
        .lifecycle
        .submit_edit(&principal, active.id, edit_params("headcount.csv", "v2\n"))
        .await
        .unwrap();
    let second = app
        .state
        .lifecycle
        .submit_edit(&principal, active.id, edit_params("headcount.csv", "v3\n"))
        .await
        .unwrap();

    // The pending row is reused, never duplicated; the later content wins.
    assert_eq!(first.id, second.id);
    assert_eq!(count_pending_children(&app, active.id).await, 1);

    let content = app
        .state
        .lifecycle
        .read_content(&principal, second.id)
        .await
        .unwrap();
    assert_eq!(content.data, Bytes::from("v3\n"));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_accept_promotes_pending_content() {
    let app = TestApp::new().await;
    let dept = app.department_id("Production").await;
    let senior = seed_senior(&app, "ggm@example.com", "GGM (Production)", dept).await;
    let director = seed_senior(&app, "dir@example.com", "Director (Production)", dept).await;
    let senior_p = app.principal_for(senior).await;
    let director_p = app.principal_for(director).await;

    let active = app
        .state
        .lifecycle
        .upload(&senior_p, upload_params(None, "plan.csv", "old\n"))
        .await
        .unwrap();
    let pending = app
        .state
        .lifecycle
        .submit_edit(&senior_p, active.id, edit_params("plan.csv", "new\n"))
        .await
        .unwrap();

    let promoted = app
        .state
        .lifecycle
        .accept(&director_p, active.id, Some("looks right".into()))
        .await
        .unwrap();

    // Exactly one record remains for the lineage, active and approved,
    // carrying the pending submission's content under a fresh key.
    assert_eq!(promoted.id, active.id);
    assert_eq!(promoted.status, FileStatus::Active);
    assert_eq!(promoted.approval, ApprovalState::Approved);
    assert_ne!(promoted.stored_key, pending.stored_key);
    assert_ne!(promoted.stored_key, active.stored_key);
    assert_eq!(count_pending_children(&app, active.id).await, 0);
    assert!(fetch_record(&app, pending.id).await.is_none());

    let content = app
        .state
        .lifecycle
        .read_content(&senior_p, active.id)
        .await
        .unwrap();
    assert_eq!(content.data, Bytes::from("new\n"));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_reject_leaves_active_record_untouched() {
    let app = TestApp::new().await;
    let dept = app.department_id("Sales").await;
    let senior = seed_senior(&app, "sales@example.com", "ED (Marketing)", dept).await;
    let director = seed_senior(&app, "dir.sales@example.com", "Director (Commercial)", dept).await;
    let senior_p = app.principal_for(senior).await;
    let director_p = app.principal_for(director).await;

    let active = app
        .state
        .lifecycle
        .upload(&senior_p, upload_params(None, "targets.csv", "keep\n"))
        .await
        .unwrap();
    let pending = app
        .state
        .lifecycle
        .submit_edit(&senior_p, active.id, edit_params("targets-v2.csv", "drop\n"))
        .await
        .unwrap();

    app.state
        .lifecycle
        .reject(&director_p, active.id, Some("numbers off".into()))
        .await
        .unwrap();

    let after = fetch_record(&app, active.id).await.unwrap();
    assert_eq!(after.stored_key, active.stored_key);
    assert_eq!(after.display_name, active.display_name);
    assert_eq!(after.uploaded_by, active.uploaded_by);
    assert_eq!(count_pending_children(&app, active.id).await, 0);
    assert!(fetch_record(&app, pending.id).await.is_none());

    let content = app
        .state
        .lifecycle
        .read_content(&senior_p, active.id)
        .await
        .unwrap();
    assert_eq!(content.data, Bytes::from("keep\n"));
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_delete_with_pending_edit_fails_and_changes_nothing() {
    let app = TestApp::new().await;
    let dept = app.department_id("HR").await;
    let senior = seed_senior(&app, "hr@example.com", "GGM (H&A)", dept).await;
    let principal = app.principal_for(senior).await;

    let active = app
        .state
        .lifecycle
        .upload(&principal, upload_params(None, "staff.csv", "v1\n"))
        .await
        .unwrap();
    let pending = app
        .state
        .lifecycle
        .submit_edit(&principal, active.id, edit_params("staff.csv", "v2\n"))
        .await
        .unwrap();

    let err = app
        .state
        .lifecycle
        .delete(&principal, active.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Invariant);
    assert_eq!(err.reason, Some("HAS_PENDING_EDIT"));

    let active_after = fetch_record(&app, active.id).await.unwrap();
    let pending_after = fetch_record(&app, pending.id).await.unwrap();
    assert_eq!(active_after.status, FileStatus::Active);
    assert_eq!(pending_after.status, FileStatus::PendingEdit);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_delete_active_without_pending() {
    let app = TestApp::new().await;
    let dept = app.department_id("Production").await;
    let senior = seed_senior(&app, "ggm@example.com", "GGM (Production)", dept).await;
    let principal = app.principal_for(senior).await;

    let active = app
        .state
        .lifecycle
        .upload(&principal, upload_params(None, "old.csv", "bye\n"))
        .await
        .unwrap();

    app.state.lifecycle.delete(&principal, active.id).await.unwrap();

    let after = fetch_record(&app, active.id).await.unwrap();
    assert_eq!(after.status, FileStatus::Deleted);

    // Terminal: the content is gone too.
    let err = app
        .state
        .lifecycle
        .read_content(&principal, active.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_director_cannot_approve_foreign_department() {
    let app = TestApp::new().await;
    let production = app.department_id("Production").await;
    let sales = app.department_id("Sales").await;
    let senior = seed_senior(&app, "sales@example.com", "GGM (Marketing)", sales).await;
    let foreign_director =
        seed_senior(&app, "dir.prod@example.com", "Director (Production)", production).await;
    let senior_p = app.principal_for(senior).await;
    let director_p = app.principal_for(foreign_director).await;

    let active = app
        .state
        .lifecycle
        .upload(&senior_p, upload_params(None, "q.csv", "v1\n"))
        .await
        .unwrap();
    app.state
        .lifecycle
        .submit_edit(&senior_p, active.id, edit_params("q.csv", "v2\n"))
        .await
        .unwrap();

    let err = app
        .state
        .lifecycle
        .accept(&director_p, active.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_plain_senior_cannot_approve() {
    let app = TestApp::new().await;
    let dept = app.department_id("HR").await;
    let senior = seed_senior(&app, "hr@example.com", "GGM (H&A)", dept).await;
    let principal = app.principal_for(senior).await;

    let active = app
        .state
        .lifecycle
        .upload(&principal, upload_params(None, "r.csv", "v1\n"))
        .await
        .unwrap();
    app.state
        .lifecycle
        .submit_edit(&principal, active.id, edit_params("r.csv", "v2\n"))
        .await
        .unwrap();

    let err = app
        .state
        .lifecycle
        .accept(&principal, active.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_accept_without_pending_edit_is_not_found() {
    let app = TestApp::new().await;
    let dept = app.department_id("HR").await;
    let director = seed_senior(&app, "dir.hr@example.com", "Director (HR)", dept).await;
    let principal = app.principal_for(director).await;

    let active = app
        .state
        .lifecycle
        .upload(
            &principal,
            upload_params(Some(dept), "solo.csv", "v1\n"),
        )
        .await
        .unwrap();

    let err = app
        .state
        .lifecycle
        .accept(&principal, active.id, None)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_foreign_senior_cannot_list_or_read() {
    let app = TestApp::new().await;
    let production = app.department_id("Production").await;
    let sales = app.department_id("Sales").await;
    let prod_senior = seed_senior(&app, "prod@example.com", "GGM (Production)", production).await;
    let sales_senior = seed_senior(&app, "sales@example.com", "GGM (Marketing)", sales).await;
    let prod_p = app.principal_for(prod_senior).await;
    let sales_p = app.principal_for(sales_senior).await;

    let record = app
        .state
        .lifecycle
        .upload(&prod_p, upload_params(None, "secret.csv", "x\n"))
        .await
        .unwrap();

    // Not visible in the foreign senior's listing.
    let listed = app.state.queries.list_files(&sales_p).await.unwrap();
    assert!(listed.iter().all(|f| f.id != record.id));

    // Not readable either.
    let err = app
        .state
        .lifecycle
        .read_content(&sales_p, record.id)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);

    // And not editable.
    let err = app
        .state
        .lifecycle
        .submit_edit(&sales_p, record.id, edit_params("secret.csv", "y\n"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Forbidden);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_listing_marks_pending_edit() {
    let app = TestApp::new().await;
    let dept = app.department_id("Sales").await;
    let senior = seed_senior(&app, "sales@example.com", "ED (Marketing)", dept).await;
    let principal = app.principal_for(senior).await;

    let active = app
        .state
        .lifecycle
        .upload(&principal, upload_params(None, "targets.csv", "v1\n"))
        .await
        .unwrap();
    app.state
        .lifecycle
        .submit_edit(&principal, active.id, edit_params("targets.csv", "v2\n"))
        .await
        .unwrap();

    let listed = app.state.queries.list_files(&principal).await.unwrap();
    let entry = listed.iter().find(|f| f.id == active.id).unwrap();
    assert!(entry.has_pending_edit);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_activity_log_scoping() {
    let app = TestApp::new().await;
    let production = app.department_id("Production").await;
    let sales = app.department_id("Sales").await;

    let cmd = seed_senior(&app, "cmd@example.com", "CMD", production).await;
    let prod_senior = seed_senior(&app, "prod@example.com", "GGM (Production)", production).await;
    let sales_senior = seed_senior(&app, "sales@example.com", "GGM (Marketing)", sales).await;

    let cmd_p = app.principal_for(cmd).await;
    let prod_p = app.principal_for(prod_senior).await;
    let sales_p = app.principal_for(sales_senior).await;

    app.state
        .lifecycle
        .upload(&prod_p, upload_params(None, "a.csv", "1\n"))
        .await
        .unwrap();
    app.state
        .lifecycle
        .upload(&sales_p, upload_params(None, "b.csv", "2\n"))
        .await
        .unwrap();

    // CMD sees everything.
    let all = app.state.queries.activity_log(&cmd_p, None).await.unwrap();
    assert_eq!(all.len(), 2);

    // A plain senior sees only entries they personally authored.
    let own = app.state.queries.activity_log(&prod_p, None).await.unwrap();
    assert_eq!(own.len(), 1);
    assert_eq!(own[0].actor_id, prod_senior);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_concurrent_edit_submissions_leave_one_pending_row() {
    let app = TestApp::new().await;
    let dept = app.department_id("Production").await;
    let senior = seed_senior(&app, "ggm@example.com", "GGM (Production)", dept).await;
    let principal = app.principal_for(senior).await;

    let active = app
        .state
        .lifecycle
        .upload(&principal, upload_params(None, "race.csv", "v0\n"))
        .await
        .unwrap();

    let lifecycle_a = app.state.lifecycle.clone();
    let lifecycle_b = app.state.lifecycle.clone();
    let p_a = principal.clone();
    let p_b = principal.clone();
    let id = active.id;

    let (a, b) = tokio::join!(
        tokio::spawn(async move {
            lifecycle_a
                .submit_edit(&p_a, id, edit_params("race.csv", "from-a\n"))
                .await
        }),
        tokio::spawn(async move {
            lifecycle_b
                .submit_edit(&p_b, id, edit_params("race.csv", "from-b\n"))
                .await
        }),
    );
    a.unwrap().unwrap();
    b.unwrap().unwrap();

    assert_eq!(count_pending_children(&app, active.id).await, 1);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL instance"]
async fn test_concurrent_decisions_are_mutually_exclusive() {
    let app = TestApp::new().await;
    let dept = app.department_id("Production").await;
    let senior = seed_senior(&app, "ggm@example.com", "GGM (Production)", dept).await;
    let director = seed_senior(&app, "dir@example.com", "Director (Production)", dept).await;
    let senior_p = app.principal_for(senior).await;
    let director_p = app.principal_for(director).await;

    let active = app
        .state
        .lifecycle
        .upload(&senior_p, upload_params(None, "race.csv", "v1\n"))
        .await
        .unwrap();
    app.state
        .lifecycle
        .submit_edit(&senior_p, active.id, edit_params("race.csv", "v2\n"))
        .await
        .unwrap();

    let lifecycle_a = app.state.lifecycle.clone();
    let lifecycle_b = app.state.lifecycle.clone();
    let p_a = director_p.clone();
    let p_b = director_p.clone();
    let id = active.id;

    let (a, b) = tokio::join!(
        tokio::spawn(async move { lifecycle_a.accept(&p_a, id, None).await.map(|_| ()) }),
        tokio::spawn(async move { lifecycle_b.reject(&p_b, id, None).await }),
    );
    let results = [a.unwrap(), b.unwrap()];

    // Exactly one of the two racing decisions wins; the loser observes
    // the pending row gone and fails cleanly.
    let wins = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1);
    assert_eq!(count_pending_children(&app, active.id).await, 0);
}
