//! Profile, department, and junior-access handlers.

use axum::Json;
use axum::extract::{Path, State};
use uuid::Uuid;

use opsdash_core::error::AppError;
use opsdash_core::types::id::UserId;

use crate::dto::request::DashboardAccessRequest;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/users/profile — the principal's own profile.
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let profile = state.directory.profile(&auth).await?;
    Ok(Json(serde_json::json!({ "success": true, "profile": profile })))
}

/// GET /api/departments — all departments (senior only; feeds the CMD
/// upload target picker).
pub async fn departments(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let departments = state.queries.departments(&auth).await?;
    Ok(Json(
        serde_json::json!({ "success": true, "departments": departments }),
    ))
}

/// GET /api/users/juniors — junior users visible to this senior.
pub async fn juniors(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let juniors = state.directory.juniors(&auth).await?;
    Ok(Json(serde_json::json!({ "success": true, "juniors": juniors })))
}

/// PUT /api/users/{id}/dashboard-access — toggle a junior's access flag.
pub async fn set_dashboard_access(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(req): Json<DashboardAccessRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .directory
        .set_dashboard_access(&auth, UserId::from_uuid(id), req.enabled)
        .await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Junior dashboard access updated"
    })))
}
