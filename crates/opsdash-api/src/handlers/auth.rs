//! Login flow handlers.

use axum::Json;
use axum::extract::State;
use validator::Validate;

use opsdash_core::error::AppError;

use crate::dto::request::{
    CheckEmailRequest, CheckPasswordRequest, SendOtpRequest, VerifyOtpRequest,
};
use crate::dto::response::LoginResponse;
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// POST /api/auth/check-email
pub async fn check_email(
    State(state): State<AppState>,
    Json(req): Json<CheckEmailRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    state.auth.check_email(&req.email, req.role).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/auth/check-password
pub async fn check_password(
    State(state): State<AppState>,
    Json(req): Json<CheckPasswordRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    state.auth.check_password(&req.email, &req.password).await?;
    Ok(Json(serde_json::json!({ "success": true })))
}

/// POST /api/auth/send-otp
///
/// There is no mailer: the OTP is returned in the body for delivery by
/// the operator-facing frontend.
pub async fn send_otp(
    State(state): State<AppState>,
    Json(req): Json<SendOtpRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let otp = state.auth.send_otp(&req.email, req.role).await?;
    Ok(Json(serde_json::json!({ "success": true, "otp": otp })))
}

/// POST /api/auth/verify-otp
pub async fn verify_otp(
    State(state): State<AppState>,
    Json(req): Json<VerifyOtpRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let session = state.auth.verify_otp(&req.email, &req.otp).await?;
    Ok(Json(LoginResponse {
        success: true,
        token: session.token,
        expires_at: session.expires_at,
        user: session.principal,
    }))
}

/// GET /api/auth/me — the current principal, re-read from the database.
pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let principal = state.auth.refresh_principal(&auth).await?;
    Ok(Json(serde_json::json!({ "success": true, "user": principal })))
}

/// POST /api/auth/logout
///
/// Sessions are stateless bearer tokens; logout is a client-side discard.
pub async fn logout(_auth: AuthUser) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "success": true, "message": "Logged out successfully" }))
}
