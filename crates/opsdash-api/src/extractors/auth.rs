//! `AuthUser` extractor — pulls the bearer token from the Authorization
//! header, validates it, and injects the embedded principal.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use opsdash_auth::principal::Principal;
use opsdash_core::error::AppError;

use crate::error::ApiError;
use crate::state::AppState;

/// Extracted authenticated principal available in handlers.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl AuthUser {
    /// Returns the inner `Principal`.
    pub fn principal(&self) -> &Principal {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = Principal;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::unauthorized("Invalid Authorization header format"))?;

        let principal = state.tokens.decode(token)?;

        Ok(AuthUser(principal))
    }
}
