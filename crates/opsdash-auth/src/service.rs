//! Login flow orchestration: email/password checks, OTP, token issuance.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use opsdash_core::error::AppError;
use opsdash_core::result::AppResult;
use opsdash_core::traits::cache::TtlStore;
use opsdash_database::repositories::user::UserRepository;
use opsdash_entity::user::Role;

use crate::otp::OtpService;
use crate::password::PasswordHasher;
use crate::principal::Principal;
use crate::token::TokenService;

/// A successful login: the signed session token and its principal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginSession {
    /// Signed session token to present as a bearer credential.
    pub token: String,
    /// Token expiry.
    pub expires_at: DateTime<Utc>,
    /// The authenticated principal.
    pub principal: Principal,
}

/// Orchestrates the multi-step OTP login flow.
#[derive(Debug, Clone)]
pub struct AuthService<S: TtlStore> {
    users: Arc<UserRepository>,
    otp: OtpService<S>,
    passwords: PasswordHasher,
    tokens: TokenService,
}

impl<S: TtlStore> AuthService<S> {
    /// Create a new auth service.
    pub fn new(
        users: Arc<UserRepository>,
        otp: OtpService<S>,
        passwords: PasswordHasher,
        tokens: TokenService,
    ) -> Self {
        Self {
            users,
            otp,
            passwords,
            tokens,
        }
    }

    /// Check that an account exists for the email under the given role.
    pub async fn check_email(&self, email: &str, role: Role) -> AppResult<()> {
        self.users
            .find_by_email_and_role(email, role)
            .await?
            .ok_or_else(|| AppError::not_found("Unauthorized email"))?;
        Ok(())
    }

    /// Check a password against the stored hash.
    pub async fn check_password(&self, email: &str, password: &str) -> AppResult<()> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if !self.passwords.verify_password(password, &user.password_hash)? {
            return Err(AppError::unauthorized("Invalid password"));
        }
        Ok(())
    }

    /// Issue an OTP for the email under the given role.
    ///
    /// The OTP is returned to the caller for delivery; there is no mailer
    /// in this system.
    pub async fn send_otp(&self, email: &str, role: Role) -> AppResult<String> {
        let user = self
            .users
            .find_by_email_and_role(email, role)
            .await?
            .ok_or_else(|| AppError::not_found("Unauthorized email"))?;

        self.otp.issue(email, user.id).await
    }

    /// Verify an OTP and open a session.
    ///
    /// The principal is rebuilt from a fresh database read so designation
    /// or department changes since OTP issuance are reflected.
    pub async fn verify_otp(&self, email: &str, otp: &str) -> AppResult<LoginSession> {
        let user_id = self.otp.verify(email, otp).await?;

        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found after OTP verification"))?;

        let principal = Principal::from_user(&user);
        let (token, expires_at) = self.tokens.issue(&principal)?;

        info!(user_id = %principal.id, role = %principal.role, "User logged in");

        Ok(LoginSession {
            token,
            expires_at,
            principal,
        })
    }

    /// Re-read the principal's account from the database.
    pub async fn refresh_principal(&self, principal: &Principal) -> AppResult<Principal> {
        let user = self
            .users
            .find_by_id(principal.id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Account no longer exists"))?;
        Ok(Principal::from_user(&user))
    }
}
