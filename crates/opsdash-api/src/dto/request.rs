//! Request DTOs.

use serde::{Deserialize, Serialize};
use validator::Validate;

use opsdash_entity::user::Role;

/// POST /api/auth/check-email
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckEmailRequest {
    /// Login email.
    #[validate(email)]
    pub email: String,
    /// Expected management tier for this login screen.
    pub role: Role,
}

/// POST /api/auth/check-password
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckPasswordRequest {
    /// Login email.
    #[validate(email)]
    pub email: String,
    /// Plaintext password to verify.
    #[validate(length(min = 1))]
    pub password: String,
}

/// POST /api/auth/send-otp
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendOtpRequest {
    /// Login email.
    #[validate(email)]
    pub email: String,
    /// Expected management tier.
    pub role: Role,
}

/// POST /api/auth/verify-otp
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct VerifyOtpRequest {
    /// Login email.
    #[validate(email)]
    pub email: String,
    /// The one-time password.
    #[validate(length(equal = 6))]
    pub otp: String,
}

/// POST /api/files/{id}/action
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FileActionRequest {
    /// `"accept"` or `"reject"`.
    pub action: String,
    /// Optional notes attached to the decision.
    #[validate(length(max = 2000))]
    pub notes: Option<String>,
}

/// PUT /api/users/{id}/dashboard-access
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardAccessRequest {
    /// New value of the dashboard-access flag.
    pub enabled: bool,
}
