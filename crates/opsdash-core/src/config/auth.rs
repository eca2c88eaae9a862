//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Authentication and session-token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for signing session tokens.
    pub jwt_secret: String,
    /// Session token lifetime in minutes.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_minutes: u64,
    /// One-time-password lifetime in minutes.
    #[serde(default = "default_otp_ttl")]
    pub otp_ttl_minutes: u64,
}

fn default_token_ttl() -> u64 {
    480
}

fn default_otp_ttl() -> u64 {
    5
}
