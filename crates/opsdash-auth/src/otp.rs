//! One-time-password issue and verification over the TTL store.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::RngExt;
use serde::{Deserialize, Serialize};
use tracing::info;

use opsdash_core::config::auth::AuthConfig;
use opsdash_core::error::AppError;
use opsdash_core::result::AppResult;
use opsdash_core::types::id::UserId;
use opsdash_core::traits::cache::TtlStore;

const OTP_KEY_PREFIX: &str = "otp:";

/// Pending OTP state stored per email.
///
/// Carries its own deadline: the backing store's TTL is an eviction
/// backstop, not the source of truth for expiry.
#[derive(Debug, Serialize, Deserialize)]
struct OtpEntry {
    otp: String,
    user_id: UserId,
    expires_at: DateTime<Utc>,
}

/// Issues and verifies single-use login OTPs.
#[derive(Debug, Clone)]
pub struct OtpService<S: TtlStore> {
    store: Arc<S>,
    ttl: Duration,
}

impl<S: TtlStore> OtpService<S> {
    /// Create a new OTP service over the given store.
    pub fn new(store: Arc<S>, config: &AuthConfig) -> Self {
        Self {
            store,
            ttl: Duration::from_secs(config.otp_ttl_minutes * 60),
        }
    }

    /// Issue a fresh 6-digit OTP for the given email, replacing any
    /// outstanding one.
    pub async fn issue(&self, email: &str, user_id: UserId) -> AppResult<String> {
        let otp = format!("{:06}", rand::rng().random_range(0..1_000_000u32));
        let entry = OtpEntry {
            otp: otp.clone(),
            user_id,
            expires_at: Utc::now() + chrono::Duration::from_std(self.ttl).unwrap_or_default(),
        };

        self.store.put_json(&key(email), &entry, self.ttl).await?;
        info!(email = %email.to_lowercase(), "Issued login OTP");
        Ok(otp)
    }

    /// Verify an OTP. Single-use: a successful verification consumes the
    /// entry. Returns the user the OTP was issued for.
    pub async fn verify(&self, email: &str, otp: &str) -> AppResult<UserId> {
        let stored: Option<OtpEntry> = self.store.get_json(&key(email)).await?;

        let entry = stored.ok_or_else(|| AppError::unauthorized("Invalid or expired OTP"))?;
        if entry.otp != otp.trim() || Utc::now() > entry.expires_at {
            return Err(AppError::unauthorized("Invalid or expired OTP"));
        }

        self.store.delete(&key(email)).await?;
        Ok(entry.user_id)
    }
}

fn key(email: &str) -> String {
    format!("{OTP_KEY_PREFIX}{}", email.trim().to_lowercase())
}
