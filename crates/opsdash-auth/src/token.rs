//! Signed session tokens carrying the full principal.
//!
//! The identity layer issues a token at login; every subsequent request
//! decodes it and trusts the embedded principal verbatim. There is no
//! server-side session row.

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use opsdash_core::config::auth::AuthConfig;
use opsdash_core::error::AppError;
use opsdash_core::types::id::{DepartmentId, UserId};
use opsdash_entity::user::{Authority, Role};

use crate::principal::Principal;

/// Claims payload embedded in every session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject — the user ID.
    pub sub: UserId,
    /// Full display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Management tier at issuance time.
    pub role: Role,
    /// Free-text designation at issuance time.
    pub designation: String,
    /// The user's department.
    pub department_id: DepartmentId,
    /// Junior dashboard soft-disable flag.
    pub dashboard_access_enabled: bool,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

impl Claims {
    /// Rebuild the principal, resolving authority from the designation.
    pub fn into_principal(self) -> Principal {
        let authority = Authority::from_designation(&self.designation);
        Principal {
            id: self.sub,
            name: self.name,
            email: self.email,
            role: self.role,
            designation: self.designation,
            department_id: self.department_id,
            dashboard_access_enabled: self.dashboard_access_enabled,
            authority,
        }
    }
}

/// Encodes and validates session tokens.
#[derive(Clone)]
pub struct TokenService {
    /// HMAC secret key for signing.
    encoding_key: EncodingKey,
    /// HMAC secret key for verification.
    decoding_key: DecodingKey,
    /// Validation configuration.
    validation: Validation,
    /// Token TTL in minutes.
    ttl_minutes: i64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

impl TokenService {
    /// Creates a new token service from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 5; // seconds of clock-skew leeway

        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            ttl_minutes: config.token_ttl_minutes as i64,
        }
    }

    /// Issues a signed token for the given principal.
    pub fn issue(&self, principal: &Principal) -> Result<(String, DateTime<Utc>), AppError> {
        let now = Utc::now();
        let exp = now + chrono::Duration::minutes(self.ttl_minutes);

        let claims = Claims {
            sub: principal.id,
            name: principal.name.clone(),
            email: principal.email.clone(),
            role: principal.role,
            designation: principal.designation.clone(),
            department_id: principal.department_id,
            dashboard_access_enabled: principal.dashboard_access_enabled,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))?;

        Ok((token, exp))
    }

    /// Decodes and validates a token, returning the embedded principal.
    pub fn decode(&self, token: &str) -> Result<Principal, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AppError::unauthorized(format!("Invalid session token: {e}")))?;
        Ok(data.claims.into_principal())
    }
}
