//! Authentication manager

use anyhow::Result;
use chrono::{DateTime, Utc};

use super::jwt::{JwtError, TokenClaims, create_token, validate_token};
use crate::core::SecretManager;
use crate::data::types::UserRow;

/// Signed access token with its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and validates access tokens
#[derive(Debug)]
pub struct AuthManager {
    signing_key: Vec<u8>,
    ttl_hours: u32,
}

impl AuthManager {
    pub fn init(secrets: &SecretManager, ttl_hours: u32) -> Self {
        tracing::debug!(backend = secrets.backend().name(), ttl_hours, "Authentication ready");
        Self::new(secrets.jwt_signing_key().to_vec(), ttl_hours)
    }

    pub fn new(signing_key: Vec<u8>, ttl_hours: u32) -> Self {
        Self {
            signing_key,
            ttl_hours,
        }
    }

    pub fn ttl_hours(&self) -> u32 {
        self.ttl_hours
    }

    pub fn issue_token(&self, user: &UserRow) -> Result<IssuedToken> {
        let claims = TokenClaims::new(&user.id, user.role, self.ttl_hours);
        let token = create_token(&self.signing_key, &claims)?;
        Ok(IssuedToken {
            token,
            expires_at: DateTime::from_timestamp(claims.exp, 0).unwrap_or_else(Utc::now),
        })
    }

    pub fn validate_token(&self, token: &str) -> Result<TokenClaims, JwtError> {
        validate_token(token, &self.signing_key)
    }
}
