//! JWT access token handling

use std::fmt;

use anyhow::{Result, anyhow};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::data::types::UserRole;

/// JWT validation error
#[derive(Debug)]
pub enum JwtError {
    /// Token has expired
    Expired,
    /// Token signature is invalid
    InvalidSignature,
    /// Other validation error
    Invalid(String),
}

impl fmt::Display for JwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => write!(f, "Access token has expired"),
            Self::InvalidSignature => write!(f, "Invalid access token signature"),
            Self::Invalid(msg) => write!(f, "Invalid access token: {}", msg),
        }
    }
}

impl std::error::Error for JwtError {}

/// JWT claims for access tokens
///
/// `role` is informational; requests always re-read the role from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

impl TokenClaims {
    pub fn new(user_id: &str, role: UserRole, ttl_hours: u32) -> Self {
        let now = Utc::now();
        let exp = now + Duration::hours(ttl_hours as i64);

        Self {
            sub: user_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.sub
    }
}

/// Sign claims into a compact HS256 token
pub fn create_token(signing_key: &[u8], claims: &TokenClaims) -> Result<String> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(signing_key),
    )
    .map_err(|e| anyhow!("Failed to create JWT: {}", e))
}

/// Validate and decode a token
pub fn validate_token(token: &str, signing_key: &[u8]) -> Result<TokenClaims, JwtError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<TokenClaims>(token, &DecodingKey::from_secret(signing_key), &validation)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
            jsonwebtoken::errors::ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            _ => JwtError::Invalid(e.to_string()),
        })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> Vec<u8> {
        vec![0u8; 32]
    }

    #[test]
    fn test_create_and_validate() {
        let key = test_key();
        let claims = TokenClaims::new("user123", UserRole::Admin, 8);
        let token = create_token(&key, &claims).unwrap();
        let decoded = validate_token(&token, &key).unwrap();
        assert_eq!(decoded.user_id(), "user123");
        assert_eq!(decoded.role, UserRole::Admin);
        assert_eq!(decoded.exp - decoded.iat, 8 * 3600);
    }

    #[test]
    fn test_invalid_signature() {
        let claims = TokenClaims::new("user123", UserRole::Member, 8);
        let token = create_token(&[0u8; 32], &claims).unwrap();
        assert!(matches!(
            validate_token(&token, &[1u8; 32]),
            Err(JwtError::InvalidSignature)
        ));
    }

    #[test]
    fn test_expired() {
        let key = test_key();
        let mut claims = TokenClaims::new("user123", UserRole::Member, 8);
        claims.iat -= 10 * 3600;
        claims.exp = claims.iat + 3600;
        let token = create_token(&key, &claims).unwrap();
        assert!(matches!(validate_token(&token, &key), Err(JwtError::Expired)));
    }

    #[test]
    fn test_garbage() {
        assert!(matches!(
            validate_token("not.a.token", &test_key()),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn test_unique_jti() {
        let c1 = TokenClaims::new("u", UserRole::Member, 1);
        let c2 = TokenClaims::new("u", UserRole::Member, 1);
        assert_ne!(c1.jti, c2.jti);
    }
}
