use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

/// Claims carried by the bearer token: just the username and a fixed expiry.
/// Tokens are stateless; there is no server-side revocation.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(username: &str) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().jwt_expiry_hours;
        Self {
            sub: username.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::hours(expiry_hours as i64)).timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    /// Deliberately carries no detail: unknown user and wrong password are
    /// indistinguishable to the client.
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("invalid token: {0}")]
    InvalidToken(String),
    #[error("token generation failed: {0}")]
    TokenGeneration(String),
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

pub fn generate_jwt(claims: &Claims) -> Result<String, AuthError> {
    let secret = &config::config().jwt_secret;
    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| AuthError::TokenGeneration(e.to_string()))
}

pub fn validate_jwt(token: &str) -> Result<Claims, AuthError> {
    let secret = &config::config().jwt_secret;
    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::default();
    decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|e| AuthError::InvalidToken(e.to_string()))
}

pub fn hash_password(plain: &str) -> Result<String, AuthError> {
    bcrypt::hash(plain, config::config().bcrypt_cost).map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Constant-effort comparison against the stored bcrypt hash. A malformed
/// hash verifies as false rather than erroring.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    bcrypt::verify(plain, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_token_carries_username() {
        let token = generate_jwt(&Claims::new("moviefan1")).unwrap();
        let claims = validate_jwt(&token).unwrap();
        assert_eq!(claims.sub, "moviefan1");
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now();
        let claims = Claims {
            sub: "moviefan1".to_string(),
            iat: (now - Duration::hours(48)).timestamp(),
            exp: (now - Duration::hours(24)).timestamp(),
        };
        let token = generate_jwt(&claims).unwrap();
        assert!(validate_jwt(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(validate_jwt("not-a-token").is_err());
    }

    #[test]
    fn password_verifies_only_with_original() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!verify_password("correct horse", "not-a-bcrypt-hash"));
    }
}
