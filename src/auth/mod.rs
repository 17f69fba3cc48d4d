pub mod password;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;
use crate::types::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: UserRole,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: &str, role: UserRole, token_type: TokenType, security: &SecurityConfig) -> Self {
        let now = Utc::now();
        let lifetime = match token_type {
            TokenType::Access => Duration::minutes(security.access_token_minutes),
            TokenType::Refresh => Duration::days(security.refresh_token_days),
        };

        Self {
            sub: user_id,
            email: email.to_string(),
            role,
            token_type,
            iat: now.timestamp(),
            exp: (now + lifetime).timestamp(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),
    #[error("JWT secret not configured")]
    InvalidSecret,
    #[error("token expired")]
    Expired,
    #[error("expected {expected:?} token, got {actual:?}")]
    WrongType { expected: TokenType, actual: TokenType },
    #[error("invalid token: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    /// Access-token lifetime in seconds.
    pub expires_in: i64,
}

pub fn generate_jwt(claims: &Claims, security: &SecurityConfig) -> Result<String, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(security.jwt_secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn issue_token_pair(
    user_id: Uuid,
    email: &str,
    role: UserRole,
    security: &SecurityConfig,
) -> Result<TokenPair, JwtError> {
    let access = Claims::new(user_id, email, role, TokenType::Access, security);
    let refresh = Claims::new(user_id, email, role, TokenType::Refresh, security);

    Ok(TokenPair {
        access_token: generate_jwt(&access, security)?,
        refresh_token: generate_jwt(&refresh, security)?,
        token_type: "Bearer",
        expires_in: security.access_token_minutes * 60,
    })
}

/// Decode and verify a token, rejecting it unless it is of the `expected` type.
pub fn decode_token(token: &str, expected: TokenType, security: &SecurityConfig) -> Result<Claims, JwtError> {
    if security.jwt_secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(security.jwt_secret.as_bytes());
    let mut validation = Validation::default();
    validation.leeway = 0;

    let claims = decode::<Claims>(token, &decoding_key, &validation)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => JwtError::Expired,
            _ => JwtError::Invalid(e.to_string()),
        })?
        .claims;

    if claims.token_type != expected {
        return Err(JwtError::WrongType {
            expected,
            actual: claims.token_type,
        });
    }

    Ok(claims)
}

/// Six-digit numeric code for password resets.
pub fn generate_reset_code() -> String {
    format!("{:06}", rand::thread_rng().gen_range(0..1_000_000))
}

pub fn digest_reset_code(code: &str) -> String {
    let digest = Sha256::digest(code.trim().as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    fn security() -> SecurityConfig {
        AppConfig::development().security
    }

    #[test]
    fn token_pair_round_trip() {
        let security = security();
        let id = Uuid::new_v4();
        let pair = issue_token_pair(id, "a@b.c", UserRole::Admin, &security).unwrap();
        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 30 * 60);

        let claims = decode_token(&pair.access_token, TokenType::Access, &security).unwrap();
        assert_eq!(claims.sub, id);
        assert_eq!(claims.role, UserRole::Admin);

        let refresh = decode_token(&pair.refresh_token, TokenType::Refresh, &security).unwrap();
        assert!(refresh.exp > claims.exp);
    }

    #[test]
    fn wrong_token_type_is_rejected() {
        let security = security();
        let pair = issue_token_pair(Uuid::new_v4(), "a@b.c", UserRole::User, &security).unwrap();
        assert!(matches!(
            decode_token(&pair.refresh_token, TokenType::Access, &security),
            Err(JwtError::WrongType { .. })
        ));
    }

    #[test]
    fn bad_signature_is_rejected() {
        let security = security();
        let pair = issue_token_pair(Uuid::new_v4(), "a@b.c", UserRole::User, &security).unwrap();
        let mut other = security.clone();
        other.jwt_secret = "another-secret".to_string();
        assert!(matches!(
            decode_token(&pair.access_token, TokenType::Access, &other),
            Err(JwtError::Invalid(_))
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut security = security();
        security.access_token_minutes = -5;
        let claims = Claims::new(Uuid::new_v4(), "a@b.c", UserRole::User, TokenType::Access, &security);
        let token = generate_jwt(&claims, &security).unwrap();
        assert!(matches!(
            decode_token(&token, TokenType::Access, &security),
            Err(JwtError::Expired)
        ));
    }

    #[test]
    fn reset_codes() {
        let code = generate_reset_code();
        assert_eq!(code.len(), 6);
        assert!(code.bytes().all(|b| b.is_ascii_digit()));
        assert_eq!(digest_reset_code("123456"), digest_reset_code(" 123456 "));
        assert_eq!(digest_reset_code("123456").len(), 64);
        assert_ne!(digest_reset_code("123456"), digest_reset_code("654321"));
    }
}
