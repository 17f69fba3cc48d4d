use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use thiserror::Error;

use crate::config::SecurityConfig;

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("password must be at least {0} characters")]
    TooShort(usize),
    #[error("PIN must be 4-6 digits")]
    InvalidPin,
    #[error("hashing failed: {0}")]
    Hash(String),
}

/// Argon2id hasher shared by passwords and PINs.
#[derive(Clone)]
pub struct SecretHasher {
    argon2: Argon2<'static>,
}

impl SecretHasher {
    pub fn new(security: &SecurityConfig) -> Result<Self, PasswordError> {
        let params = Params::new(
            security.argon2_memory_kib,
            security.argon2_iterations,
            security.argon2_parallelism,
            None,
        )
        .map_err(|e| PasswordError::Hash(format!("invalid Argon2 parameters: {e}")))?;

        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    pub fn hash(&self, secret: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2
            .hash_password(secret.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }

    /// Returns false for a mismatch and for a stored hash that fails to parse.
    pub fn verify(&self, secret: &str, stored: &str) -> bool {
        let parsed = match PasswordHash::new(stored) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Stored hash could not be parsed: {}", e);
                return false;
            }
        };
        self.argon2.verify_password(secret.as_bytes(), &parsed).is_ok()
    }

    /// `hash` on the blocking pool; argon2 is too slow for an async worker.
    pub async fn hash_async(&self, secret: &str) -> Result<String, PasswordError> {
        let hasher = self.clone();
        let secret = secret.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&secret))
            .await
            .map_err(|e| PasswordError::Hash(e.to_string()))?
    }

    pub async fn verify_async(&self, secret: &str, stored: &str) -> bool {
        let hasher = self.clone();
        let secret = secret.to_string();
        let stored = stored.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&secret, &stored))
            .await
            .unwrap_or(false)
    }
}

pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(PasswordError::TooShort(MIN_PASSWORD_LENGTH));
    }
    Ok(())
}

pub fn validate_pin(pin: &str) -> Result<(), PasswordError> {
    let len_ok = (4..=6).contains(&pin.len());
    if len_ok && pin.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(PasswordError::InvalidPin)
    }
}
