//! Password value object - Domain layer password handling.
//!
//! Encapsulates the strength rule applied to submitted passwords and the
//! one-way Argon2 transform applied before anything is stored.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::errors::{AppError, AppResult};

/// Hashed password ready for storage.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain text password with a fresh random salt.
    ///
    /// The strength rule is enforced at the request boundary, so any
    /// input is accepted here.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?
            .to_string();
        Ok(Self { hash })
    }

    /// Hash on tokio's blocking pool so Argon2 stays off the async workers.
    pub async fn hash_blocking(plain_text: String) -> AppResult<Self> {
        tokio::task::spawn_blocking(move || Self::new(&plain_text))
            .await
            .map_err(|e| AppError::internal(format!("Password hash task failed: {}", e)))?
    }

    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: String) -> Self {
        Self { hash }
    }

    /// Get the hash string for storage.
    pub fn as_str(&self) -> &str {
        &self.hash
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    pub fn verify(&self, plain_text: &str) -> bool {
        PasswordHash::new(&self.hash)
            .map(|parsed| {
                Self::argon2()
                    .verify_password(plain_text.as_bytes(), &parsed)
                    .is_ok()
            })
            .unwrap_or(false)
    }

    /// True when `plain_text` holds at least one ASCII uppercase letter,
    /// one ASCII lowercase letter and one ASCII digit.
    pub fn is_strong(plain_text: &str) -> bool {
        let has_upper = plain_text.chars().any(|c| c.is_ascii_uppercase());
        let has_lower = plain_text.chars().any(|c| c.is_ascii_lowercase());
        let has_digit = plain_text.chars().any(|c| c.is_ascii_digit());
        has_upper && has_lower && has_digit
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}
