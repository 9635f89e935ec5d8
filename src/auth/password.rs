use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;

use crate::error::AppError;

/// Argon2id PHC string for `plain`, with a fresh random salt.
pub fn hash(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| anyhow::anyhow!("argon2 hash: {}", e))
}

/// Checks `plain` against a stored PHC string.
///
/// A mismatch is `InvalidCredentials`; a stored hash that cannot be read
/// back is a persistence fault, since only this module writes it.
pub fn check(plain: &str, stored: &str) -> Result<(), AppError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| AppError::Persistence(anyhow::anyhow!("stored password hash unreadable: {}", e)))?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(()),
        Err(password_hash::Error::Password) => Err(AppError::InvalidCredentials),
        Err(e) => Err(AppError::Persistence(anyhow::anyhow!("argon2 verify: {}", e))),
    }
}
