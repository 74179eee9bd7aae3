use crate::error::AppError;
use bcrypt::{hash, verify, DEFAULT_COST};

/// Hashes a plaintext password with bcrypt.
///
/// The resulting string embeds the salt and cost factor, so it is the only
/// thing that needs to be stored. There is no way back from it to the
/// plaintext; login compares candidates with [`verify_password`].
pub fn hash_password(password: &str) -> Result<String, AppError> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
}

/// Checks a plaintext candidate against a stored bcrypt hash.
///
/// A wrong password is `Ok(false)`, not an error; only a malformed stored
/// hash produces an `Err`.
pub fn verify_password(password: &str, hashed_password: &str) -> Result<bool, AppError> {
    verify(password, hashed_password)
        .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
}
