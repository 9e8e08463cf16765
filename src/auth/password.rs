//! bcrypt wrappers. Both calls are CPU-bound; request handlers run them through
//! `web::block`.

use crate::error::AppError;

/// Hashes `password` with a fresh salt at the given bcrypt `cost`.
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Checks `password` against a stored bcrypt hash.
///
/// A stored value that is not a bcrypt hash is an internal error, not a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    Ok(bcrypt::verify(password, password_hash)?)
}
