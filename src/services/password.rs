use bcrypt::{BcryptError, hash, verify};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Stored password hash is malformed: {0}")]
    Verification(BcryptError),

    #[error("Failed to hash password: {0}")]
    Hashing(BcryptError),
}

/// bcrypt with a fresh random salt per call; the salt and cost are embedded
/// in the returned hash string.
pub fn hash_password(password: &str, cost: u32) -> Result<String, CredentialError> {
    hash(password, cost).map_err(CredentialError::Hashing)
}

/// Constant-time check of `password` against a stored bcrypt hash.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, CredentialError> {
    verify(password, password_hash).map_err(CredentialError::Verification)
}
