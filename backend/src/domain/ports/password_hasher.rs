//! Driven port for one-way password hashing.

use thiserror::Error;

/// Error raised when a password cannot be hashed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordHashError {
    /// Adapter-specific detail; never includes the password.
    pub message: String,
}

impl PasswordHashError {
    /// Build an error from any displayable detail.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Salted one-way hashing with constant-time verification.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh random salt.
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// True when `password` matches `hash`. Malformed hashes never match.
    fn verify(&self, password: &str, hash: &str) -> bool;
}
