//! Port for one-way password hashing and verification.

use async_trait::async_trait;

use crate::domain::Error;

/// Errors raised by password hasher adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHasherError {
    /// Hashing or hash parsing failed.
    #[error("password hashing failed: {message}")]
    Hash {
        /// Adapter-level failure detail.
        message: String,
    },
}

impl PasswordHasherError {
    /// Create a hash error with the given message.
    pub fn hash(message: impl Into<String>) -> Self {
        Self::Hash {
            message: message.into(),
        }
    }
}

impl From<PasswordHasherError> for Error {
    fn from(value: PasswordHasherError) -> Self {
        Error::internal(value.to_string())
    }
}

/// Port for deriving and checking password credentials.
///
/// Hashing is expensive, so the trait is async and adapters move the work
/// off the async executor.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Derive a one-way hash (PHC string) from a cleartext password.
    async fn hash(&self, password: &str) -> Result<String, PasswordHasherError>;

    /// Check a cleartext password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`, not an error; only adapter failures (e.g.
    /// an unparseable stored hash) are `Err`.
    async fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordHasherError>;
}
