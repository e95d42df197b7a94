//! Port for bearer token issuance and verification.

use crate::domain::user::UserId;
use crate::domain::Error;

/// Errors raised by token issuer adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenIssuerError {
    /// The token's expiry instant has passed.
    #[error("token has expired")]
    Expired,
    /// The token failed signature or structural validation.
    #[error("token is invalid")]
    Invalid,
    /// The adapter failed to sign a new token.
    #[error("token signing failed: {message}")]
    Signing {
        /// Adapter-level failure detail.
        message: String,
    },
}

impl TokenIssuerError {
    /// Create a signing error with the given message.
    pub fn signing(message: impl Into<String>) -> Self {
        Self::Signing {
            message: message.into(),
        }
    }
}

impl From<TokenIssuerError> for Error {
    fn from(value: TokenIssuerError) -> Self {
        match value {
            // Expired and malformed tokens read the same to the caller.
            TokenIssuerError::Expired | TokenIssuerError::Invalid => {
                Error::unauthorized("Could not validate credentials.")
            }
            TokenIssuerError::Signing { message } => Error::internal(message),
        }
    }
}

/// Port for stateless bearer tokens binding a user identity to an expiry.
///
/// Implementations are pure CPU work over a shared signing secret, so the
/// trait is synchronous.
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    /// Issue a signed token for the user, expiring after the configured
    /// duration.
    fn issue(&self, user: &UserId) -> Result<String, TokenIssuerError>;

    /// Verify a presented token and extract the user identity it binds.
    fn verify(&self, token: &str) -> Result<UserId, TokenIssuerError>;
}
