//! Port for user account persistence.

use async_trait::async_trait;

use crate::domain::user::{Email, User, UserId, Username};
use crate::domain::Error;

/// Errors raised by user repository adapters.
///
/// Duplicate variants are reported per colliding field so the API can tell
/// the caller which one to change.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserRepositoryError {
    /// Another account already uses this email.
    #[error("email already registered")]
    DuplicateEmail,
    /// Another account already uses this username.
    #[error("username already taken")]
    DuplicateUsername,
    /// Repository connection could not be established.
    #[error("user repository connection failed: {message}")]
    Connection {
        /// Adapter-level failure detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("user repository query failed: {message}")]
    Query {
        /// Adapter-level failure detail.
        message: String,
    },
}

impl UserRepositoryError {
    /// Create a connection error with the given message.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Create a query error with the given message.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

impl From<UserRepositoryError> for Error {
    fn from(value: UserRepositoryError) -> Self {
        match value {
            UserRepositoryError::DuplicateEmail => Error::conflict("Email already registered."),
            UserRepositoryError::DuplicateUsername => Error::conflict("Username already taken."),
            other => Error::internal(other.to_string()),
        }
    }
}

/// Fields persisted when registering a new account.
#[derive(Debug, Clone)]
pub struct NewUserRecord {
    /// Validated email address.
    pub email: Email,
    /// Validated username.
    pub username: Username,
    /// One-way hashed password credential (PHC string).
    pub hashed_password: String,
}

/// A user together with the stored credential, for verification at login.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    /// The account the credential belongs to.
    pub user: User,
    /// One-way hashed password credential (PHC string).
    pub hashed_password: String,
}

/// Port for user account storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account.
    ///
    /// Uniqueness of email and username is enforced by the store; a
    /// collision surfaces as [`UserRepositoryError::DuplicateEmail`] or
    /// [`UserRepositoryError::DuplicateUsername`]. Relying on the store
    /// constraint rather than a read-then-insert check keeps registration
    /// race-free.
    async fn insert(&self, record: &NewUserRecord) -> Result<User, UserRepositoryError>;

    /// Look up an account by id, e.g. when resolving a bearer token.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Look up an account and its stored credential by login email.
    ///
    /// Takes the raw string presented at login; an address that matches no
    /// account simply returns `None`.
    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<CredentialRecord>, UserRepositoryError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(UserRepositoryError::DuplicateEmail, "Email already registered.")]
    #[case(UserRepositoryError::DuplicateUsername, "Username already taken.")]
    fn duplicate_errors_map_to_conflicts(
        #[case] err: UserRepositoryError,
        #[case] message: &str,
    ) {
        let domain: Error = err.into();
        assert_eq!(domain.code(), ErrorCode::Conflict);
        assert_eq!(domain.message(), message);
    }

    #[rstest]
    fn store_failures_map_to_internal_errors() {
        let domain: Error = UserRepositoryError::connection("refused").into();
        assert_eq!(domain.code(), ErrorCode::InternalError);
    }
}
