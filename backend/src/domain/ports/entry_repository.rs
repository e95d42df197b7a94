//! Port for owner-scoped journal entry persistence.
//!
//! This is the access-layer contract: every operation is keyed by the owning
//! user, and an entry held by another owner is reported exactly like a
//! missing one (`None` / `false`), never as a distinct failure.

use async_trait::async_trait;

use crate::domain::entry::{
    EntryDraft, EntryFilter, EntryId, EntryPage, EntryPatch, JournalEntry, Pagination,
};
use crate::domain::user::UserId;
use crate::domain::Error;

/// Errors raised by entry repository adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EntryRepositoryError {
    /// Repository connection could not be established.
    #[error("entry repository connection failed: {message}")]
    Connection {
        /// Adapter-level failure detail.
        message: String,
    },
    /// Query or mutation failed during execution.
    #[error("entry repository query failed: {message}")]
    Query {
        /// Adapter-level failure detail.
        message: String,
    },
}

impl EntryRepositoryError {
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

impl From<EntryRepositoryError> for Error {
    fn from(value: EntryRepositoryError) -> Self {
        // Store failures carry adapter detail for logs; the HTTP layer
        // redacts internal errors before they reach a client.
        Error::internal(value.to_string())
    }
}

/// Port for owner-scoped entry storage and retrieval.
///
/// # Ownership
///
/// Every method takes the owner identity derived from a verified token.
/// Implementations must conjoin `owner` into each lookup so that results
/// never include, and mutations never touch, another owner's entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EntryRepository: Send + Sync {
    /// Return one page of the owner's entries plus the filter-wide total.
    ///
    /// Ordered by creation time descending, ties broken by id so pagination
    /// stays stable. An empty page with `total == 0` is a valid result.
    async fn list(
        &self,
        owner: &UserId,
        filter: &EntryFilter,
        page: &Pagination,
    ) -> Result<EntryPage, EntryRepositoryError>;

    /// Look up a single entry jointly by `(id, owner)`.
    async fn find(
        &self,
        owner: &UserId,
        id: &EntryId,
    ) -> Result<Option<JournalEntry>, EntryRepositoryError>;

    /// Persist a new entry for the owner and return it fully populated.
    async fn insert(
        &self,
        owner: &UserId,
        draft: EntryDraft,
    ) -> Result<JournalEntry, EntryRepositoryError>;

    /// Apply a partial update to the owner's entry.
    ///
    /// Only fields present in the patch change; `updated_at` is always
    /// refreshed. Returns `None` when no entry matches `(id, owner)`.
    async fn update(
        &self,
        owner: &UserId,
        id: &EntryId,
        patch: EntryPatch,
    ) -> Result<Option<JournalEntry>, EntryRepositoryError>;

    /// Delete the owner's entry. Returns `false` when nothing matched.
    async fn delete(&self, owner: &UserId, id: &EntryId) -> Result<bool, EntryRepositoryError>;

    /// Atomically flip the favorite flag relative to its persisted value.
    ///
    /// The flip must happen in a single conditional update at the store so
    /// two interleaved toggles each invert once rather than losing one.
    /// Returns `None` when no entry matches `(id, owner)`.
    async fn toggle_favorite(
        &self,
        owner: &UserId,
        id: &EntryId,
    ) -> Result<Option<JournalEntry>, EntryRepositoryError>;
}
