//! Domain primitives and aggregates.
//!
//! Purpose: define strongly typed domain entities used by the API and
//! persistence layers. Keep types immutable and document invariants in each
//! type's Rustdoc.
//!
//! Public surface:
//! - [`Error`] / [`ErrorCode`] — transport-agnostic error envelope.
//! - [`User`] and its value objects — account identity.
//! - [`JournalEntry`] and its value objects — the entry aggregate plus the
//!   filter, pagination, draft, and patch types of the access layer.
//! - [`ports`] — contracts implemented by outbound adapters.

pub mod auth;
pub mod entry;
pub mod error;
pub mod ports;
pub mod user;

pub use self::auth::{
    LoginCredentials, LoginValidationError, Registration, RegistrationValidationError,
    PASSWORD_MIN,
};
pub use self::entry::{
    EntryCategory, EntryContent, EntryDraft, EntryFilter, EntryId, EntryPage, EntryPatch,
    EntryTitle, EntryValidationError, Example, JournalEntry, Pagination, PaginationError,
    Phonetic, LIMIT_DEFAULT, LIMIT_MAX, LIMIT_MIN,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::user::{Email, User, UserId, Username, UserValidationError};
