//! Ports (use-case contracts) implemented by outbound adapters.
//!
//! Each port is an async trait with a `thiserror` error enum carrying
//! snake_case constructor helpers. Adapters translate their native failures
//! into these enums; the inbound layer converts them to the domain
//! [`crate::domain::Error`] envelope via the `From` impls defined alongside
//! each port.

mod entry_repository;
mod password_hasher;
mod token_issuer;
mod user_repository;

pub use entry_repository::{EntryRepository, EntryRepositoryError};
pub use password_hasher::{PasswordHasher, PasswordHasherError};
pub use token_issuer::{TokenIssuer, TokenIssuerError};
pub use user_repository::{CredentialRecord, NewUserRecord, UserRepository, UserRepositoryError};

#[cfg(test)]
pub use entry_repository::MockEntryRepository;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
#[cfg(test)]
pub use token_issuer::MockTokenIssuer;
#[cfg(test)]
pub use user_repository::MockUserRepository;
