//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{EntryRepository, PasswordHasher, TokenIssuer, UserRepository};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// User account storage.
    pub users: Arc<dyn UserRepository>,
    /// Owner-scoped entry storage.
    pub entries: Arc<dyn EntryRepository>,
    /// Bearer token issuance and verification.
    pub tokens: Arc<dyn TokenIssuer>,
    /// One-way password hashing.
    pub passwords: Arc<dyn PasswordHasher>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// User account storage.
    pub users: Arc<dyn UserRepository>,
    /// Owner-scoped entry storage.
    pub entries: Arc<dyn EntryRepository>,
    /// Bearer token issuance and verification.
    pub tokens: Arc<dyn TokenIssuer>,
    /// One-way password hashing.
    pub passwords: Arc<dyn PasswordHasher>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            users,
            entries,
            tokens,
            passwords,
        } = ports;
        Self {
            users,
            entries,
            tokens,
            passwords,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
