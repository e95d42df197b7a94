//! Memento backend library modules.
//!
//! Layout follows a hexagonal shape: `domain` holds transport-agnostic
//! types and port contracts, `inbound` adapts HTTP requests onto them,
//! `outbound` implements the ports over PostgreSQL and the credential
//! primitives, and `server` wires everything into an Actix application.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request tracing middleware re-exported for application wiring.
pub use middleware::trace::Trace;
