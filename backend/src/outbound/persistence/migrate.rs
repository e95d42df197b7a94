//! Embedded schema migrations and the bounded startup retry loop.
//!
//! Schema initialisation runs at process start. A store that is not yet
//! reachable is retried a fixed number of times with a constant backoff;
//! when every attempt fails the caller proceeds degraded rather than
//! crash-looping, and individual requests surface store failures instead.

use std::time::Duration;

use diesel::{Connection, PgConnection};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{info, warn};

/// Migrations compiled into the binary from `migrations/`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Errors raised while initialising the schema.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaError {
    /// The database was unreachable.
    #[error("failed to connect for migrations: {message}")]
    Connection {
        /// Underlying connection failure detail.
        message: String,
    },
    /// A migration failed to apply.
    #[error("failed to run migrations: {message}")]
    Migration {
        /// Underlying migration failure detail.
        message: String,
    },
}

/// Apply all pending migrations over a short-lived synchronous connection.
///
/// Diesel's migration harness is synchronous, so this must run off the async
/// executor (see [`initialise_schema`]).
pub fn run_pending_migrations(database_url: &str) -> Result<usize, SchemaError> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| SchemaError::Connection {
        message: err.to_string(),
    })?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| SchemaError::Migration {
            message: err.to_string(),
        })?;

    Ok(applied.len())
}

/// Initialise the schema, retrying a bounded number of times.
///
/// Each attempt connects and applies pending migrations; failures wait
/// `backoff` before the next try. Returns the last error once `attempts` is
/// exhausted so the caller can decide to proceed degraded.
pub async fn initialise_schema(
    database_url: &str,
    attempts: u32,
    backoff: Duration,
) -> Result<(), SchemaError> {
    let mut last_error = SchemaError::Connection {
        message: "no migration attempts were made".to_owned(),
    };

    for attempt in 1..=attempts {
        let url = database_url.to_owned();
        let result = tokio::task::spawn_blocking(move || run_pending_migrations(&url))
            .await
            .unwrap_or_else(|err| {
                Err(SchemaError::Migration {
                    message: format!("migration task panicked: {err}"),
                })
            });

        match result {
            Ok(applied) => {
                info!(applied, attempt, "database schema initialised");
                return Ok(());
            }
            Err(err) => {
                warn!(attempt, attempts, error = %err, "schema initialisation failed");
                last_error = err;
                if attempt < attempts {
                    tokio::time::sleep(backoff).await;
                }
            }
        }
    }

    Err(last_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn connection_failures_surface_with_detail() {
        let err = run_pending_migrations("postgres://127.0.0.1:1/refused")
            .expect_err("no database listening");
        assert!(matches!(err, SchemaError::Connection { .. }));
    }

    #[tokio::test]
    async fn retries_are_bounded() {
        let started = std::time::Instant::now();
        let err = initialise_schema(
            "postgres://127.0.0.1:1/refused",
            2,
            Duration::from_millis(10),
        )
        .await
        .expect_err("all attempts fail");

        assert!(matches!(err, SchemaError::Connection { .. }));
        // Two attempts with one 10ms backoff in between.
        assert!(started.elapsed() >= Duration::from_millis(10));
    }
}
