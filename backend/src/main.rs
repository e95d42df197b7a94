//! Backend entry-point: wires configuration, the database pool, schema
//! initialisation with bounded retries, and the REST endpoints.

use actix_web::web;
use tracing::warn;
use tracing_subscriber::{fmt, EnvFilter};

use memento_backend::inbound::http::health::HealthState;
use memento_backend::outbound::persistence::{initialise_schema, DbPool, PoolConfig};
use memento_backend::server::{build_http_state, create_server, AppConfig, ServerConfig};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let config = AppConfig::from_env()?;
    let pool_config = PoolConfig::new(&config.database_url);

    // Schema initialisation is retried a bounded number of times; when the
    // store stays unreachable the process serves anyway and individual
    // requests surface the failure, rather than crash-looping at boot.
    if let Err(e) = initialise_schema(
        &config.database_url,
        config.schema_retry_attempts,
        config.schema_retry_backoff,
    )
    .await
    {
        warn!(error = %e, "starting degraded: schema not initialised");
    }

    let pool = match DbPool::new(pool_config.clone()).await {
        Ok(pool) => pool,
        Err(e) => {
            warn!(error = %e, "database pool unavailable, deferring connections to checkout");
            DbPool::new_lazy(&pool_config)
        }
    };

    let http_state = build_http_state(&pool, &config);
    let health_state = web::Data::new(HealthState::new());
    let server_config = ServerConfig::new(config.bind_addr, config.allowed_origins.clone());

    create_server(health_state, http_state, server_config)?.await
}
