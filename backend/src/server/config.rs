//! Environment-derived application settings and the server configuration
//! object.
//!
//! All settings come from environment variables with development-friendly
//! defaults; the signing secret is the one value a release build refuses to
//! run without.

use std::net::SocketAddr;
use std::time::Duration as StdDuration;

use chrono::Duration;
use tracing::warn;

/// Signing secret fallback accepted only in debug builds.
const DEV_SECRET_KEY: &str = "change-this-secret-key-in-production";

/// Application settings resolved from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string (`DATABASE_URL`).
    pub database_url: String,
    /// Shared token signing secret (`SECRET_KEY`).
    pub secret_key: String,
    /// Bearer token lifetime (`ACCESS_TOKEN_EXPIRE_MINUTES`, default 1440).
    pub token_ttl: Duration,
    /// CORS origin allow-list (`ALLOWED_ORIGINS`, comma separated).
    pub allowed_origins: Vec<String>,
    /// Listen address (`BIND_ADDR`, default `0.0.0.0:8080`).
    pub bind_addr: SocketAddr,
    /// Schema initialisation attempts (`STARTUP_RETRY_ATTEMPTS`, default 5).
    pub schema_retry_attempts: u32,
    /// Fixed backoff between attempts (`STARTUP_RETRY_BACKOFF_SECS`,
    /// default 2).
    pub schema_retry_backoff: StdDuration,
}

impl AppConfig {
    /// Resolve settings from the process environment.
    ///
    /// # Errors
    ///
    /// Fails when `SECRET_KEY` is absent outside debug builds, or when a
    /// numeric or address variable cannot be parsed.
    pub fn from_env() -> std::io::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").unwrap_or_else(|_| {
            "postgresql://memento:memento_password@db:5432/memento_db".to_owned()
        });

        let secret_key = match std::env::var("SECRET_KEY") {
            Ok(value) if !value.is_empty() => value,
            _ if cfg!(debug_assertions) => {
                warn!("SECRET_KEY not set, using development fallback (dev only)");
                DEV_SECRET_KEY.to_owned()
            }
            _ => {
                return Err(std::io::Error::other(
                    "SECRET_KEY must be set in release builds",
                ));
            }
        };

        let token_ttl = parse_token_ttl(std::env::var("ACCESS_TOKEN_EXPIRE_MINUTES").ok())?;
        let allowed_origins = parse_origins(std::env::var("ALLOWED_ORIGINS").ok());
        let bind_addr = parse_bind_addr(std::env::var("BIND_ADDR").ok())?;
        let schema_retry_attempts =
            parse_u32(std::env::var("STARTUP_RETRY_ATTEMPTS").ok(), 5, "STARTUP_RETRY_ATTEMPTS")?;
        let backoff_secs = parse_u32(
            std::env::var("STARTUP_RETRY_BACKOFF_SECS").ok(),
            2,
            "STARTUP_RETRY_BACKOFF_SECS",
        )?;

        Ok(Self {
            database_url,
            secret_key,
            token_ttl,
            allowed_origins,
            bind_addr,
            schema_retry_attempts,
            schema_retry_backoff: StdDuration::from_secs(backoff_secs.into()),
        })
    }
}

fn parse_token_ttl(raw: Option<String>) -> std::io::Result<Duration> {
    let minutes = match raw {
        None => 1440,
        Some(value) => value.parse::<i64>().map_err(|err| {
            std::io::Error::other(format!("invalid ACCESS_TOKEN_EXPIRE_MINUTES: {err}"))
        })?,
    };
    if minutes <= 0 {
        return Err(std::io::Error::other(
            "ACCESS_TOKEN_EXPIRE_MINUTES must be positive",
        ));
    }
    Ok(Duration::minutes(minutes))
}

fn parse_origins(raw: Option<String>) -> Vec<String> {
    let raw =
        raw.unwrap_or_else(|| "http://localhost:5173,http://localhost:3000".to_owned());
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_bind_addr(raw: Option<String>) -> std::io::Result<SocketAddr> {
    raw.unwrap_or_else(|| "0.0.0.0:8080".to_owned())
        .parse()
        .map_err(|err| std::io::Error::other(format!("invalid BIND_ADDR: {err}")))
}

fn parse_u32(raw: Option<String>, default: u32, name: &str) -> std::io::Result<u32> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|err| std::io::Error::other(format!("invalid {name}: {err}"))),
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) allowed_origins: Vec<String>,
}

impl ServerConfig {
    /// Construct a server configuration.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, allowed_origins: Vec<String>) -> Self {
        Self {
            bind_addr,
            allowed_origins,
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn token_ttl_defaults_to_one_day() {
        let ttl = parse_token_ttl(None).expect("default");
        assert_eq!(ttl, Duration::minutes(1440));
    }

    #[rstest]
    #[case(Some("0".to_owned()))]
    #[case(Some("-5".to_owned()))]
    #[case(Some("soon".to_owned()))]
    fn token_ttl_rejects_non_positive_and_garbage(#[case] raw: Option<String>) {
        assert!(parse_token_ttl(raw).is_err());
    }

    #[rstest]
    fn origins_split_and_trim() {
        let origins = parse_origins(Some(
            " https://memento.example , http://localhost:3000 ,".to_owned(),
        ));
        assert_eq!(
            origins,
            vec![
                "https://memento.example".to_owned(),
                "http://localhost:3000".to_owned()
            ]
        );
    }

    #[rstest]
    fn origins_default_to_local_dev_hosts() {
        let origins = parse_origins(None);
        assert_eq!(origins.len(), 2);
        assert!(origins.iter().all(|origin| origin.starts_with("http://localhost")));
    }

    #[rstest]
    fn bind_addr_defaults_and_parses() {
        let addr = parse_bind_addr(None).expect("default");
        assert_eq!(addr.port(), 8080);

        assert!(parse_bind_addr(Some("not-an-addr".to_owned())).is_err());
    }
}
