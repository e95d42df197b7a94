//! Server construction and middleware wiring.

mod config;

pub use config::{AppConfig, ServerConfig};

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{web, App, HttpServer};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::auth::{login, me, register};
use crate::inbound::http::entries::{
    create_entry, delete_entry, get_entry, list_entries, toggle_favorite, update_entry,
};
use crate::inbound::http::health::{health, live, ready, HealthState};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::middleware::trace::Trace;
use crate::outbound::persistence::{DbPool, DieselEntryRepository, DieselUserRepository};
use crate::outbound::security::{Argon2PasswordHasher, JwtTokenIssuer};

/// Build the HTTP port bundle over database-backed adapters.
pub fn build_http_state(pool: &DbPool, config: &AppConfig) -> HttpState {
    HttpState::new(HttpStatePorts {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        entries: Arc::new(DieselEntryRepository::new(pool.clone())),
        tokens: Arc::new(JwtTokenIssuer::new(
            config.secret_key.as_bytes(),
            config.token_ttl,
        )),
        passwords: Arc::new(Argon2PasswordHasher::new()),
    })
}

fn cors_from_origins(allowed_origins: &[String]) -> Cors {
    allowed_origins
        .iter()
        .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
        .allow_any_method()
        .allow_any_header()
        .supports_credentials()
}

/// Assemble the application with all routes and middleware.
///
/// Exposed so integration tests can drive the full HTTP surface against
/// in-memory ports without binding a socket.
pub fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    allowed_origins: &[String],
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody<Error: std::fmt::Debug> + use<>>,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let api = web::scope("/api")
        .service(
            web::scope("/auth")
                .service(register)
                .service(login)
                .service(me),
        )
        .service(
            web::scope("/entries")
                .service(list_entries)
                .service(create_entry)
                .service(get_entry)
                .service(update_entry)
                .service(delete_entry)
                .service(toggle_favorite),
        );

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(cors_from_origins(allowed_origins))
        .wrap(Trace)
        .service(api)
        .service(health)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));
    #[cfg(not(debug_assertions))]
    let app = app;

    app
}

/// Construct an Actix HTTP server from pre-built state and configuration.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    http_state: HttpState,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(http_state);
    let server_health_state = health_state.clone();
    let ServerConfig {
        bind_addr,
        allowed_origins,
    } = config;

    let server = HttpServer::new(move || {
        build_app(
            server_health_state.clone(),
            http_state.clone(),
            &allowed_origins,
        )
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
