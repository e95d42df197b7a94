//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct that generates the OpenAPI specification
//! for the REST API: all HTTP endpoints from the inbound layer, the shared
//! error envelope, and the bearer token security scheme. Swagger UI serves
//! the document in debug builds.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::{LoginForm, RegisterRequest, TokenResponse, UserResponse};
use crate::inbound::http::entries::{
    CreateEntryRequest, EntryListResponse, EntryResponse, UpdateEntryRequest,
};
use crate::inbound::http::health::HealthResponse;

/// Enrich the generated document with the bearer token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Memento API",
        description = "Backend for the Memento journal app.",
        license(name = "MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::me,
        crate::inbound::http::entries::list_entries,
        crate::inbound::http::entries::create_entry,
        crate::inbound::http::entries::get_entry,
        crate::inbound::http::entries::update_entry,
        crate::inbound::http::entries::delete_entry,
        crate::inbound::http::entries::toggle_favorite,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        RegisterRequest,
        LoginForm,
        UserResponse,
        TokenResponse,
        CreateEntryRequest,
        UpdateEntryRequest,
        EntryResponse,
        EntryListResponse,
        HealthResponse,
    )),
    tags(
        (name = "auth", description = "Registration and authentication"),
        (name = "entries", description = "Owner-scoped journal entries"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI document structure.

    use super::*;

    #[test]
    fn openapi_document_registers_all_entry_paths() {
        let doc = ApiDoc::openapi();
        let paths = &doc.paths.paths;

        for path in [
            "/api/auth/register",
            "/api/auth/login",
            "/api/auth/me",
            "/api/entries",
            "/api/entries/{id}",
            "/api/entries/{id}/favorite",
            "/health",
        ] {
            assert!(paths.contains_key(path), "missing path {path}");
        }
    }

    #[test]
    fn openapi_error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;

        assert!(schemas.contains_key("Error"));
        assert!(schemas.contains_key("EntryResponse"));
    }
}
