//! Journal entry API handlers.
//!
//! ```text
//! GET    /api/entries?category=Word&search=hello&is_favorite=true&skip=0&limit=20
//! POST   /api/entries
//! GET    /api/entries/{id}
//! PUT    /api/entries/{id}
//! DELETE /api/entries/{id}
//! PATCH  /api/entries/{id}/favorite
//! ```
//!
//! Every handler resolves the caller from the bearer token first; all
//! repository calls are keyed by that owner, so an entry id belonging to
//! someone else is answered exactly like a missing id.

use actix_web::{delete, get, patch, post, put, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::domain::entry::{
    EntryContent, EntryDraft, EntryFilter, EntryId, EntryPage, EntryPatch, EntryTitle, Example,
    JournalEntry, Phonetic,
};
use crate::domain::Error;
use crate::inbound::http::auth::authenticate;
use crate::inbound::http::bearer::BearerAuth;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    map_entry_validation_error, missing_field_error, null_field_error, parse_category,
    parse_pagination,
};
use crate::inbound::http::ApiResult;

/// Query parameters for listing entries.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListEntriesQuery {
    /// Restrict to one category (`Fact`, `Word`, `Insight`, `Quote`).
    pub category: Option<String>,
    /// Case-insensitive substring matched against title or content.
    pub search: Option<String>,
    /// Restrict to favorites or non-favorites.
    pub is_favorite: Option<bool>,
    /// Zero-based offset, default 0.
    pub skip: Option<i64>,
    /// Page size between 1 and 100, default 20.
    pub limit: Option<i64>,
}

/// Request body for creating an entry.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateEntryRequest {
    /// Entry title (required, 1-255 characters).
    pub title: Option<String>,
    /// Entry body (required, 1-5000 characters).
    pub content: Option<String>,
    /// Category name; defaults to `Fact`.
    pub category: Option<String>,
    /// Optional phonetic rendering.
    pub phonetic: Option<String>,
    /// Optional usage example.
    pub example: Option<String>,
    /// Favorite flag; defaults to `false`.
    pub is_favorite: Option<bool>,
}

/// Deserialize a field so that "absent" and "explicit null" stay distinct:
/// a missing key yields `None` via the default, an explicit `null` yields
/// `Some(None)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// Request body for partially updating an entry.
///
/// Only keys present in the JSON are applied; presence is tracked per field
/// and never inferred from a value equalling its default. An explicit
/// `null` clears the nullable fields and is rejected for the others.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateEntryRequest {
    /// Replacement title.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    /// Replacement content.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub content: Option<Option<String>>,
    /// Replacement category name.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub category: Option<Option<String>>,
    /// Replacement phonetic text; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub phonetic: Option<Option<String>>,
    /// Replacement example text; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub example: Option<Option<String>>,
    /// Replacement favorite flag.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<bool>)]
    pub is_favorite: Option<Option<bool>>,
}

/// Public view of a journal entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct EntryResponse {
    /// Stable entry identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Entry title.
    pub title: String,
    /// Entry body.
    pub content: String,
    /// Category name.
    pub category: String,
    /// Optional phonetic rendering.
    pub phonetic: Option<String>,
    /// Optional usage example.
    pub example: Option<String>,
    /// Favorite flag.
    pub is_favorite: bool,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
    /// Last mutation instant.
    pub updated_at: DateTime<Utc>,
}

impl From<JournalEntry> for EntryResponse {
    fn from(entry: JournalEntry) -> Self {
        Self {
            id: *entry.id.as_uuid(),
            user_id: *entry.owner.as_uuid(),
            title: entry.title.as_str().to_owned(),
            content: entry.content.as_str().to_owned(),
            category: entry.category.as_str().to_owned(),
            phonetic: entry.phonetic.map(|p| p.as_str().to_owned()),
            example: entry.example.map(|e| e.as_str().to_owned()),
            is_favorite: entry.is_favorite,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

/// One page of entries plus the filter-wide total and effective window.
#[derive(Debug, Serialize, ToSchema)]
pub struct EntryListResponse {
    /// Entries of the requested page, most recent first.
    pub entries: Vec<EntryResponse>,
    /// Total matching rows independent of pagination.
    pub total: i64,
    /// Effective offset.
    pub skip: i64,
    /// Effective limit.
    pub limit: i64,
}

impl From<EntryPage> for EntryListResponse {
    fn from(page: EntryPage) -> Self {
        Self {
            entries: page.entries.into_iter().map(EntryResponse::from).collect(),
            total: page.total,
            skip: page.skip,
            limit: page.limit,
        }
    }
}

fn entry_not_found() -> Error {
    Error::not_found("Entry not found.")
}

fn parse_filter(query: &ListEntriesQuery) -> Result<EntryFilter, Error> {
    let category = query
        .category
        .as_deref()
        .map(parse_category)
        .transpose()?;
    Ok(EntryFilter {
        category,
        search: query.search.clone(),
        is_favorite: query.is_favorite,
    })
}

fn parse_draft(payload: CreateEntryRequest) -> Result<EntryDraft, Error> {
    let title = payload.title.ok_or_else(|| missing_field_error("title"))?;
    let content = payload
        .content
        .ok_or_else(|| missing_field_error("content"))?;

    Ok(EntryDraft {
        title: EntryTitle::new(title).map_err(map_entry_validation_error)?,
        content: EntryContent::new(content).map_err(map_entry_validation_error)?,
        category: payload
            .category
            .as_deref()
            .map(parse_category)
            .transpose()?
            .unwrap_or_default(),
        phonetic: payload
            .phonetic
            .map(Phonetic::new)
            .transpose()
            .map_err(map_entry_validation_error)?,
        example: payload
            .example
            .map(Example::new)
            .transpose()
            .map_err(map_entry_validation_error)?,
        is_favorite: payload.is_favorite.unwrap_or(false),
    })
}

fn parse_patch(payload: UpdateEntryRequest) -> Result<EntryPatch, Error> {
    let title = match payload.title {
        None => None,
        Some(None) => return Err(null_field_error("title")),
        Some(Some(value)) => Some(EntryTitle::new(value).map_err(map_entry_validation_error)?),
    };
    let content = match payload.content {
        None => None,
        Some(None) => return Err(null_field_error("content")),
        Some(Some(value)) => Some(EntryContent::new(value).map_err(map_entry_validation_error)?),
    };
    let category = match payload.category {
        None => None,
        Some(None) => return Err(null_field_error("category")),
        Some(Some(value)) => Some(parse_category(&value)?),
    };
    let phonetic = match payload.phonetic {
        None => None,
        Some(None) => Some(None),
        Some(Some(value)) => {
            Some(Some(Phonetic::new(value).map_err(map_entry_validation_error)?))
        }
    };
    let example = match payload.example {
        None => None,
        Some(None) => Some(None),
        Some(Some(value)) => Some(Some(Example::new(value).map_err(map_entry_validation_error)?)),
    };
    let is_favorite = match payload.is_favorite {
        None => None,
        Some(None) => return Err(null_field_error("is_favorite")),
        Some(Some(value)) => Some(value),
    };

    Ok(EntryPatch {
        title,
        content,
        category,
        phonetic,
        example,
        is_favorite,
    })
}

/// List the caller's entries with optional filters and pagination.
#[utoipa::path(
    get,
    path = "/api/entries",
    params(ListEntriesQuery),
    responses(
        (status = 200, description = "One page of entries", body = EntryListResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["entries"],
    operation_id = "listEntries"
)]
#[get("")]
pub async fn list_entries(
    state: web::Data<HttpState>,
    bearer: BearerAuth,
    query: web::Query<ListEntriesQuery>,
) -> ApiResult<web::Json<EntryListResponse>> {
    let user = authenticate(&state, &bearer).await?;
    let filter = parse_filter(&query)?;
    let page = parse_pagination(query.skip, query.limit)?;

    let result = state
        .entries
        .list(user.id(), &filter, &page)
        .await
        .map_err(Error::from)?;

    Ok(web::Json(EntryListResponse::from(result)))
}

/// Create a new entry owned by the caller.
#[utoipa::path(
    post,
    path = "/api/entries",
    request_body = CreateEntryRequest,
    responses(
        (status = 201, description = "Entry created", body = EntryResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["entries"],
    operation_id = "createEntry"
)]
#[post("")]
pub async fn create_entry(
    state: web::Data<HttpState>,
    bearer: BearerAuth,
    payload: web::Json<CreateEntryRequest>,
) -> ApiResult<HttpResponse> {
    let user = authenticate(&state, &bearer).await?;
    let draft = parse_draft(payload.into_inner())?;

    let entry = state
        .entries
        .insert(user.id(), draft)
        .await
        .map_err(Error::from)?;

    Ok(HttpResponse::Created().json(EntryResponse::from(entry)))
}

/// Fetch one of the caller's entries by id.
#[utoipa::path(
    get,
    path = "/api/entries/{id}",
    params(("id" = Uuid, Path, description = "Entry id")),
    responses(
        (status = 200, description = "The entry", body = EntryResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Entry not found", body = Error)
    ),
    tags = ["entries"],
    operation_id = "getEntry"
)]
#[get("/{id}")]
pub async fn get_entry(
    state: web::Data<HttpState>,
    bearer: BearerAuth,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<EntryResponse>> {
    let user = authenticate(&state, &bearer).await?;
    let entry_id = EntryId::from_uuid(id.into_inner());

    let entry = state
        .entries
        .find(user.id(), &entry_id)
        .await
        .map_err(Error::from)?
        .ok_or_else(entry_not_found)?;

    Ok(web::Json(EntryResponse::from(entry)))
}

/// Partially update one of the caller's entries.
#[utoipa::path(
    put,
    path = "/api/entries/{id}",
    params(("id" = Uuid, Path, description = "Entry id")),
    request_body = UpdateEntryRequest,
    responses(
        (status = 200, description = "The updated entry", body = EntryResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Entry not found", body = Error)
    ),
    tags = ["entries"],
    operation_id = "updateEntry"
)]
#[put("/{id}")]
pub async fn update_entry(
    state: web::Data<HttpState>,
    bearer: BearerAuth,
    id: web::Path<Uuid>,
    payload: web::Json<UpdateEntryRequest>,
) -> ApiResult<web::Json<EntryResponse>> {
    let user = authenticate(&state, &bearer).await?;
    let entry_id = EntryId::from_uuid(id.into_inner());
    let patch = parse_patch(payload.into_inner())?;

    let entry = state
        .entries
        .update(user.id(), &entry_id, patch)
        .await
        .map_err(Error::from)?
        .ok_or_else(entry_not_found)?;

    Ok(web::Json(EntryResponse::from(entry)))
}

/// Delete one of the caller's entries.
#[utoipa::path(
    delete,
    path = "/api/entries/{id}",
    params(("id" = Uuid, Path, description = "Entry id")),
    responses(
        (status = 204, description = "Entry deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Entry not found", body = Error)
    ),
    tags = ["entries"],
    operation_id = "deleteEntry"
)]
#[delete("/{id}")]
pub async fn delete_entry(
    state: web::Data<HttpState>,
    bearer: BearerAuth,
    id: web::Path<Uuid>,
) -> ApiResult<HttpResponse> {
    let user = authenticate(&state, &bearer).await?;
    let entry_id = EntryId::from_uuid(id.into_inner());

    let deleted = state
        .entries
        .delete(user.id(), &entry_id)
        .await
        .map_err(Error::from)?;
    if !deleted {
        return Err(entry_not_found().into());
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Flip the favorite flag on one of the caller's entries.
#[utoipa::path(
    patch,
    path = "/api/entries/{id}/favorite",
    params(("id" = Uuid, Path, description = "Entry id")),
    responses(
        (status = 200, description = "The entry with the flag flipped", body = EntryResponse),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Entry not found", body = Error)
    ),
    tags = ["entries"],
    operation_id = "toggleFavorite"
)]
#[patch("/{id}/favorite")]
pub async fn toggle_favorite(
    state: web::Data<HttpState>,
    bearer: BearerAuth,
    id: web::Path<Uuid>,
) -> ApiResult<web::Json<EntryResponse>> {
    let user = authenticate(&state, &bearer).await?;
    let entry_id = EntryId::from_uuid(id.into_inner());

    let entry = state
        .entries
        .toggle_favorite(user.id(), &entry_id)
        .await
        .map_err(Error::from)?
        .ok_or_else(entry_not_found)?;

    Ok(web::Json(EntryResponse::from(entry)))
}
