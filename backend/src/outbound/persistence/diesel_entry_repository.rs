//! PostgreSQL-backed `EntryRepository` implementation using Diesel ORM.
//!
//! Every query and mutation conjoins the owner id into its filter, so a
//! row held by another owner behaves exactly like a missing row. The
//! favorite toggle is a single conditional UPDATE to avoid lost updates
//! when two toggles interleave.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::entry::{
    EntryCategory, EntryContent, EntryDraft, EntryFilter, EntryId, EntryPage, EntryPatch,
    EntryTitle, Example, JournalEntry, Pagination, Phonetic,
};
use crate::domain::ports::{EntryRepository, EntryRepositoryError};
use crate::domain::UserId;

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{EntryChangeset, EntryRow, NewEntryRow};
use super::pool::{DbPool, PoolError};
use super::schema::journal_entries;

/// Diesel-backed implementation of the entry repository port.
#[derive(Clone)]
pub struct DieselEntryRepository {
    pool: DbPool,
}

impl DieselEntryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> EntryRepositoryError {
    map_basic_pool_error(error, EntryRepositoryError::connection)
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: diesel::result::Error) -> EntryRepositoryError {
    map_basic_diesel_error(
        error,
        EntryRepositoryError::query,
        EntryRepositoryError::connection,
    )
}

/// Escape LIKE wildcards so a search term matches as a literal substring.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Build the owner-scoped, filtered base query shared by the count and the
/// page select. The owner conjunct is unconditional; everything else is
/// appended only when the filter supplies it.
fn filtered_query(
    owner: Uuid,
    filter: &EntryFilter,
) -> journal_entries::BoxedQuery<'static, diesel::pg::Pg> {
    let mut query = journal_entries::table
        .filter(journal_entries::user_id.eq(owner))
        .into_boxed();

    if let Some(category) = filter.category {
        query = query.filter(journal_entries::category.eq(category.as_str()));
    }
    if let Some(term) = filter.search_term() {
        let pattern = format!("%{}%", escape_like(term));
        query = query.filter(
            journal_entries::title
                .ilike(pattern.clone())
                .or(journal_entries::content.ilike(pattern)),
        );
    }
    if let Some(favorite) = filter.is_favorite {
        query = query.filter(journal_entries::is_favorite.eq(favorite));
    }

    query
}

/// Convert a database row into a validated domain entry.
fn row_to_entry(row: EntryRow) -> Result<JournalEntry, EntryRepositoryError> {
    let EntryRow {
        id,
        user_id,
        title,
        content,
        category,
        phonetic,
        example,
        is_favorite,
        created_at,
        updated_at,
    } = row;

    let category = match category.parse::<EntryCategory>() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!(
                value = category,
                entry_id = %id,
                "unrecognised category value, defaulting to Fact"
            );
            EntryCategory::Fact
        }
    };

    Ok(JournalEntry {
        id: EntryId::from_uuid(id),
        owner: UserId::from_uuid(user_id),
        title: EntryTitle::new(title).map_err(|err| EntryRepositoryError::query(err.to_string()))?,
        content: EntryContent::new(content)
            .map_err(|err| EntryRepositoryError::query(err.to_string()))?,
        category,
        phonetic: phonetic
            .map(Phonetic::new)
            .transpose()
            .map_err(|err| EntryRepositoryError::query(err.to_string()))?,
        example: example
            .map(Example::new)
            .transpose()
            .map_err(|err| EntryRepositoryError::query(err.to_string()))?,
        is_favorite,
        created_at,
        updated_at,
    })
}

/// Build the update changeset from a patch, always refreshing `updated_at`.
fn changeset_from_patch(patch: EntryPatch) -> EntryChangeset {
    EntryChangeset {
        title: patch.title.map(|title| title.as_str().to_owned()),
        content: patch.content.map(|content| content.as_str().to_owned()),
        category: patch.category.map(EntryCategory::as_str),
        phonetic: patch
            .phonetic
            .map(|value| value.map(|p| p.as_str().to_owned())),
        example: patch
            .example
            .map(|value| value.map(|e| e.as_str().to_owned())),
        is_favorite: patch.is_favorite,
        updated_at: Utc::now(),
    }
}

#[async_trait]
impl EntryRepository for DieselEntryRepository {
    async fn list(
        &self,
        owner: &UserId,
        filter: &EntryFilter,
        page: &Pagination,
    ) -> Result<EntryPage, EntryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let owner_id = *owner.as_uuid();

        let total: i64 = filtered_query(owner_id, filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        // The boxed query keeps the table's full column selection, which
        // matches `EntryRow`'s field order.
        let rows: Vec<EntryRow> = filtered_query(owner_id, filter)
            .order((
                journal_entries::created_at.desc(),
                journal_entries::id.desc(),
            ))
            .offset(page.skip())
            .limit(page.limit())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let entries = rows
            .into_iter()
            .map(row_to_entry)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(EntryPage {
            entries,
            total,
            skip: page.skip(),
            limit: page.limit(),
        })
    }

    async fn find(
        &self,
        owner: &UserId,
        id: &EntryId,
    ) -> Result<Option<JournalEntry>, EntryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<EntryRow> = journal_entries::table
            .filter(
                journal_entries::id
                    .eq(id.as_uuid())
                    .and(journal_entries::user_id.eq(owner.as_uuid())),
            )
            .select(EntryRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_entry).transpose()
    }

    async fn insert(
        &self,
        owner: &UserId,
        draft: EntryDraft,
    ) -> Result<JournalEntry, EntryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewEntryRow {
            id: *EntryId::random().as_uuid(),
            user_id: *owner.as_uuid(),
            title: draft.title.as_str(),
            content: draft.content.as_str(),
            category: draft.category.as_str(),
            phonetic: draft.phonetic.as_ref().map(Phonetic::as_str),
            example: draft.example.as_ref().map(Example::as_str),
            is_favorite: draft.is_favorite,
        };

        let row: EntryRow = diesel::insert_into(journal_entries::table)
            .values(&new_row)
            .returning(EntryRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        row_to_entry(row)
    }

    async fn update(
        &self,
        owner: &UserId,
        id: &EntryId,
        patch: EntryPatch,
    ) -> Result<Option<JournalEntry>, EntryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<EntryRow> = diesel::update(journal_entries::table)
            .filter(
                journal_entries::id
                    .eq(id.as_uuid())
                    .and(journal_entries::user_id.eq(owner.as_uuid())),
            )
            .set(changeset_from_patch(patch))
            .returning(EntryRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_entry).transpose()
    }

    async fn delete(&self, owner: &UserId, id: &EntryId) -> Result<bool, EntryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let deleted = diesel::delete(
            journal_entries::table.filter(
                journal_entries::id
                    .eq(id.as_uuid())
                    .and(journal_entries::user_id.eq(owner.as_uuid())),
            ),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

        Ok(deleted > 0)
    }

    async fn toggle_favorite(
        &self,
        owner: &UserId,
        id: &EntryId,
    ) -> Result<Option<JournalEntry>, EntryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Single conditional UPDATE: the negation happens inside the
        // statement, so interleaved toggles each flip exactly once.
        let row: Option<EntryRow> = diesel::update(journal_entries::table)
            .filter(
                journal_entries::id
                    .eq(id.as_uuid())
                    .and(journal_entries::user_id.eq(owner.as_uuid())),
            )
            .set((
                journal_entries::is_favorite.eq(diesel::dsl::not(journal_entries::is_favorite)),
                journal_entries::updated_at.eq(Utc::now()),
            ))
            .returning(EntryRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(row_to_entry).transpose()
    }
}
