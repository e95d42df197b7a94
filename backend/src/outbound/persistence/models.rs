//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{journal_entries, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub hashed_password: String,
    pub created_at: DateTime<Utc>,
    #[expect(dead_code, reason = "schema field for future audit trail support")]
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new user records.
///
/// Timestamps are filled by the database defaults so both land on the same
/// instant.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub username: &'a str,
    pub hashed_password: &'a str,
}

// ---------------------------------------------------------------------------
// Journal entry models
// ---------------------------------------------------------------------------

/// Row struct for reading from the journal_entries table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = journal_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct EntryRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub category: String,
    pub phonetic: Option<String>,
    pub example: Option<String>,
    pub is_favorite: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for creating new journal entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = journal_entries)]
pub(crate) struct NewEntryRow<'a> {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: &'a str,
    pub content: &'a str,
    pub category: &'a str,
    pub phonetic: Option<&'a str>,
    pub example: Option<&'a str>,
    pub is_favorite: bool,
}

/// Changeset struct for partial entry updates.
///
/// `None` skips a column entirely; for the nullable columns the nested
/// option lets `Some(None)` write SQL NULL. `updated_at` is unconditional so
/// every successful update refreshes it.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = journal_entries)]
pub(crate) struct EntryChangeset {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<&'static str>,
    pub phonetic: Option<Option<String>>,
    pub example: Option<Option<String>>,
    pub is_favorite: Option<bool>,
    pub updated_at: DateTime<Utc>,
}
