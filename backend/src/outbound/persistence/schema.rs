//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique login email.
        #[max_length = 255]
        email -> Varchar,
        /// Unique username.
        #[max_length = 100]
        username -> Varchar,
        /// One-way hashed password credential (PHC string).
        #[max_length = 255]
        hashed_password -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Journal entries, each owned by exactly one user.
    journal_entries (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Owning user; rows cascade on account deletion.
        user_id -> Uuid,
        /// Entry title.
        #[max_length = 255]
        title -> Varchar,
        /// Entry body.
        content -> Text,
        /// Category name, constrained to the fixed set by a CHECK clause.
        category -> Text,
        /// Optional phonetic rendering.
        #[max_length = 255]
        phonetic -> Nullable<Varchar>,
        /// Optional usage example.
        example -> Nullable<Text>,
        /// Favorite flag.
        is_favorite -> Bool,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp, refreshed on every mutation.
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(journal_entries -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(journal_entries, users);
