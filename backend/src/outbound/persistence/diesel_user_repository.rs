//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Uniqueness of email and username is enforced by the database; unique
//! violations are mapped back to the per-field duplicate errors by
//! constraint name, keeping registration free of read-then-insert races.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{
    CredentialRecord, NewUserRecord, UserRepository, UserRepositoryError,
};
use crate::domain::user::{Email, User, UserId, Username};

use super::diesel_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Unique constraint guarding the email column.
const EMAIL_CONSTRAINT: &str = "users_email_key";
/// Unique constraint guarding the username column.
const USERNAME_CONSTRAINT: &str = "users_username_key";

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Map pool errors to domain repository errors.
fn map_pool_error(error: PoolError) -> UserRepositoryError {
    map_basic_pool_error(error, UserRepositoryError::connection)
}

/// Map Diesel errors to domain repository errors.
fn map_diesel_error(error: diesel::result::Error) -> UserRepositoryError {
    map_basic_diesel_error(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
    )
}

/// Map insert errors, resolving unique violations to per-field duplicates.
fn map_insert_error(error: diesel::result::Error) -> UserRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    if let DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) = &error {
        return match info.constraint_name() {
            Some(EMAIL_CONSTRAINT) => UserRepositoryError::DuplicateEmail,
            Some(USERNAME_CONSTRAINT) => UserRepositoryError::DuplicateUsername,
            other => {
                tracing::warn!(constraint = ?other, "unique violation on unexpected constraint");
                UserRepositoryError::query("unique constraint violation")
            }
        };
    }

    map_diesel_error(error)
}

/// Convert a database row into a validated domain user.
fn row_to_user(row: &UserRow) -> Result<User, UserRepositoryError> {
    let email = Email::new(row.email.clone())
        .map_err(|err| UserRepositoryError::query(err.to_string()))?;
    let username = Username::new(row.username.clone())
        .map_err(|err| UserRepositoryError::query(err.to_string()))?;

    Ok(User::new(
        UserId::from_uuid(row.id),
        email,
        username,
        row.created_at,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, record: &NewUserRecord) -> Result<User, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let new_row = NewUserRow {
            id: Uuid::new_v4(),
            email: record.email.as_str(),
            username: record.username.as_str(),
            hashed_password: record.hashed_password.as_str(),
        };

        let row: UserRow = diesel::insert_into(users::table)
            .values(&new_row)
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_insert_error)?;

        row_to_user(&row)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.as_ref().map(row_to_user).transpose()
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<CredentialRecord>, UserRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<UserRow> = users::table
            .filter(users::email.eq(email))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(|row| {
            let user = row_to_user(&row)?;
            Ok(CredentialRecord {
                user,
                hashed_password: row.hashed_password,
            })
        })
        .transpose()
    }
}
