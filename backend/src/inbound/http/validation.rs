//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request validation failures become [`Error::invalid_request`] payloads
//! with a `details` object naming the field and a stable failure code, so
//! clients can surface per-field messages without parsing prose.

use serde_json::json;

use crate::domain::auth::RegistrationValidationError;
use crate::domain::entry::{EntryCategory, EntryValidationError, Pagination, PaginationError};
use crate::domain::user::UserValidationError;
use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FailureCode {
    MissingField,
    NullField,
    InvalidValue,
    OutOfRange,
}

impl FailureCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::NullField => "null_field",
            Self::InvalidValue => "invalid_value",
            Self::OutOfRange => "out_of_range",
        }
    }
}

/// Build a field-scoped validation error.
pub(crate) fn field_error(
    field: &'static str,
    message: impl Into<String>,
    code: FailureCode,
) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

/// Reject an explicit `null` supplied for a non-nullable field.
pub(crate) fn null_field_error(field: &'static str) -> Error {
    field_error(
        field,
        format!("{field} must not be null"),
        FailureCode::NullField,
    )
}

/// Reject a request missing a required field.
pub(crate) fn missing_field_error(field: &'static str) -> Error {
    field_error(
        field,
        format!("missing required field: {field}"),
        FailureCode::MissingField,
    )
}

/// Parse a category name, mapping failures to a field-scoped error.
pub(crate) fn parse_category(value: &str) -> Result<EntryCategory, Error> {
    value
        .parse::<EntryCategory>()
        .map_err(|err| field_error("category", err.to_string(), FailureCode::InvalidValue))
}

/// Validate the pagination window, mapping failures to field-scoped errors.
pub(crate) fn parse_pagination(skip: Option<i64>, limit: Option<i64>) -> Result<Pagination, Error> {
    let default = Pagination::default();
    Pagination::new(
        skip.unwrap_or_else(|| default.skip()),
        limit.unwrap_or_else(|| default.limit()),
    )
    .map_err(|err| {
        let field = match err {
            PaginationError::NegativeSkip => "skip",
            PaginationError::LimitOutOfRange { .. } => "limit",
        };
        field_error(field, err.to_string(), FailureCode::OutOfRange)
    })
}

/// Map an entry value-object failure to a field-scoped error.
pub(crate) fn map_entry_validation_error(err: EntryValidationError) -> Error {
    let field = match err {
        EntryValidationError::InvalidId => "id",
        EntryValidationError::EmptyTitle | EntryValidationError::TitleTooLong { .. } => "title",
        EntryValidationError::EmptyContent | EntryValidationError::ContentTooLong { .. } => {
            "content"
        }
        EntryValidationError::UnknownCategory => "category",
        EntryValidationError::PhoneticTooLong { .. } => "phonetic",
        EntryValidationError::ExampleTooLong { .. } => "example",
    };
    field_error(field, err.to_string(), FailureCode::InvalidValue)
}

/// Map a registration value-object failure to a field-scoped error.
pub(crate) fn map_registration_validation_error(err: RegistrationValidationError) -> Error {
    let field = match &err {
        RegistrationValidationError::Email(_) => "email",
        RegistrationValidationError::Username(_) => "username",
        RegistrationValidationError::PasswordTooShort { .. } => "password",
    };
    let code = match &err {
        RegistrationValidationError::Email(UserValidationError::InvalidEmail) => {
            FailureCode::InvalidValue
        }
        _ => FailureCode::OutOfRange,
    };
    field_error(field, err.to_string(), code)
}
