//! Authentication API handlers.
//!
//! ```text
//! POST /api/auth/register {"email":"ada@example.com","username":"ada","password":"..."}
//! POST /api/auth/login    username=ada@example.com&password=... (form encoded)
//! GET  /api/auth/me       Authorization: Bearer <token>
//! ```
//!
//! Login failures are uniform: an unknown email and a wrong password
//! produce byte-identical 401 responses so account existence never leaks.

use actix_web::{get, post, web, HttpResponse};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::auth::{LoginCredentials, LoginValidationError, Registration};
use crate::domain::ports::NewUserRecord;
use crate::domain::{Error, User};
use crate::inbound::http::bearer::BearerAuth;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::map_registration_validation_error;
use crate::inbound::http::ApiResult;

/// Registration request body for `POST /api/auth/register`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    /// Login email, unique per account.
    pub email: String,
    /// Public username, unique per account.
    pub username: String,
    /// Cleartext password, minimum eight characters.
    pub password: String,
}

/// Login form body for `POST /api/auth/login`.
///
/// Follows the OAuth2 password-grant form shape: the `username` field
/// carries the account email.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct LoginForm {
    /// Account email, despite the OAuth2 field name.
    pub username: String,
    /// Cleartext password.
    pub password: String,
}

/// Public view of a user record; the credential never appears here.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserResponse {
    /// Stable account identifier.
    pub id: Uuid,
    /// Login email.
    pub email: String,
    /// Public username.
    pub username: String,
    /// Registration instant.
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            email: user.email().as_str().to_owned(),
            username: user.username().as_str().to_owned(),
            created_at: user.created_at(),
        }
    }
}

/// Bearer token issued at login.
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    /// The signed bearer token.
    pub access_token: String,
    /// Always `"bearer"`.
    #[schema(value_type = String, example = "bearer")]
    pub token_type: &'static str,
}

fn invalid_credentials() -> Error {
    Error::unauthorized("Incorrect email or password.")
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyEmail => Error::invalid_request("email must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_field" })),
        LoginValidationError::EmptyPassword => {
            Error::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password", "code": "empty_field" }))
        }
    }
}

/// Resolve the caller from a presented bearer token.
///
/// A missing header, an expired or forged token, and a token whose subject
/// matches no account all collapse into the same unauthorized error.
pub(crate) async fn authenticate(state: &HttpState, bearer: &BearerAuth) -> Result<User, Error> {
    let token = bearer
        .token()
        .ok_or_else(|| Error::unauthorized("Not authenticated."))?;
    let user_id = state.tokens.verify(token)?;
    state
        .users
        .find_by_id(&user_id)
        .await?
        .ok_or_else(|| Error::unauthorized("Could not validate credentials."))
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Duplicate email or username", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let registration =
        Registration::try_from_parts(&payload.email, &payload.username, &payload.password)
            .map_err(map_registration_validation_error)?;

    let hashed_password = state
        .passwords
        .hash(registration.password())
        .await
        .map_err(Error::from)?;
    let (email, username, _) = registration.into_parts();
    let user = state
        .users
        .insert(&NewUserRecord {
            email,
            username,
            hashed_password,
        })
        .await
        .map_err(Error::from)?;

    Ok(HttpResponse::Created().json(UserResponse::from(user)))
}

/// Authenticate and receive a bearer token.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    responses(
        (status = 200, description = "Login success", body = TokenResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    form: web::Form<LoginForm>,
) -> ApiResult<web::Json<TokenResponse>> {
    let credentials = LoginCredentials::try_from_parts(&form.username, &form.password)
        .map_err(map_login_validation_error)?;

    let record = state
        .users
        .find_credentials(credentials.email())
        .await
        .map_err(Error::from)?
        .ok_or_else(invalid_credentials)?;

    let verified = state
        .passwords
        .verify(credentials.password(), &record.hashed_password)
        .await
        .map_err(Error::from)?;
    if !verified {
        return Err(invalid_credentials().into());
    }

    let access_token = state.tokens.issue(record.user.id()).map_err(Error::from)?;
    Ok(web::Json(TokenResponse {
        access_token,
        token_type: "bearer",
    }))
}

/// Return the authenticated caller's account record.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["auth"],
    operation_id = "me"
)]
#[get("/me")]
pub async fn me(state: web::Data<HttpState>, bearer: BearerAuth) -> ApiResult<web::Json<UserResponse>> {
    let user = authenticate(&state, &bearer).await?;
    Ok(web::Json(UserResponse::from(user)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use serde_json::Value;

    #[rstest]
    fn login_validation_names_the_form_field() {
        let err = map_login_validation_error(LoginValidationError::EmptyEmail);
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(
            err.details()
                .and_then(|d| d.get("field"))
                .and_then(Value::as_str),
            Some("username")
        );
    }

    #[rstest]
    fn unknown_email_and_wrong_password_share_one_error() {
        // Both paths in `login` go through this constructor, so the
        // response body cannot distinguish the cases.
        let err = invalid_credentials();
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "Incorrect email or password.");
    }

    #[rstest]
    fn user_response_omits_the_credential() {
        let value = serde_json::to_value(UserResponse {
            id: Uuid::nil(),
            email: "ada@example.com".into(),
            username: "ada".into(),
            created_at: Utc::now(),
        })
        .expect("serialise");

        assert!(value.get("hashed_password").is_none());
        assert!(value.get("password").is_none());
        assert_eq!(
            value.get("email").and_then(Value::as_str),
            Some("ada@example.com")
        );
    }

    #[rstest]
    fn token_response_uses_the_bearer_type() {
        let value = serde_json::to_value(TokenResponse {
            access_token: "abc".into(),
            token_type: "bearer",
        })
        .expect("serialise");

        assert_eq!(
            value.get("token_type").and_then(Value::as_str),
            Some("bearer")
        );
    }
}
