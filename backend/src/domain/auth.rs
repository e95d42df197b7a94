//! Authentication request value objects.
//!
//! Login does not validate the email shape: an address that matches no
//! account must fail with the same credentials error as a wrong password,
//! and shape validation would create an observable difference between the
//! two cases.

use std::fmt;

use super::user::{Email, Username, UserValidationError};

/// Validation errors raised when constructing [`LoginCredentials`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// The email form field was empty.
    EmptyEmail,
    /// The password form field was empty.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Credentials presented at login.
#[derive(Debug, Clone)]
pub struct LoginCredentials {
    email: String,
    password: String,
}

impl LoginCredentials {
    /// Validate and construct credentials from raw form fields.
    pub fn try_from_parts(
        email: &str,
        password: &str,
    ) -> Result<Self, LoginValidationError> {
        if email.trim().is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            email: email.to_owned(),
            password: password.to_owned(),
        })
    }

    /// The email presented at login, unvalidated beyond non-emptiness.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// The cleartext password presented at login.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validation errors raised when constructing a [`Registration`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// The email failed shape or length validation.
    Email(UserValidationError),
    /// The username failed length validation.
    Username(UserValidationError),
    /// The password was shorter than the minimum.
    PasswordTooShort {
        /// Minimum accepted length.
        min: usize,
    },
}

impl fmt::Display for RegistrationValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email(err) | Self::Username(err) => write!(f, "{err}"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for RegistrationValidationError {}

/// Minimum accepted password length.
pub const PASSWORD_MIN: usize = 8;

/// A validated registration request.
#[derive(Debug, Clone)]
pub struct Registration {
    email: Email,
    username: Username,
    password: String,
}

impl Registration {
    /// Validate and construct a registration from raw request fields.
    pub fn try_from_parts(
        email: &str,
        username: &str,
        password: &str,
    ) -> Result<Self, RegistrationValidationError> {
        let email = Email::new(email).map_err(RegistrationValidationError::Email)?;
        let username = Username::new(username).map_err(RegistrationValidationError::Username)?;
        if password.chars().count() < PASSWORD_MIN {
            return Err(RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        Ok(Self {
            email,
            username,
            password: password.to_owned(),
        })
    }

    /// Validated email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Validated username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Cleartext password, to be hashed before it reaches any store.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Split the registration into its parts.
    pub fn into_parts(self) -> (Email, Username, String) {
        (self.email, self.username, self.password)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "password", LoginValidationError::EmptyEmail)]
    #[case("   ", "password", LoginValidationError::EmptyEmail)]
    #[case("ada@example.com", "", LoginValidationError::EmptyPassword)]
    fn login_rejects_empty_fields(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        assert_eq!(
            LoginCredentials::try_from_parts(email, password).expect_err("invalid"),
            expected
        );
    }

    #[rstest]
    fn login_accepts_unvalidated_email_shapes() {
        // An address that matches no account must fail at lookup, not here.
        let creds = LoginCredentials::try_from_parts("not-an-email", "secret").expect("accepted");
        assert_eq!(creds.email(), "not-an-email");
    }

    #[rstest]
    fn registration_rejects_short_passwords() {
        let err = Registration::try_from_parts("ada@example.com", "ada", "1234567")
            .expect_err("short password");
        assert_eq!(
            err,
            RegistrationValidationError::PasswordTooShort { min: PASSWORD_MIN }
        );
    }

    #[rstest]
    fn registration_rejects_malformed_email() {
        let err = Registration::try_from_parts("nope", "ada", "long-enough-password")
            .expect_err("bad email");
        assert!(matches!(err, RegistrationValidationError::Email(_)));
    }

    #[rstest]
    fn registration_accepts_valid_parts() {
        let registration =
            Registration::try_from_parts("ada@example.com", "ada_lovelace", "s3cret-pass")
                .expect("valid");
        assert_eq!(registration.email().as_str(), "ada@example.com");
        assert_eq!(registration.username().as_str(), "ada_lovelace");
        assert_eq!(registration.password(), "s3cret-pass");
    }
}
