use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::domain::errors::{AuthError, ValidationError};

pub const LOGIN_SUCCESS_MESSAGE: &str = "Login successful! Redirecting...";

// Email/password pair held only while an attempt is in flight.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

// Keep passwords out of logs and panic messages.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Outcome of a resolved authentication step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthResult {
    Success(String),
    Failure(String),
}

impl AuthResult {
    pub fn success() -> Self {
        Self::Success(LOGIN_SUCCESS_MESSAGE.to_string())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Success(message) | Self::Failure(message) => message,
        }
    }
}

impl From<Result<(), AuthError>> for AuthResult {
    fn from(outcome: Result<(), AuthError>) -> Self {
        match outcome {
            Ok(()) => Self::success(),
            Err(err) => Self::Failure(err.to_string()),
        }
    }
}

// Any error the form can display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl FormError {
    /// Stable snake_case code for wire payloads.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(ValidationError::EmptyEmail) => "empty_email",
            Self::Validation(ValidationError::EmptyPassword) => "empty_password",
            Self::Validation(ValidationError::InvalidEmailFormat) => "invalid_email_format",
            Self::Auth(AuthError::InvalidCredentials) => "invalid_credentials",
            Self::Auth(AuthError::ServiceUnavailable) => "service_unavailable",
        }
    }
}

/// Render state owned by the controller for a single attempt.
///
/// At most one of `last_error` and `last_success` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub is_submitting: bool,
    pub last_error: Option<FormError>,
    pub last_success: Option<String>,
}

impl FormState {
    pub fn submitting() -> Self {
        Self {
            is_submitting: true,
            ..Self::default()
        }
    }

    pub fn failed(error: impl Into<FormError>) -> Self {
        Self {
            last_error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn succeeded(message: impl Into<String>) -> Self {
        Self {
            last_success: Some(message.into()),
            ..Self::default()
        }
    }
}

// Which screen the presentation layer should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    #[default]
    Login,
    Welcome,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn when_credentials_are_debug_printed_then_password_is_redacted() {
        let credentials = Credentials::new("demo@timecraft.com", "demo123");

        let rendered = format!("{credentials:?}");

        assert!(rendered.contains("demo@timecraft.com"));
        assert!(!rendered.contains("demo123"));
    }

    #[test]
    fn when_auth_error_becomes_result_then_failure_carries_user_message() {
        let result = AuthResult::from(Err::<(), _>(AuthError::InvalidCredentials));

        assert_eq!(
            result,
            AuthResult::Failure("Invalid email or password".to_string())
        );
        assert!(!result.is_success());
    }

    #[test]
    fn when_gateway_accepts_then_result_is_fixed_success_message() {
        let result = AuthResult::from(Ok::<(), AuthError>(()));

        assert_eq!(result.message(), "Login successful! Redirecting...");
        assert!(result.is_success());
    }

    #[test]
    fn when_form_error_wraps_validation_then_code_and_message_follow_variant() {
        let error = FormError::from(ValidationError::InvalidEmailFormat);

        assert_eq!(error.code(), "invalid_email_format");
        assert_eq!(error.to_string(), "Please enter a valid email address");
    }
}
