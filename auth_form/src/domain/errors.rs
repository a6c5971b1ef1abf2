use thiserror::Error;

// Client-side field validation failures, reported before any async work.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter your email")]
    EmptyEmail,
    #[error("Please enter your password")]
    EmptyPassword,
    #[error("Please enter a valid email address")]
    InvalidEmailFormat,
}

// Failures reported by the authentication step once it resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Authentication service unavailable")]
    ServiceUnavailable,
}

/// Reasons a submission never produced an `AuthResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitError {
    /// Credentials failed validation, so nothing was started.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// Another submission is still in flight on this controller.
    #[error("a login attempt is already in progress")]
    AlreadySubmitting,
    /// The attempt was abandoned or the controller was torn down.
    #[error("login attempt cancelled")]
    Cancelled,
}
