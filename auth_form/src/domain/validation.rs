use regex::Regex;
use std::sync::LazyLock;

use crate::domain::entities::Credentials;
use crate::domain::errors::ValidationError;

// Whole-string match: local part, '@', domain, '.', 2-64 letter suffix.
static EMAIL_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,64}$").ok());

/// Checks the form fields in order; the first failing rule wins.
///
/// Fields are not trimmed: only a zero-length value counts as empty.
pub fn validate_credentials(credentials: &Credentials) -> Result<(), ValidationError> {
    if credentials.email.is_empty() {
        return Err(ValidationError::EmptyEmail);
    }
    if credentials.password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    if !is_valid_email(&credentials.email) {
        return Err(ValidationError::InvalidEmailFormat);
    }

    Ok(())
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(email))
}
