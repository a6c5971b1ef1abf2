use serde::{Deserialize, Serialize};

use crate::domain::entities::{Credentials, FormError, FormState, Screen};

// Request payload carrying the two form fields. Not Debug: holds a raw password.
#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

impl From<CredentialsRequest> for Credentials {
    fn from(request: CredentialsRequest) -> Self {
        Credentials::new(request.email, request.password)
    }
}

// Request payload for a password reset link.
#[derive(Debug, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

// Response payload for a newly opened form.
#[derive(Debug, Serialize)]
pub struct CreateFormResponse {
    pub form_id: String,
}

// Render state for the presentation layer.
#[derive(Debug, Serialize)]
pub struct FormStateResponse {
    pub is_submitting: bool,
    pub last_error: Option<ErrorResponse>,
    pub last_success: Option<String>,
    pub screen: Screen,
}

impl FormStateResponse {
    pub fn new(state: FormState, screen: Screen) -> Self {
        Self {
            is_submitting: state.is_submitting,
            last_error: state.last_error.map(ErrorResponse::from),
            last_success: state.last_success,
            screen,
        }
    }
}

// Response payload for a successful validation.
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub valid: bool,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LoginOutcome {
    Success,
    Failure,
}

// Response payload for a resolved login attempt.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub outcome: LoginOutcome,
    pub message: String,
}

// Response payload for stub actions that only return a message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct CancelResponse {
    pub cancelled: bool,
}

#[derive(Debug, Serialize)]
pub struct CloseFormResponse {
    pub removed: bool,
}

// Error envelope for JSON responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
}

impl From<FormError> for ErrorResponse {
    fn from(error: FormError) -> Self {
        Self {
            message: error.to_string(),
            code: Some(error.code()),
        }
    }
}
