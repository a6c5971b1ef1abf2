use crate::domain::entities::{AuthResult, FormError};
use crate::domain::errors::{AuthError, SubmitError};
use crate::interface_adapters::protocol::{
    CancelResponse, CloseFormResponse, CreateFormResponse, CredentialsRequest, ErrorResponse,
    FormStateResponse, LoginOutcome, LoginResponse, MessageResponse, PasswordResetRequest,
    ValidateResponse,
};
use crate::interface_adapters::state::{AppState, FormFlow};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tracing::{info, warn};

type ApiError = (StatusCode, Json<ErrorResponse>);

// Handler for opening a new login form.
pub async fn create_form(State(state): State<AppState>) -> (StatusCode, Json<CreateFormResponse>) {
    let form_id = state.open_form().await;
    info!(%form_id, "form opened");

    (StatusCode::CREATED, Json(CreateFormResponse { form_id }))
}

// Handler for reading the render state of a form.
pub async fn form_state(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> Result<Json<FormStateResponse>, ApiError> {
    let flow = find_form(&state, &form_id).await?;

    Ok(Json(FormStateResponse::new(
        flow.controller().state(),
        flow.screen(),
    )))
}

// Handler for checking the form fields without submitting them.
pub async fn validate(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<ValidateResponse>, ApiError> {
    let flow = find_form(&state, &form_id).await?;

    flow.controller()
        .validate(&payload.into())
        .map_err(|err| form_error_response(StatusCode::BAD_REQUEST, err.into()))?;

    Ok(Json(ValidateResponse { valid: true }))
}

// Handler for a full login attempt; waits out the simulated round trip.
pub async fn login(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Json(payload): Json<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let flow = find_form(&state, &form_id).await?;

    let result = flow
        .attempt(payload.into())
        .await
        .map_err(|err| map_submit_error(err, &form_id))?;

    let (outcome, message) = match result {
        AuthResult::Success(message) => (LoginOutcome::Success, message),
        AuthResult::Failure(message) => (LoginOutcome::Failure, message),
    };
    Ok(Json(LoginResponse { outcome, message }))
}

// Handler for abandoning a pending login attempt.
pub async fn cancel(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> Result<Json<CancelResponse>, ApiError> {
    let flow = find_form(&state, &form_id).await?;
    let cancelled = flow.controller().cancel();

    Ok(Json(CancelResponse { cancelled }))
}

// Handler for the forgot-password stub.
pub async fn password_reset(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let flow = find_form(&state, &form_id).await?;

    let message = flow
        .controller()
        .request_password_reset(&payload.email)
        .await
        .map_err(map_gateway_error)?;

    Ok(Json(MessageResponse { message }))
}

// Handler for the sign-up stub.
pub async fn sign_up(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let flow = find_form(&state, &form_id).await?;

    let message = flow
        .controller()
        .request_sign_up()
        .await
        .map_err(map_gateway_error)?;

    Ok(Json(MessageResponse { message }))
}

// Handler for returning a signed-in form to the login screen.
pub async fn sign_out(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> Result<Json<FormStateResponse>, ApiError> {
    let flow = find_form(&state, &form_id).await?;
    flow.sign_out();

    Ok(Json(FormStateResponse::new(
        flow.controller().state(),
        flow.screen(),
    )))
}

// Handler for tearing a form down.
pub async fn close_form(
    State(state): State<AppState>,
    Path(form_id): Path<String>,
) -> Json<CloseFormResponse> {
    let removed = state.close_form(&form_id).await;
    if removed {
        info!(%form_id, "form closed");
    }

    Json(CloseFormResponse { removed })
}

async fn find_form(state: &AppState, form_id: &str) -> Result<Arc<FormFlow>, ApiError> {
    state
        .form(form_id)
        .await
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "form not found"))
}

// Helper to build a JSON error response.
fn error_response(status: StatusCode, message: &str) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            message: message.to_string(),
            code: None,
        }),
    )
}

fn form_error_response(status: StatusCode, error: FormError) -> ApiError {
    (status, Json(ErrorResponse::from(error)))
}

fn map_submit_error(err: SubmitError, form_id: &str) -> ApiError {
    match err {
        SubmitError::Invalid(err) => form_error_response(StatusCode::BAD_REQUEST, err.into()),
        SubmitError::AlreadySubmitting => {
            error_response(StatusCode::CONFLICT, "login already in progress")
        }
        SubmitError::Cancelled => {
            warn!(%form_id, "login attempt cancelled before resolving");
            error_response(StatusCode::CONFLICT, "login attempt cancelled")
        }
    }
}

fn map_gateway_error(err: AuthError) -> ApiError {
    match err {
        AuthError::ServiceUnavailable => {
            form_error_response(StatusCode::BAD_GATEWAY, err.into())
        }
        AuthError::InvalidCredentials => {
            form_error_response(StatusCode::UNAUTHORIZED, err.into())
        }
    }
}
