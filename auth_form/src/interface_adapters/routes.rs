use crate::interface_adapters::handlers::{
    cancel, close_form, create_form, form_state, login, password_reset, sign_out, sign_up,
    validate,
};
use crate::interface_adapters::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/forms", post(create_form))
        .route("/forms/{form_id}", get(form_state).delete(close_form))
        .route("/forms/{form_id}/validate", post(validate))
        .route("/forms/{form_id}/login", post(login))
        .route("/forms/{form_id}/cancel", post(cancel))
        .route("/forms/{form_id}/password-reset", post(password_reset))
        .route("/forms/{form_id}/sign-up", post(sign_up))
        .route("/forms/{form_id}/sign-out", post(sign_out))
        .with_state(state)
}
