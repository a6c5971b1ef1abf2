// Form controller: validation, simulated submission and the render state.

use std::sync::{Mutex, PoisonError};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::entities::{AuthResult, Credentials, FormState, LOGIN_SUCCESS_MESSAGE};
use crate::domain::errors::{AuthError, SubmitError, ValidationError};
use crate::domain::ports::AuthGateway;
use crate::domain::validation::validate_credentials;

/// Owns the form state for one login screen and runs attempts against it.
///
/// The state lives in a watch channel; presentation layers render from
/// [`AuthFormController::subscribe`] and never write it directly.
pub struct AuthFormController<G> {
    gateway: G,
    state_tx: watch::Sender<FormState>,
    /// Cancelled on teardown; every attempt token is a child of it.
    teardown: CancellationToken,
    /// Token of the submission currently in flight, if any.
    pending: Mutex<Option<CancellationToken>>,
}

impl<G> AuthFormController<G>
where
    G: AuthGateway,
{
    pub fn new(gateway: G) -> Self {
        let (state_tx, _state_rx) = watch::channel(FormState::default());
        Self {
            gateway,
            state_tx,
            teardown: CancellationToken::new(),
            pending: Mutex::new(None),
        }
    }

    pub fn state(&self) -> FormState {
        self.state_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<FormState> {
        self.state_tx.subscribe()
    }

    pub fn is_submitting(&self) -> bool {
        self.state_tx.borrow().is_submitting
    }

    pub fn is_shut_down(&self) -> bool {
        self.teardown.is_cancelled()
    }

    /// Starts a new attempt by checking the fields.
    ///
    /// While a submission is in flight the verdict is returned but the
    /// state is left to that submission.
    pub fn validate(&self, credentials: &Credentials) -> Result<(), ValidationError> {
        let verdict = validate_credentials(credentials);
        self.state_tx.send_if_modified(|state| {
            if state.is_submitting {
                return false;
            }
            *state = match verdict {
                Ok(()) => FormState::default(),
                Err(err) => FormState::failed(err),
            };
            true
        });
        if let Err(err) = verdict {
            debug!(error = %err, "credentials rejected by validation");
        }
        verdict
    }

    /// Runs the authentication step and records its outcome.
    ///
    /// Only one submission runs at a time. If the attempt is cancelled, or
    /// the returned future is dropped, the state reverts to what it was
    /// before the call.
    pub async fn submit(&self, credentials: Credentials) -> Result<AuthResult, SubmitError> {
        validate_credentials(&credentials)?;
        let attempt = self.begin_attempt()?;
        info!("login attempt started");

        let outcome = tokio::select! {
            biased;
            _ = attempt.token.cancelled() => None,
            outcome = self.gateway.authenticate(&credentials) => Some(outcome),
        };

        match outcome {
            Some(outcome) => {
                attempt.resolve(outcome);
                let result = AuthResult::from(outcome);
                info!(success = result.is_success(), "login attempt resolved");
                Ok(result)
            }
            None => {
                info!("login attempt cancelled");
                Err(SubmitError::Cancelled)
            }
        }
    }

    /// Abandons the pending submission. Returns false if none was running.
    pub fn cancel(&self) -> bool {
        let pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        match pending.as_ref() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }

    /// Tears the controller down; pending and later submissions are cancelled.
    pub fn shutdown(&self) {
        self.teardown.cancel();
    }

    /// Resolves once [`AuthFormController::shutdown`] has been called.
    pub async fn closed(&self) {
        self.teardown.cancelled().await;
    }

    /// A token that is cancelled when the controller shuts down.
    pub fn child_token(&self) -> CancellationToken {
        self.teardown.child_token()
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<String, AuthError> {
        let outcome = self.gateway.request_password_reset(email).await;
        self.show_outcome(&outcome);
        outcome
    }

    pub async fn request_sign_up(&self) -> Result<String, AuthError> {
        let outcome = self.gateway.request_sign_up().await;
        self.show_outcome(&outcome);
        outcome
    }

    // Clears the state back to an idle form, unless a submission owns it.
    pub fn reset(&self) {
        self.state_tx.send_if_modified(|state| {
            if state.is_submitting {
                return false;
            }
            *state = FormState::default();
            true
        });
    }

    fn show_outcome(&self, outcome: &Result<String, AuthError>) {
        self.state_tx.send_if_modified(|state| {
            if state.is_submitting {
                return false;
            }
            *state = match outcome {
                Ok(message) => FormState::succeeded(message.clone()),
                Err(err) => FormState::failed(*err),
            };
            true
        });
    }

    fn begin_attempt(&self) -> Result<InFlight<'_>, SubmitError> {
        if self.teardown.is_cancelled() {
            return Err(SubmitError::Cancelled);
        }

        // Held across the state flip so `cancel` never sees a submission without its token.
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let mut previous = None;
        self.state_tx.send_if_modified(|state| {
            if state.is_submitting {
                return false;
            }
            previous = Some(std::mem::replace(state, FormState::submitting()));
            true
        });
        let Some(previous) = previous else {
            debug!("login attempt rejected while another is in flight");
            return Err(SubmitError::AlreadySubmitting);
        };

        let token = self.teardown.child_token();
        *pending = Some(token.clone());
        drop(pending);

        Ok(InFlight {
            state_tx: &self.state_tx,
            pending: &self.pending,
            token,
            previous: Some(previous),
        })
    }
}

// Guard for a running submission; restores the prior state unless resolved.
struct InFlight<'a> {
    state_tx: &'a watch::Sender<FormState>,
    pending: &'a Mutex<Option<CancellationToken>>,
    token: CancellationToken,
    previous: Option<FormState>,
}

impl InFlight<'_> {
    fn resolve(mut self, outcome: Result<(), AuthError>) {
        self.previous = None;
        self.clear_pending();
        let next = match outcome {
            Ok(()) => FormState::succeeded(LOGIN_SUCCESS_MESSAGE),
            Err(err) => FormState::failed(err),
        };
        self.state_tx.send_replace(next);
    }

    fn clear_pending(&self) {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            self.clear_pending();
            self.state_tx.send_replace(previous);
        }
    }
}
