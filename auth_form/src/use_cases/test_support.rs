use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use crate::domain::entities::Credentials;
use crate::domain::errors::AuthError;
use crate::domain::ports::AuthGateway;
use crate::interface_adapters::gateway::{
    DEMO_EMAIL, DEMO_PASSWORD, PASSWORD_RESET_MESSAGE, SIGN_UP_MESSAGE,
};

#[derive(Clone, Copy, Default)]
pub(crate) struct FailureFlags {
    pub authenticate: bool,
    pub password_reset: bool,
    pub sign_up: bool,
}

// Gateway fake that accepts the demo pair after a fixed latency and
// counts how often the backend was reached.
#[derive(Clone)]
pub(crate) struct RecordingGateway {
    latency: Duration,
    failures: FailureFlags,
    authenticate_calls: Arc<AtomicUsize>,
}

impl RecordingGateway {
    pub(crate) fn new(latency: Duration) -> Self {
        Self {
            latency,
            failures: FailureFlags::default(),
            authenticate_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn with_failures(mut self, failures: FailureFlags) -> Self {
        self.failures = failures;
        self
    }

    pub(crate) fn authenticate_calls(&self) -> usize {
        self.authenticate_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthGateway for RecordingGateway {
    async fn authenticate(&self, credentials: &Credentials) -> Result<(), AuthError> {
        self.authenticate_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;

        if self.failures.authenticate {
            return Err(AuthError::ServiceUnavailable);
        }
        if credentials.email == DEMO_EMAIL && credentials.password == DEMO_PASSWORD {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    async fn request_password_reset(&self, _email: &str) -> Result<String, AuthError> {
        if self.failures.password_reset {
            return Err(AuthError::ServiceUnavailable);
        }
        Ok(PASSWORD_RESET_MESSAGE.to_string())
    }

    async fn request_sign_up(&self) -> Result<String, AuthError> {
        if self.failures.sign_up {
            return Err(AuthError::ServiceUnavailable);
        }
        Ok(SIGN_UP_MESSAGE.to_string())
    }
}
