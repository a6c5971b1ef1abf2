use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

use crate::domain::entities::Credentials;
use crate::domain::errors::AuthError;
use crate::domain::ports::AuthGateway;

pub const DEMO_EMAIL: &str = "demo@timecraft.com";
pub const DEMO_PASSWORD: &str = "demo123";
pub const PASSWORD_RESET_MESSAGE: &str = "Password reset link sent to your email";
pub const SIGN_UP_MESSAGE: &str = "Signup functionality would be implemented here";

// Reference round-trip time of the simulated backend.
pub const DEFAULT_LATENCY: Duration = Duration::from_millis(2000);

// Stand-in backend: one hard-coded account behind a fixed delay.
#[derive(Clone, Debug)]
pub struct SimulatedAuthGateway {
    pub latency: Duration,
}

impl SimulatedAuthGateway {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for SimulatedAuthGateway {
    fn default() -> Self {
        Self::new(DEFAULT_LATENCY)
    }
}

#[async_trait]
impl AuthGateway for SimulatedAuthGateway {
    async fn authenticate(&self, credentials: &Credentials) -> Result<(), AuthError> {
        tokio::time::sleep(self.latency).await;

        // Exact, case-sensitive comparison; no normalization.
        if credentials.email == DEMO_EMAIL && credentials.password == DEMO_PASSWORD {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }

    async fn request_password_reset(&self, email: &str) -> Result<String, AuthError> {
        debug!(email_len = email.len(), "password reset requested");
        Ok(PASSWORD_RESET_MESSAGE.to_string())
    }

    async fn request_sign_up(&self) -> Result<String, AuthError> {
        Ok(SIGN_UP_MESSAGE.to_string())
    }
}
