use async_trait::async_trait;

use crate::domain::entities::Credentials;
use crate::domain::errors::AuthError;

// Port for the authentication backend used by the form controller.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    // Resolves once the backend has judged the credentials.
    async fn authenticate(&self, credentials: &Credentials) -> Result<(), AuthError>;
    async fn request_password_reset(&self, email: &str) -> Result<String, AuthError>;
    async fn request_sign_up(&self) -> Result<String, AuthError>;
}
