// Login flow: runs an attempt end to end and swaps to the welcome screen.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::entities::{AuthResult, Credentials, Screen};
use crate::domain::errors::SubmitError;
use crate::domain::ports::AuthGateway;
use crate::use_cases::controller::AuthFormController;

/// Drives one login screen: validation, submission and the delayed
/// redirect to the welcome screen after a successful login.
pub struct LoginFlow<G> {
    controller: Arc<AuthFormController<G>>,
    screen_tx: Arc<watch::Sender<Screen>>,
    redirect_delay: Duration,
    /// Token of the redirect still waiting to fire, if any.
    redirect: Mutex<Option<CancellationToken>>,
}

impl<G> LoginFlow<G>
where
    G: AuthGateway + 'static,
{
    pub fn new(controller: AuthFormController<G>, redirect_delay: Duration) -> Self {
        let (screen_tx, _screen_rx) = watch::channel(Screen::Login);
        Self {
            controller: Arc::new(controller),
            screen_tx: Arc::new(screen_tx),
            redirect_delay,
            redirect: Mutex::new(None),
        }
    }

    pub fn controller(&self) -> &AuthFormController<G> {
        &self.controller
    }

    pub fn screen(&self) -> Screen {
        *self.screen_tx.borrow()
    }

    pub fn subscribe_screen(&self) -> watch::Receiver<Screen> {
        self.screen_tx.subscribe()
    }

    /// Validates, submits and, on success, schedules the redirect.
    ///
    /// Returns as soon as the authentication step resolves; the screen
    /// switches `redirect_delay` later unless the flow is signed out or
    /// shut down first.
    pub async fn attempt(&self, credentials: Credentials) -> Result<AuthResult, SubmitError> {
        self.controller.validate(&credentials)?;
        let result = self.controller.submit(credentials).await?;
        if result.is_success() {
            self.schedule_redirect();
        }
        Ok(result)
    }

    /// Returns to the login screen with a clean form, dropping any pending redirect.
    pub fn sign_out(&self) {
        if let Some(pending) = self.lock_redirect().take() {
            pending.cancel();
            debug!("pending redirect cancelled by sign out");
        }
        self.controller.reset();
        self.screen_tx.send_replace(Screen::Login);
        info!("signed out");
    }

    /// Tears down the controller and any pending redirect.
    pub fn shutdown(&self) {
        self.controller.shutdown();
    }

    // At most one redirect is pending; a newer one replaces the older.
    fn schedule_redirect(&self) {
        let token = self.controller.child_token();
        if let Some(previous) = self.lock_redirect().replace(token.clone()) {
            previous.cancel();
        }

        let screen_tx = Arc::clone(&self.screen_tx);
        let delay = self.redirect_delay;

        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    debug!("redirect cancelled before firing");
                }
                _ = tokio::time::sleep(delay) => {
                    // Re-checked under the channel lock so a racing sign out wins.
                    let fired = screen_tx.send_if_modified(|screen| {
                        if token.is_cancelled() {
                            return false;
                        }
                        *screen = Screen::Welcome;
                        true
                    });
                    if fired {
                        info!("redirected to welcome screen");
                    }
                }
            }
        });
    }

    fn lock_redirect(&self) -> std::sync::MutexGuard<'_, Option<CancellationToken>> {
        self.redirect.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::FormState;
    use crate::domain::errors::ValidationError;
    use crate::use_cases::test_support::RecordingGateway;

    const LATENCY: Duration = Duration::from_millis(2000);
    const REDIRECT: Duration = Duration::from_millis(1500);

    fn flow() -> LoginFlow<RecordingGateway> {
        LoginFlow::new(
            AuthFormController::new(RecordingGateway::new(LATENCY)),
            REDIRECT,
        )
    }

    // Resolves well inside the redirect delay so two logins overlap one redirect window.
    fn fast_flow() -> LoginFlow<RecordingGateway> {
        LoginFlow::new(
            AuthFormController::new(RecordingGateway::new(Duration::from_millis(100))),
            REDIRECT,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn when_login_succeeds_then_screen_switches_after_redirect_delay() {
        let flow = flow();

        let result = flow
            .attempt(Credentials::new("demo@timecraft.com", "demo123"))
            .await
            .expect("expected attempt to resolve");

        assert!(result.is_success());
        assert_eq!(flow.screen(), Screen::Login);

        tokio::time::sleep(REDIRECT - Duration::from_millis(1)).await;
        assert_eq!(flow.screen(), Screen::Login);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(flow.screen(), Screen::Welcome);
    }

    #[tokio::test(start_paused = true)]
    async fn when_login_fails_then_screen_stays_on_login() {
        let flow = flow();

        let result = flow
            .attempt(Credentials::new("demo@timecraft.com", "wrong"))
            .await
            .expect("expected attempt to resolve");

        assert!(!result.is_success());
        tokio::time::sleep(REDIRECT * 2).await;
        assert_eq!(flow.screen(), Screen::Login);
    }

    #[tokio::test]
    async fn when_credentials_are_invalid_then_attempt_stops_at_validation() {
        let flow = flow();

        let result = flow.attempt(Credentials::new("", "x")).await;

        assert_eq!(result, Err(SubmitError::Invalid(ValidationError::EmptyEmail)));
        assert_eq!(
            flow.controller().state(),
            FormState::failed(ValidationError::EmptyEmail)
        );
    }

    #[tokio::test(start_paused = true)]
    async fn when_flow_is_shut_down_before_redirect_then_screen_never_changes() {
        let flow = flow();
        flow.attempt(Credentials::new("demo@timecraft.com", "demo123"))
            .await
            .expect("expected attempt to resolve");

        flow.shutdown();
        tokio::time::sleep(REDIRECT * 2).await;

        assert_eq!(flow.screen(), Screen::Login);
    }

    #[tokio::test(start_paused = true)]
    async fn when_signed_out_then_form_and_screen_return_to_login() {
        let flow = flow();
        let mut screen_rx = flow.subscribe_screen();
        flow.attempt(Credentials::new("demo@timecraft.com", "demo123"))
            .await
            .expect("expected attempt to resolve");
        screen_rx
            .wait_for(|screen| *screen == Screen::Welcome)
            .await
            .expect("expected redirect");

        flow.sign_out();

        assert_eq!(flow.screen(), Screen::Login);
        assert_eq!(flow.controller().state(), FormState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn when_signed_out_before_redirect_fires_then_screen_stays_on_login() {
        let flow = flow();
        flow.attempt(Credentials::new("demo@timecraft.com", "demo123"))
            .await
            .expect("expected attempt to resolve");

        tokio::time::sleep(Duration::from_millis(500)).await;
        flow.sign_out();
        tokio::time::sleep(Duration::from_millis(2000)).await;

        assert_eq!(flow.screen(), Screen::Login);
        assert_eq!(flow.controller().state(), FormState::default());
    }

    #[tokio::test(start_paused = true)]
    async fn when_logging_in_again_then_only_the_latest_redirect_fires() {
        let flow = fast_flow();
        let screen_rx = flow.subscribe_screen();
        flow.attempt(Credentials::new("demo@timecraft.com", "demo123"))
            .await
            .expect("expected first attempt to resolve");

        tokio::time::sleep(Duration::from_millis(500)).await;
        flow.attempt(Credentials::new("demo@timecraft.com", "demo123"))
            .await
            .expect("expected second attempt to resolve");

        // The first redirect would have fired inside this window.
        tokio::time::sleep(REDIRECT - Duration::from_millis(1)).await;
        assert_eq!(flow.screen(), Screen::Login);
        assert!(!screen_rx.has_changed().expect("expected screen channel open"));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(flow.screen(), Screen::Welcome);
    }

    #[tokio::test(start_paused = true)]
    async fn when_signed_out_then_a_replaced_redirect_does_not_fire_later() {
        let flow = fast_flow();
        flow.attempt(Credentials::new("demo@timecraft.com", "demo123"))
            .await
            .expect("expected first attempt to resolve");
        flow.attempt(Credentials::new("demo@timecraft.com", "demo123"))
            .await
            .expect("expected second attempt to resolve");

        flow.sign_out();
        tokio::time::sleep(REDIRECT * 2).await;

        assert_eq!(flow.screen(), Screen::Login);
    }
}
