//! Start app use case
//!
//! Runs once per page load: initialises authentication, then resolves the
//! view for the (possibly normalised) current path.

use std::sync::Arc;

use keyhole_domain::{AppUser, AuthError, RouteTable, View};
use tracing::warn;

use crate::auth::AuthClient;
use crate::ports::Navigator;

/// What the shell should display after startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOutput {
    /// Whether a non-expired session exists.
    pub authenticated: bool,
    /// View for the current path.
    pub view: View,
    /// Signed-in user, if any.
    pub user: Option<AppUser>,
    /// Callback failure that was turned into [`View::SignInFailed`].
    pub error: Option<AuthError>,
}

/// Bootstraps the shell.
pub struct StartApp {
    auth: Arc<dyn AuthClient>,
    navigator: Arc<dyn Navigator>,
    routes: RouteTable,
}

impl StartApp {
    /// Creates the use case with the standard route table.
    #[must_use]
    pub fn new(auth: Arc<dyn AuthClient>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            auth,
            navigator,
            routes: RouteTable::standard(),
        }
    }

    /// Executes the use case.
    ///
    /// A failed sign-in callback does not abort startup. The URL is reset to
    /// the root so the consumed callback is not replayed on reload, and
    /// [`View::SignInFailed`] is shown.
    pub async fn execute(&self) -> StartOutput {
        match self.auth.init().await {
            Ok(authenticated) => {
                let view = self.routes.view_for(&self.navigator.current_path());
                let user = self.auth.get_user().await;
                StartOutput {
                    authenticated,
                    view,
                    user,
                    error: None,
                }
            }
            Err(e) => {
                warn!(error = %e, "authentication init failed");
                let home = self.routes.path_of(View::Home).unwrap_or("/");
                self.navigator.replace_state(home);
                StartOutput {
                    authenticated: false,
                    view: View::SignInFailed,
                    user: None,
                    error: Some(e),
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::auth::OidcAuth;
    use crate::ports::ProviderError;
    use crate::testing::{FixedClock, MockProvider, RecordingNavigator, epoch, session};
    use pretty_assertions::assert_eq;

    fn start(provider: &Arc<MockProvider>, navigator: &Arc<RecordingNavigator>) -> StartApp {
        let auth = OidcAuth::new(
            provider.clone(),
            navigator.clone(),
            Arc::new(FixedClock(epoch())),
        );
        StartApp::new(Arc::new(auth), navigator.clone())
    }

    #[tokio::test]
    async fn test_start_on_dashboard_with_session() {
        let provider = Arc::new(MockProvider::with_session(session("tok", 300)));
        let navigator = Arc::new(RecordingNavigator::at("http://localhost:5173/dashboard"));

        let output = start(&provider, &navigator).execute().await;
        assert!(output.authenticated);
        assert_eq!(output.view, View::Dashboard);
        assert_eq!(
            output.user.and_then(|u| u.preferred_username).as_deref(),
            Some("alice")
        );
        assert!(output.error.is_none());
    }

    #[tokio::test]
    async fn test_start_anonymous_on_home() {
        let provider = Arc::new(MockProvider::default());
        let navigator = Arc::new(RecordingNavigator::at("http://localhost:5173/"));

        let output = start(&provider, &navigator).execute().await;
        assert!(!output.authenticated);
        assert_eq!(output.view, View::Home);
        assert!(output.user.is_none());
    }

    #[tokio::test]
    async fn test_start_after_callback_lands_on_home() {
        let provider = Arc::new(MockProvider::default());
        *provider.callback_result.lock().unwrap() = Some(Ok(session("tok", 300)));
        let navigator = Arc::new(RecordingNavigator::at(
            "http://localhost:5173/callback?code=abc&state=xyz",
        ));

        let output = start(&provider, &navigator).execute().await;
        assert!(output.authenticated);
        assert_eq!(output.view, View::Home);
    }

    #[tokio::test]
    async fn test_unmapped_path_is_not_found() {
        let provider = Arc::new(MockProvider::default());
        let navigator = Arc::new(RecordingNavigator::at("http://localhost:5173/reports"));

        let output = start(&provider, &navigator).execute().await;
        assert_eq!(output.view, View::NotFound);
    }

    #[tokio::test]
    async fn test_callback_failure_shows_sign_in_failed() {
        let provider = Arc::new(MockProvider::default());
        *provider.callback_result.lock().unwrap() =
            Some(Err(ProviderError::InvalidCallback("expired code".to_string())));
        let navigator = Arc::new(RecordingNavigator::at(
            "http://localhost:5173/callback?code=abc&state=xyz",
        ));

        let output = start(&provider, &navigator).execute().await;
        assert_eq!(output.view, View::SignInFailed);
        assert!(!output.authenticated);
        assert!(matches!(output.error, Some(AuthError::CallbackFailed { .. })));
        assert_eq!(navigator.current_url().path(), "/");
        assert!(navigator.current_url().query().is_none());
    }
}
