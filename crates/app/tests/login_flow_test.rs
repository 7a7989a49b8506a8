//! End-to-end sign-in flow against the loopback identity provider.
//!
//! The provider outlives each `OidcAuth` instance the same way the identity
//! provider client's session store outlives a page load.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use keyhole_application::ports::Navigator;
use keyhole_application::{AuthClient, OidcAuth, StartApp};
use keyhole_domain::{AuthSettings, View};
use keyhole_infrastructure::{BrowserHistory, LoopbackIdentityProvider, SystemClock};
use pretty_assertions::assert_eq;

const REDIRECT_WAIT: Duration = Duration::from_millis(50);

struct Tab {
    history: Arc<BrowserHistory>,
    provider: Arc<LoopbackIdentityProvider>,
}

fn settings() -> AuthSettings {
    AuthSettings::new(
        "http://localhost:8080/realms/demo-realm",
        "vue-client",
        "http://localhost:5173/callback",
        "http://localhost:5173/",
        "openid profile email",
    )
    .unwrap()
}

fn provider(history: &Arc<BrowserHistory>) -> LoopbackIdentityProvider {
    let seed = LoopbackIdentityProvider::seed_for("alice", "alice@example.com");
    LoopbackIdentityProvider::new(
        settings(),
        seed,
        history.clone(),
        Arc::new(SystemClock::new()),
    )
}

impl Tab {
    fn open(url: &str) -> Self {
        let history = Arc::new(BrowserHistory::open(url).unwrap());
        let provider = Arc::new(provider(&history));
        Self { history, provider }
    }

    /// A tab whose provider keeps its state in `store`, as a separate run of
    /// the binary would.
    async fn open_with_store(url: &str, store: &Path) -> Self {
        let history = Arc::new(BrowserHistory::open(url).unwrap());
        let provider = Arc::new(provider(&history).with_store(store).await.unwrap());
        Self { history, provider }
    }

    /// A fresh client, as created on every page load.
    fn page_load(&self) -> OidcAuth {
        OidcAuth::new(
            self.provider.clone(),
            self.history.clone(),
            Arc::new(SystemClock::new()),
        )
    }
}

#[tokio::test]
async fn test_anonymous_visit() {
    let tab = Tab::open("http://localhost:5173/");
    let auth = tab.page_load();

    assert!(!auth.init().await.unwrap());
    assert!(auth.get_user().await.is_none());
    assert!(auth.get_access_token().await.is_none());
}

#[tokio::test]
async fn test_login_callback_and_logout() {
    let tab = Tab::open("http://localhost:5173/");
    let auth = tab.page_load();
    assert!(!auth.init().await.unwrap());

    // login never hands control back; the tab went through the provider's
    // authorization endpoint and is now on the callback URL
    assert!(tokio::time::timeout(REDIRECT_WAIT, auth.login()).await.is_err());
    let entries = tab.history.entries();
    assert_eq!(entries[1].host_str(), Some("localhost"));
    assert_eq!(entries[1].port(), Some(8080));
    assert!(entries[1].query_pairs().any(|(k, v)| k == "response_type" && v == "code"));
    assert_eq!(tab.history.current_path(), "/callback");
    let history_len = tab.history.len();

    let auth = tab.page_load();
    assert!(auth.init().await.unwrap());
    assert_eq!(tab.history.current_url().as_str(), "http://localhost:5173/");
    assert_eq!(tab.history.len(), history_len);

    let user = auth.get_user().await.unwrap();
    assert_eq!(user.preferred_username.as_deref(), Some("alice"));
    assert_eq!(user.email.as_deref(), Some("alice@example.com"));
    assert!(auth.get_access_token().await.is_some());

    assert!(tokio::time::timeout(REDIRECT_WAIT, auth.logout()).await.is_err());
    assert_eq!(tab.history.current_url().as_str(), "http://localhost:5173/");

    let auth = tab.page_load();
    assert!(!auth.init().await.unwrap());
    assert!(auth.get_user().await.is_none());
    assert!(auth.get_access_token().await.is_none());
}

#[tokio::test]
async fn test_replayed_callback_shows_sign_in_failed() {
    let tab = Tab::open("http://localhost:5173/");
    let auth = tab.page_load();
    assert!(tokio::time::timeout(REDIRECT_WAIT, auth.login()).await.is_err());
    let callback = tab.history.current_url();

    assert!(tab.page_load().init().await.unwrap());

    // reopening the consumed callback URL must not sign in again
    tab.history.assign(&callback);
    let auth: Arc<dyn AuthClient> = Arc::new(tab.page_load());
    let output = StartApp::new(auth, tab.history.clone()).execute().await;

    assert_eq!(output.view, View::SignInFailed);
    assert!(output.error.is_some());
    assert_eq!(tab.history.current_path(), "/");
}

#[tokio::test]
async fn test_callback_completes_in_a_later_run() {
    let dir = tempfile::tempdir().unwrap();
    let store = dir.path().join("session.json");

    let first = Tab::open_with_store("http://localhost:5173/", &store).await;
    assert!(
        tokio::time::timeout(REDIRECT_WAIT, first.page_load().login())
            .await
            .is_err()
    );
    let callback = first.history.current_url();

    let second = Tab::open_with_store(callback.as_str(), &store).await;
    let auth: Arc<dyn AuthClient> = Arc::new(second.page_load());
    let output = StartApp::new(auth, second.history.clone()).execute().await;

    assert_eq!(output.view, View::Home);
    assert!(output.authenticated);
    assert_eq!(
        output.user.and_then(|u| u.preferred_username).as_deref(),
        Some("alice")
    );

    let third = Tab::open_with_store("http://localhost:5173/dashboard", &store).await;
    let auth = third.page_load();
    assert!(auth.init().await.unwrap());
    assert!(auth.get_access_token().await.is_some());
}

#[tokio::test]
async fn test_dashboard_and_unknown_routes() {
    let tab = Tab::open("http://localhost:5173/dashboard");
    let auth: Arc<dyn AuthClient> = Arc::new(tab.page_load());
    let output = StartApp::new(auth, tab.history.clone()).execute().await;
    assert_eq!(output.view, View::Dashboard);
    assert!(!output.authenticated);

    let tab = Tab::open("http://localhost:5173/admin");
    let auth: Arc<dyn AuthClient> = Arc::new(tab.page_load());
    let output = StartApp::new(auth, tab.history.clone()).execute().await;
    assert_eq!(output.view, View::NotFound);
}
