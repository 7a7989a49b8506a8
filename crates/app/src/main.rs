//! Keyhole - Main Entry Point
//!
//! Loads configuration, wires the authentication client to the loopback
//! identity provider, runs startup for the given URL and prints the view
//! that would be rendered.
//!
//! Usage:
//! - `keyhole [URL]` starts the app at `URL` (default: the post-logout URI).
//! - `keyhole login` / `keyhole logout` start the redirect and print the
//!   URLs the browser passes through. Opening the printed callback URL with
//!   `keyhole <URL>` completes the sign-in.
//!
//! `KEYHOLE_CONFIG` points at the configuration file (default
//! `config.json`), `KEYHOLE_SEED` at an optional seed session and
//! `KEYHOLE_STATE` at the provider state file (default
//! `.keyhole/session.json`).

use std::convert::Infallible;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use keyhole_application::{AuthClient, OidcAuth, StartApp, StartOutput};
use keyhole_domain::{AuthError, View};
use keyhole_infrastructure::{
    AppConfig, BrowserHistory, ConfigLoader, DashboardApi, LoopbackIdentityProvider,
    SystemClock, load_seed_session,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

/// How long to wait for a redirect to be issued.
const REDIRECT_WAIT: Duration = Duration::from_millis(100);

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("KEYHOLE_CONFIG").unwrap_or_else(|_| "config.json".to_string());
    let config = ConfigLoader::new().load(Path::new(&config_path)).await?;

    let command = std::env::args().nth(1);
    let start_url = match command.as_deref() {
        None | Some("login" | "logout") => config.auth.post_logout_redirect_uri().clone(),
        Some(arg) => Url::parse(arg)?,
    };
    tracing::info!(
        "Starting Keyhole v{} at {}",
        env!("CARGO_PKG_VERSION"),
        start_url
    );

    let seed = match std::env::var("KEYHOLE_SEED") {
        Ok(path) => load_seed_session(Path::new(&path)).await?,
        Err(_) => LoopbackIdentityProvider::seed_for("alice", "alice@example.com"),
    };

    let history = Arc::new(BrowserHistory::new(start_url));
    let clock = Arc::new(SystemClock::new());
    let state_path =
        std::env::var("KEYHOLE_STATE").unwrap_or_else(|_| ".keyhole/session.json".to_string());
    let provider = LoopbackIdentityProvider::new(
        config.auth.clone(),
        seed,
        history.clone(),
        clock.clone(),
    )
    .with_store(state_path)
    .await?;
    let auth: Arc<dyn AuthClient> =
        Arc::new(OidcAuth::new(Arc::new(provider), history.clone(), clock));

    match command.as_deref() {
        Some("login") => {
            follow_redirect(&history, auth.login()).await?;
            return Ok(());
        }
        Some("logout") => {
            follow_redirect(&history, auth.logout()).await?;
            return Ok(());
        }
        _ => {}
    }

    let output = StartApp::new(auth.clone(), history).execute().await;
    render(&output);

    if output.view == View::Dashboard {
        show_dashboard(&config, auth).await;
    }

    Ok(())
}

/// Runs a divergent redirect and prints where the browser went.
async fn follow_redirect(
    history: &BrowserHistory,
    redirect: impl Future<Output = Result<Infallible, AuthError>>,
) -> Result<(), AuthError> {
    let before = history.len();
    match tokio::time::timeout(REDIRECT_WAIT, redirect).await {
        Ok(Err(e)) => return Err(e),
        Ok(Ok(never)) => match never {},
        Err(_) => {}
    }
    for url in history.entries().iter().skip(before) {
        println!("-> {url}");
    }
    Ok(())
}

fn render(output: &StartOutput) {
    println!("view: {}", output.view.title());
    match output.user.as_ref().and_then(|user| user.display_name()) {
        Some(name) => println!("signed in as {name}"),
        None if output.authenticated => println!("signed in"),
        None => println!("not signed in"),
    }
    if let Some(error) = &output.error {
        println!("error: {error}");
    }
}

async fn show_dashboard(config: &AppConfig, auth: Arc<dyn AuthClient>) {
    let Some(base_url) = config.api_base_url.clone() else {
        tracing::warn!("apiBaseUrl is not configured; dashboard data unavailable");
        return;
    };
    let api = match DashboardApi::new(base_url, auth) {
        Ok(api) => api,
        Err(e) => {
            tracing::warn!(error = %e, "could not create dashboard client");
            return;
        }
    };
    match api.fetch().await {
        Ok(dashboard) => println!(
            "{} ({} widgets)",
            dashboard.message, dashboard.meta.widgets
        ),
        Err(e) => println!("dashboard unavailable: {e}"),
    }
}
