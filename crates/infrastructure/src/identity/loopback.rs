//! Loopback identity provider for local development.
//!
//! Stands in for a real identity provider without any network. Redirects go
//! to the authority's authorization and end-session endpoints exactly as
//! configured, and the provider answers them at once: sign-in returns to the
//! redirect URI with a code, sign-out returns to the post-logout URI.
//! Completing the callback issues a copy of a seed session.
//!
//! Pending sign-ins and the session can be kept in a JSON file, which plays
//! the part of the browser's session storage across page loads.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use keyhole_application::ports::{Clock, IdentityProvider, Navigator, ProviderError};
use keyhole_domain::{AuthSettings, Profile, RESPONSE_TYPE_CODE, Session};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, info};
use url::Url;
use uuid::Uuid;

use crate::config::ConfigError;
use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Lifetime of issued sessions unless configured otherwise.
const DEFAULT_LIFETIME_SECS: i64 = 300;

/// Claims carried by the ID token itself. The rest of the profile comes
/// from the userinfo endpoint.
const ID_TOKEN_CLAIMS: [&str; 3] = ["sub", "sid", "preferred_username"];

#[derive(Debug, Default, Serialize, Deserialize)]
struct LoopbackState {
    #[serde(default)]
    session: Option<Session>,
    #[serde(default)]
    pending_state: Option<String>,
}

/// Development [`IdentityProvider`] issuing a fixed seed session.
pub struct LoopbackIdentityProvider {
    settings: AuthSettings,
    seed: Session,
    lifetime_secs: i64,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
    store: Option<PathBuf>,
    state: RwLock<LoopbackState>,
}

impl LoopbackIdentityProvider {
    /// Creates a provider issuing copies of `seed`.
    #[must_use]
    pub fn new(
        settings: AuthSettings,
        seed: Session,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            settings,
            seed,
            lifetime_secs: DEFAULT_LIFETIME_SECS,
            navigator,
            clock,
            store: None,
            state: RwLock::new(LoopbackState::default()),
        }
    }

    /// Sets the lifetime of issued sessions.
    #[must_use]
    pub const fn with_lifetime(mut self, lifetime_secs: i64) -> Self {
        self.lifetime_secs = lifetime_secs;
        self
    }

    /// Keeps pending sign-ins and the session in `path`, restoring whatever
    /// an earlier run left there.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Storage`] if an existing file cannot be read
    /// or does not hold provider state.
    pub async fn with_store(mut self, path: impl Into<PathBuf>) -> Result<Self, ProviderError> {
        let path = path.into();
        match tokio::fs::read(&path).await {
            Ok(bytes) => {
                *self.state.get_mut() = from_json_bytes(&bytes).map_err(|e| storage(&path, e))?;
                debug!(path = %path.display(), "restored loopback state");
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(storage(&path, e)),
        }
        self.store = Some(path);
        Ok(self)
    }

    /// Seed session for a user known only by name and email.
    #[must_use]
    pub fn seed_for(username: &str, email: &str) -> Session {
        let profile = Profile::new()
            .with_claim("sub", Uuid::now_v7().to_string())
            .with_claim("preferred_username", username)
            .with_claim("email", email);
        Session::new(format!("loopback-{}", Uuid::now_v7().simple()), profile)
    }

    async fn save(&self, state: &LoopbackState) -> Result<(), ProviderError> {
        let Some(path) = &self.store else {
            return Ok(());
        };
        let bytes = to_json_stable_bytes(state).map_err(|e| storage(path, e))?;
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage(path, e))?;
        }
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| storage(path, e))
    }

    fn issue(&self) -> Session {
        let mut session = self
            .seed
            .clone()
            .with_lifetime(self.clock.now(), self.lifetime_secs)
            .with_refresh_token(format!("loopback-refresh-{}", Uuid::now_v7().simple()));
        if !self.settings.load_user_info() {
            session.profile = session.profile.restricted_to(&ID_TOKEN_CLAIMS);
        }
        if session.scopes.is_empty() {
            session = session.with_scope(self.settings.scope());
        }
        session
    }

    /// Answers an authorization request the way the provider's login page
    /// would once the user has signed in.
    fn authorize(&self, request: &Url) -> Url {
        let mut callback = query_param(request, "redirect_uri")
            .and_then(|uri| Url::parse(&uri).ok())
            .unwrap_or_else(|| self.settings.redirect_uri().clone());
        {
            let mut pairs = callback.query_pairs_mut();
            if query_param(request, "response_type").as_deref() == Some(RESPONSE_TYPE_CODE) {
                pairs.append_pair("code", &format!("loopback-{}", Uuid::now_v7().simple()));
            } else {
                pairs.append_pair("error", "unsupported_response_type");
            }
            if let Some(state) = query_param(request, "state") {
                pairs.append_pair("state", &state);
            }
        }
        callback
    }

    /// Answers an end-session request.
    fn end_session(&self, request: &Url) -> Url {
        query_param(request, "post_logout_redirect_uri")
            .and_then(|uri| Url::parse(&uri).ok())
            .unwrap_or_else(|| self.settings.post_logout_redirect_uri().clone())
    }
}

fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

fn storage(path: &Path, e: impl std::fmt::Display) -> ProviderError {
    ProviderError::Storage(format!("{}: {e}", path.display()))
}

/// Reads a seed session from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not hold a session.
pub async fn load_seed_session(path: &Path) -> Result<Session, ConfigError> {
    let bytes = tokio::fs::read(path).await.map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(from_json_bytes(&bytes)?)
}

#[async_trait]
impl IdentityProvider for LoopbackIdentityProvider {
    async fn get_current(&self) -> Result<Option<Session>, ProviderError> {
        Ok(self.state.read().await.session.clone())
    }

    async fn signin_redirect(&self) -> Result<(), ProviderError> {
        let state = Uuid::now_v7().simple().to_string();
        let request = self.settings.authorization_url(&state);
        {
            let mut guard = self.state.write().await;
            guard.pending_state = Some(state);
            self.save(&guard).await?;
        }

        info!(
            client_id = self.settings.client_id(),
            endpoint = %self.settings.authorization_endpoint(),
            "sign-in redirect"
        );
        self.navigator.assign(&request);
        self.navigator.assign(&self.authorize(&request));
        Ok(())
    }

    async fn signout_redirect(&self) -> Result<(), ProviderError> {
        {
            let mut state = self.state.write().await;
            *state = LoopbackState::default();
            self.save(&state).await?;
        }

        let request = self.settings.end_session_url();
        info!(endpoint = %self.settings.end_session_endpoint(), "sign-out redirect");
        self.navigator.assign(&request);
        self.navigator.assign(&self.end_session(&request));
        Ok(())
    }

    async fn signin_silent(&self) -> Result<Session, ProviderError> {
        let mut state = self.state.write().await;
        let has_refresh_token = state
            .session
            .as_ref()
            .is_some_and(|session| session.refresh_token.is_some());
        if !has_refresh_token {
            return Err(ProviderError::LoginRequired);
        }
        let session = self.issue();
        state.session = Some(session.clone());
        self.save(&state).await?;
        debug!("loopback silent renewal issued a session");
        Ok(session)
    }

    async fn signin_callback(&self, url: &Url) -> Result<Session, ProviderError> {
        if let Some(error) = query_param(url, "error") {
            let description = query_param(url, "error_description").unwrap_or(error);
            return Err(ProviderError::InvalidCallback(description));
        }

        let mut state = self.state.write().await;
        let expected = state
            .pending_state
            .take()
            .ok_or_else(|| ProviderError::InvalidCallback("no sign-in in progress".to_string()))?;
        self.save(&state).await?;
        let returned = query_param(url, "state")
            .ok_or_else(|| ProviderError::InvalidCallback("missing state".to_string()))?;
        if returned != expected {
            return Err(ProviderError::InvalidCallback("state mismatch".to_string()));
        }
        if query_param(url, "code").is_none() {
            return Err(ProviderError::InvalidCallback("missing code".to_string()));
        }

        let session = self.issue();
        state.session = Some(session.clone());
        self.save(&state).await?;
        Ok(session)
    }
}
