//! [`AuthClient`] implementation backed by an identity provider client.

use std::convert::Infallible;
use std::future;
use std::sync::Arc;

use async_trait::async_trait;
use keyhole_domain::{AppUser, AuthError, Session};
use tracing::{debug, info, warn};

use super::AuthClient;
use crate::ports::{Clock, IdentityProvider, Navigator};

/// Path segment identifying a return from the provider's sign-in redirect.
pub const CALLBACK_SEGMENT: &str = "/callback";

/// Root the URL is reset to once a callback has been consumed.
const APP_ROOT: &str = "/";

/// Adapter from an [`IdentityProvider`] to the [`AuthClient`] contract.
///
/// Holds no session state of its own; every lookup goes to the provider.
pub struct OidcAuth {
    provider: Arc<dyn IdentityProvider>,
    navigator: Arc<dyn Navigator>,
    clock: Arc<dyn Clock>,
}

impl OidcAuth {
    /// Creates the adapter over the given ports.
    #[must_use]
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        navigator: Arc<dyn Navigator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            provider,
            navigator,
            clock,
        }
    }

    /// Reads the provider's session; a store failure counts as no session.
    async fn current_session(&self) -> Option<Session> {
        match self.provider.get_current().await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "could not read current session");
                None
            }
        }
    }

    async fn complete_callback(&self) -> Result<(), AuthError> {
        let url = self.navigator.current_url();
        self.provider
            .signin_callback(&url)
            .await
            .map_err(|e| AuthError::CallbackFailed {
                message: e.to_string(),
            })?;
        info!(path = url.path(), "sign-in callback completed");
        self.navigator.replace_state(APP_ROOT);
        Ok(())
    }
}

/// Parks the caller after a redirect has been started.
async fn navigated_away() -> Result<Infallible, AuthError> {
    Ok(future::pending().await)
}

#[async_trait]
impl AuthClient for OidcAuth {
    async fn init(&self) -> Result<bool, AuthError> {
        if self.navigator.current_path().contains(CALLBACK_SEGMENT) {
            self.complete_callback().await?;
        }

        let now = self.clock.now();
        let authenticated = self
            .current_session()
            .await
            .is_some_and(|session| !session.is_expired(now));
        debug!(authenticated, "auth client initialised");
        Ok(authenticated)
    }

    async fn login(&self) -> Result<Infallible, AuthError> {
        info!("redirecting to provider for sign-in");
        self.provider
            .signin_redirect()
            .await
            .map_err(|e| AuthError::RedirectFailed {
                message: e.to_string(),
            })?;
        navigated_away().await
    }

    async fn logout(&self) -> Result<Infallible, AuthError> {
        info!("redirecting to provider for sign-out");
        self.provider
            .signout_redirect()
            .await
            .map_err(|e| AuthError::RedirectFailed {
                message: e.to_string(),
            })?;
        navigated_away().await
    }

    async fn get_access_token(&self) -> Option<String> {
        let now = self.clock.now();
        if let Some(session) = self.current_session().await
            && !session.is_expired(now)
        {
            debug!(
                expires_in = ?session.seconds_until_expiry(now),
                "using cached access token"
            );
            return Some(session.access_token);
        }

        debug!("no usable session, attempting silent renewal");
        match self.provider.signin_silent().await {
            Ok(session) => Some(session.access_token),
            Err(e) => {
                debug!(error = %e, "silent renewal failed");
                None
            }
        }
    }

    async fn get_user(&self) -> Option<AppUser> {
        self.current_session()
            .await
            .map(|session| AppUser::from(&session))
    }
}
