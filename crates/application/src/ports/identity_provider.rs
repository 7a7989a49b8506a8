//! Identity provider client port
//!
//! The identity provider client owns the session, its storage and the
//! redirect protocol. The application reaches it only through this port.

use async_trait::async_trait;
use keyhole_domain::Session;
use url::Url;

/// Errors reported by an identity provider client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// Interaction with the provider is required; no silent sign-in possible.
    #[error("login required")]
    LoginRequired,

    /// The callback URL could not be consumed.
    #[error("invalid callback: {0}")]
    InvalidCallback(String),

    /// The session store could not be read or written.
    #[error("session storage error: {0}")]
    Storage(String),
}

/// Capability surface of an identity provider client.
///
/// Any implementation satisfying these five operations can back the
/// application, so providers can be swapped without touching call sites.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Returns the stored session, if any.
    ///
    /// # Errors
    /// Returns an error if the session store cannot be read.
    async fn get_current(&self) -> Result<Option<Session>, ProviderError>;

    /// Starts an interactive sign-in by redirecting the browser to the provider.
    ///
    /// # Errors
    /// Returns an error if the redirect cannot be started.
    async fn signin_redirect(&self) -> Result<(), ProviderError>;

    /// Starts an interactive sign-out by redirecting to the end-session endpoint.
    ///
    /// # Errors
    /// Returns an error if the redirect cannot be started.
    async fn signout_redirect(&self) -> Result<(), ProviderError>;

    /// Obtains a fresh session without any visible redirect.
    ///
    /// # Errors
    /// Returns an error if no session can be obtained non-interactively.
    async fn signin_silent(&self) -> Result<Session, ProviderError>;

    /// Consumes the protocol parameters carried by the callback URL.
    ///
    /// # Errors
    /// Returns an error if the callback is invalid or was already consumed.
    async fn signin_callback(&self, url: &Url) -> Result<Session, ProviderError>;
}
