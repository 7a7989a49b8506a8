//! The authentication contract used by the rest of the application.

use std::convert::Infallible;

use async_trait::async_trait;
use keyhole_domain::{AppUser, AuthError};

/// Authentication capabilities, independent of the identity provider in use.
///
/// Token and user lookups never fail: `None` means "not authenticated" and
/// callers must not treat it as an error.
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Prepares the client for this page load.
    ///
    /// Must be called exactly once at startup. When the page is a return from
    /// a provider redirect the callback is completed first and the visible URL
    /// is reset to the application root.
    ///
    /// Returns whether a non-expired session exists afterward.
    ///
    /// # Errors
    /// Returns [`AuthError::CallbackFailed`] if the callback cannot be completed.
    async fn init(&self) -> Result<bool, AuthError>;

    /// Redirects the browser to the provider's sign-in page.
    ///
    /// Never returns normally: once the redirect has started the future stays
    /// pending while the page navigates away.
    ///
    /// # Errors
    /// Returns [`AuthError::RedirectFailed`] if the redirect cannot be started.
    async fn login(&self) -> Result<Infallible, AuthError>;

    /// Redirects the browser to the provider's sign-out endpoint.
    ///
    /// Same divergence as [`login`](Self::login).
    ///
    /// # Errors
    /// Returns [`AuthError::RedirectFailed`] if the redirect cannot be started.
    async fn logout(&self) -> Result<Infallible, AuthError>;

    /// Returns a currently valid access token.
    ///
    /// An absent or expired session triggers one silent renewal attempt.
    async fn get_access_token(&self) -> Option<String>;

    /// Returns the signed-in user, or `None` without a session.
    async fn get_user(&self) -> Option<AppUser>;
}
