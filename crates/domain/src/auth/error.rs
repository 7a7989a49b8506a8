//! Authentication error types

use thiserror::Error;

/// Errors surfaced by the authentication client.
///
/// Token lookups never produce these; an unavailable token is reported as
/// "not authenticated" instead. Invalid settings are rejected earlier, when
/// [`AuthSettings`](crate::AuthSettings) is built.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Completing the provider callback failed.
    #[error("sign-in callback failed: {message}")]
    CallbackFailed {
        /// Error description.
        message: String,
    },

    /// The redirect to the provider could not be started.
    #[error("redirect to provider failed: {message}")]
    RedirectFailed {
        /// Error description.
        message: String,
    },
}
