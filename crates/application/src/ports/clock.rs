//! Time source for session expiry and token lifetimes

use chrono::{DateTime, Utc};

/// Where the adapter learns the current instant.
///
/// A session is expired once this reaches its `expires_at`; issued sessions
/// get their expiry relative to it.
pub trait Clock: Send + Sync {
    /// The current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}
