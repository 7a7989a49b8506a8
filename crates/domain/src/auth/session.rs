//! Session, profile claims and the application-facing user view.
//!
//! A [`Session`] is produced and owned by the identity provider client.
//! The application only ever reads it and derives an [`AppUser`] from its
//! [`Profile`].

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Claim carrying the user's login name.
pub const PREFERRED_USERNAME_CLAIM: &str = "preferred_username";

/// Claim carrying the user's email address.
pub const EMAIL_CLAIM: &str = "email";

/// Profile claims returned by the provider.
///
/// Claim presence varies by provider, so every claim is an optional string.
/// Scalar JSON claims (numbers, booleans) are kept in their textual form;
/// structured claims (arrays, objects) are not part of the profile view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>", into = "BTreeMap<String, Option<String>>")]
pub struct Profile {
    claims: BTreeMap<String, Option<String>>,
}

impl Profile {
    /// Creates an empty profile.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            claims: BTreeMap::new(),
        }
    }

    /// Builder-style insertion of a claim.
    #[must_use]
    pub fn with_claim(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, Some(value.into()));
        self
    }

    /// Inserts or replaces a claim.
    pub fn insert(&mut self, name: impl Into<String>, value: Option<String>) {
        self.claims.insert(name.into(), value);
    }

    /// Returns a claim value.
    ///
    /// Missing claims, explicit nulls and empty strings are all treated as absent.
    #[must_use]
    pub fn claim(&self, name: &str) -> Option<&str> {
        self.claims
            .get(name)
            .and_then(Option::as_deref)
            .filter(|value| !value.is_empty())
    }

    /// The `preferred_username` claim, if present.
    #[must_use]
    pub fn preferred_username(&self) -> Option<&str> {
        self.claim(PREFERRED_USERNAME_CLAIM)
    }

    /// The `email` claim, if present.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.claim(EMAIL_CLAIM)
    }

    /// Copy holding only the named claims.
    #[must_use]
    pub fn restricted_to(&self, names: &[&str]) -> Self {
        let claims = self
            .claims
            .iter()
            .filter(|(name, _)| names.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        Self { claims }
    }

    /// Number of claims, including absent ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    /// Returns true if the profile carries no claims at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

impl From<Map<String, Value>> for Profile {
    fn from(raw: Map<String, Value>) -> Self {
        let claims = raw
            .into_iter()
            .filter_map(|(name, value)| {
                let value = match value {
                    Value::Null => None,
                    Value::String(s) => Some(s),
                    Value::Bool(b) => Some(b.to_string()),
                    Value::Number(n) => Some(n.to_string()),
                    Value::Array(_) | Value::Object(_) => return None,
                };
                Some((name, value))
            })
            .collect();
        Self { claims }
    }
}

impl From<Profile> for BTreeMap<String, Option<String>> {
    fn from(profile: Profile) -> Self {
        profile.claims
    }
}

/// An authenticated session as held by the identity provider client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The bearer access token.
    pub access_token: String,
    /// Refresh token, if the provider issued one.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// When the access token expires, if known.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    /// Scopes granted with the token.
    #[serde(default)]
    pub scopes: Vec<String>,
    /// Profile claims of the signed-in user.
    #[serde(default)]
    pub profile: Profile,
}

impl Session {
    /// Creates a session without expiry information.
    #[must_use]
    pub fn new(access_token: impl Into<String>, profile: Profile) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
            scopes: Vec::new(),
            profile,
        }
    }

    /// Sets an absolute expiry instant.
    #[must_use]
    pub const fn with_expires_at(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Sets the expiry relative to `now`.
    ///
    /// A lifetime beyond the representable time range leaves the session
    /// without expiry.
    #[must_use]
    pub fn with_lifetime(mut self, now: DateTime<Utc>, lifetime_secs: i64) -> Self {
        self.expires_at =
            Duration::try_seconds(lifetime_secs).and_then(|lifetime| now.checked_add_signed(lifetime));
        self
    }

    /// Sets the refresh token.
    #[must_use]
    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    /// Sets the granted scopes from a space separated scope string.
    #[must_use]
    pub fn with_scope(mut self, scope: &str) -> Self {
        self.scopes = scope.split_whitespace().map(String::from).collect();
        self
    }

    /// Returns true once `now` has reached the expiry instant.
    ///
    /// A session without an expiry never expires.
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| now >= expires_at)
    }

    /// Seconds until expiry, or `None` if no expiry is known.
    #[must_use]
    pub fn seconds_until_expiry(&self, now: DateTime<Utc>) -> Option<i64> {
        self.expires_at.map(|exp| (exp - now).num_seconds())
    }
}

/// The user view handed to the rest of the application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppUser {
    /// Login name, falling back to the email address.
    pub preferred_username: Option<String>,
    /// Email address.
    pub email: Option<String>,
}

impl AppUser {
    /// Derives the user view from profile claims.
    #[must_use]
    pub fn from_profile(profile: &Profile) -> Self {
        let email = profile.email().map(String::from);
        let preferred_username = profile
            .preferred_username()
            .map(String::from)
            .or_else(|| email.clone());
        Self {
            preferred_username,
            email,
        }
    }

    /// Name suitable for a greeting, if any is known.
    #[must_use]
    pub fn display_name(&self) -> Option<&str> {
        self.preferred_username.as_deref()
    }
}

impl From<&Session> for AppUser {
    fn from(session: &Session) -> Self {
        Self::from_profile(&session.profile)
    }
}
