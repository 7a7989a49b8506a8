//! Port doubles shared by the unit tests of this crate.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use keyhole_domain::{Profile, Session};
use url::Url;

use crate::ports::{Clock, IdentityProvider, Navigator, ProviderError};

pub fn epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

pub fn session(token: &str, lifetime_secs: i64) -> Session {
    Session::new(
        token,
        Profile::new()
            .with_claim("preferred_username", "alice")
            .with_claim("email", "a@example.com"),
    )
    .with_lifetime(epoch(), lifetime_secs)
}

pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Scripted identity provider recording how often each operation ran.
#[derive(Default)]
pub struct MockProvider {
    pub current: Mutex<Option<Session>>,
    pub current_error: Mutex<Option<ProviderError>>,
    pub silent_results: Mutex<VecDeque<Result<Session, ProviderError>>>,
    pub callback_result: Mutex<Option<Result<Session, ProviderError>>>,
    pub redirect_error: Mutex<Option<ProviderError>>,
    pub silent_calls: AtomicUsize,
    pub callback_calls: AtomicUsize,
    pub signin_redirects: AtomicUsize,
    pub signout_redirects: AtomicUsize,
}

impl MockProvider {
    pub fn with_session(session: Session) -> Self {
        let provider = Self::default();
        *provider.current.lock().unwrap() = Some(session);
        provider
    }

    pub fn push_silent(&self, result: Result<Session, ProviderError>) {
        self.silent_results.lock().unwrap().push_back(result);
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityProvider for MockProvider {
    async fn get_current(&self) -> Result<Option<Session>, ProviderError> {
        if let Some(error) = self.current_error.lock().unwrap().clone() {
            return Err(error);
        }
        Ok(self.current.lock().unwrap().clone())
    }

    async fn signin_redirect(&self) -> Result<(), ProviderError> {
        self.signin_redirects.fetch_add(1, Ordering::SeqCst);
        self.redirect_error.lock().unwrap().clone().map_or(Ok(()), Err)
    }

    async fn signout_redirect(&self) -> Result<(), ProviderError> {
        self.signout_redirects.fetch_add(1, Ordering::SeqCst);
        self.redirect_error.lock().unwrap().clone().map_or(Ok(()), Err)
    }

    async fn signin_silent(&self) -> Result<Session, ProviderError> {
        self.silent_calls.fetch_add(1, Ordering::SeqCst);
        let result = self
            .silent_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(ProviderError::LoginRequired));
        if let Ok(session) = &result {
            *self.current.lock().unwrap() = Some(session.clone());
        }
        result
    }

    async fn signin_callback(&self, _url: &Url) -> Result<Session, ProviderError> {
        self.callback_calls.fetch_add(1, Ordering::SeqCst);
        let result = self
            .callback_result
            .lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(ProviderError::InvalidCallback("no state".to_string())));
        if let Ok(session) = &result {
            *self.current.lock().unwrap() = Some(session.clone());
        }
        result
    }
}

/// Navigator that records history rewrites instead of touching a browser.
pub struct RecordingNavigator {
    pub url: Mutex<Url>,
    pub replaced: Mutex<Vec<String>>,
    pub assigned: Mutex<Vec<Url>>,
}

impl RecordingNavigator {
    pub fn at(url: &str) -> Self {
        Self {
            url: Mutex::new(Url::parse(url).unwrap()),
            replaced: Mutex::new(Vec::new()),
            assigned: Mutex::new(Vec::new()),
        }
    }
}

impl Navigator for RecordingNavigator {
    fn current_url(&self) -> Url {
        self.url.lock().unwrap().clone()
    }

    fn replace_state(&self, path: &str) {
        let mut url = self.url.lock().unwrap();
        url.set_path(path);
        url.set_query(None);
        url.set_fragment(None);
        self.replaced.lock().unwrap().push(path.to_string());
    }

    fn assign(&self, url: &Url) {
        self.assigned.lock().unwrap().push(url.clone());
        *self.url.lock().unwrap() = url.clone();
    }
}
