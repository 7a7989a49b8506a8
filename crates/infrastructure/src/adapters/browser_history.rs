//! In-process browser history.
//!
//! Models the location bar and the session history stack of a single tab,
//! so the shell and its tests run outside a real browser.

use keyhole_application::ports::Navigator;
use parking_lot::Mutex;
use tracing::debug;
use url::Url;

#[derive(Debug)]
struct HistoryState {
    earlier: Vec<Url>,
    current: Url,
}

/// History stack implementing the [`Navigator`] port.
#[derive(Debug)]
pub struct BrowserHistory {
    state: Mutex<HistoryState>,
}

impl BrowserHistory {
    /// Opens a tab at `initial`.
    #[must_use]
    pub fn new(initial: Url) -> Self {
        Self {
            state: Mutex::new(HistoryState {
                earlier: Vec::new(),
                current: initial,
            }),
        }
    }

    /// Opens a tab at a URL given as text.
    ///
    /// # Errors
    ///
    /// Returns an error if `initial` is not an absolute URL.
    pub fn open(initial: &str) -> Result<Self, url::ParseError> {
        Ok(Self::new(Url::parse(initial)?))
    }

    /// Number of entries in the history stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.state.lock().earlier.len() + 1
    }

    /// Always false; a tab has at least one entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<Url> {
        let state = self.state.lock();
        let mut entries = state.earlier.clone();
        entries.push(state.current.clone());
        entries
    }
}

impl Navigator for BrowserHistory {
    fn current_url(&self) -> Url {
        self.state.lock().current.clone()
    }

    fn replace_state(&self, path: &str) {
        let mut state = self.state.lock();
        let url = &mut state.current;
        url.set_path(path);
        url.set_query(None);
        url.set_fragment(None);
        debug!(url = %url, "history entry replaced");
    }

    fn assign(&self, url: &Url) {
        let mut state = self.state.lock();
        let previous = std::mem::replace(&mut state.current, url.clone());
        state.earlier.push(previous);
        debug!(url = %url, "navigated");
    }
}
