//! Browser navigation port

use url::Url;

/// Port over the browser's location and history.
pub trait Navigator: Send + Sync {
    /// The full URL of the current page.
    fn current_url(&self) -> Url;

    /// Path component of the current URL.
    fn current_path(&self) -> String {
        self.current_url().path().to_string()
    }

    /// Replaces the current history entry with `path` on the same origin.
    ///
    /// Query and fragment are dropped and no new history entry is created.
    fn replace_state(&self, path: &str);

    /// Starts a full-page navigation to `url`.
    ///
    /// The running page is torn down once the navigation commits.
    fn assign(&self, url: &Url);
}
