//! Infrastructure adapters

mod browser_history;
mod system_clock;

pub use browser_history::BrowserHistory;
pub use system_clock::SystemClock;
