//! Application configuration.
//!
//! Settings come from a JSON file (`config.json`) with camelCase keys; each
//! key can be overridden by a `KEYHOLE_*` environment variable.

mod loader;

pub use loader::{AppConfig, ConfigError, ConfigLoader, ENV_PREFIX};
