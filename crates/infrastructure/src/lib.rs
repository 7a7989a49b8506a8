//! Keyhole Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading
//! and the client for the protected backend API.

pub mod adapters;
pub mod api;
pub mod config;
pub mod identity;
pub mod serialization;

pub use adapters::{BrowserHistory, SystemClock};
pub use api::{ApiError, DashboardApi, DashboardMeta, DashboardResponse};
pub use config::{AppConfig, ConfigError, ConfigLoader};
pub use identity::{LoopbackIdentityProvider, load_seed_session};
pub use serialization::{SerializationError, from_json_bytes, to_json_stable_bytes};
