//! Keyhole Domain - Core authentication and routing types
//!
//! This crate defines the domain model for the Keyhole authentication shell.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod error;
pub mod routes;

pub use auth::{AppUser, AuthError, AuthSettings, Profile, RESPONSE_TYPE_CODE, Session};
pub use error::{DomainError, DomainResult};
pub use routes::{Route, RouteTable, View};
