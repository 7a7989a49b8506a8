//! Keyhole Application - Auth contract, ports and use cases
//!
//! This crate defines the application layer with:
//! - Port traits for the identity provider client, browser navigation and time
//! - The [`AuthClient`] contract the rest of the application programs against
//! - [`OidcAuth`], the adapter driving an identity provider through the ports
//! - The [`StartApp`] use case run once per page load

pub mod auth;
pub mod ports;
pub mod use_cases;

#[cfg(test)]
pub(crate) mod testing;

pub use auth::{AuthClient, CALLBACK_SEGMENT, OidcAuth};
pub use ports::{Clock, IdentityProvider, Navigator, ProviderError};
pub use use_cases::{StartApp, StartOutput};
