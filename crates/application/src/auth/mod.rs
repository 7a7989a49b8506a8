//! Authentication client contract and its identity provider adapter.

mod client;
mod oidc_auth;

pub use client::AuthClient;
pub use oidc_auth::{CALLBACK_SEGMENT, OidcAuth};
