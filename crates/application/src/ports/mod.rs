//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external systems.
//! Each port is a trait that can be implemented by adapters in the infrastructure layer.

mod clock;
mod identity_provider;
mod navigator;

pub use clock::Clock;
pub use identity_provider::{IdentityProvider, ProviderError};
pub use navigator::Navigator;
