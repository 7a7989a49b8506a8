//! Identity provider client implementations.

mod loopback;

pub use loopback::{LoopbackIdentityProvider, load_seed_session};
