//! Authentication domain types

mod error;
mod session;
mod settings;

pub use error::AuthError;
pub use session::{AppUser, Profile, Session};
pub use settings::{AuthSettings, RESPONSE_TYPE_CODE};
