//! Use cases

mod start_app;

pub use start_app::{StartApp, StartOutput};
