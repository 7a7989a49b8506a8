//! JSON decoding for configuration and seed files.

mod json;

pub use json::*;
