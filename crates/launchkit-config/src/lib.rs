//! # launchkit Config
//!
//! Configuration for launchkit: where descriptors are written, which
//! `launchctl` to invoke, and a table of named daemon definitions.

mod error;
mod loader;
mod schema;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
