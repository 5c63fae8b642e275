//! # hearth-config
//!
//! Configuration for the Hearth CLI, loaded from `hearth.toml` inside the
//! workspace's local settings directory. Every field has a default, so a
//! workspace without a config file is fully usable.

pub mod loader;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{HearthConfig, LoggingConfig, UpstreamConfig};
