//! Network configuration and provider resolution.
//!
//! - [`config`]: Build-tool network entries and their TOML deserialisation.
//! - [`provider`]: [`Provider`] descriptions and [`resolve_provider`].

mod config;
mod provider;

pub use self::config::*;
pub use self::provider::*;
