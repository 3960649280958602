//! Configuration module for spritefx
//!
//! Provides types, discovery and parsing for `sfx.toml`.

pub mod loader;
pub mod schema;

pub use loader::{
    find_config, find_config_from, load_config, load_config_file, parse_config, ConfigError,
    CONFIG_FILE,
};
pub use schema::*;
