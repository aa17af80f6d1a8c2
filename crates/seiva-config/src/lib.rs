//! seiva-config
//!
//! School settings model and its on-disk persistence.
//! Owns the Config data structure, per-section patches and backup helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{default_data_dir, ConfigManager};
pub use model::*;
