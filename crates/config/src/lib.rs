//! Project configuration for the Houdini document pipeline.
//!
//! The pipeline only needs a handful of settings: where the schema lives,
//! which fields identify records of a given type, and which custom scalars
//! are swapped for schema scalars at runtime.

mod config;
mod error;
mod loader;

pub use config::{ProjectConfig, TypeConfig};
pub use error::{ConfigError, Result};
pub use loader::{find_config, load_config, load_config_from_str, CONFIG_FILES};
