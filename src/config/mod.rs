//! Stack configuration.
//!
//! - [`schema`] - serde types for the config file
//! - [`loader`] - reading TOML or JSON from disk
//! - [`validation`] - semantic checks run before any resource is declared

mod loader;
mod schema;
mod validation;

pub use loader::{load_config, parse_config, ConfigFormat};
pub use schema::{
    FlowLogPolicyScope, PlatformK8sConfig, StackConfig, DEFAULT_PROJECT, DEFAULT_REGION,
};
pub use validation::validate_config;
