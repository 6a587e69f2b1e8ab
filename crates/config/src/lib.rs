//! Environment overlay for nested configuration trees
//!
//! This crate loads a base configuration from YAML or JSON, checks that its
//! declared version matches the version the deployment expects, and then
//! overlays prefixed environment variables (`NODE_CONFIG_DATABASE_CONSTRING`
//! -> `database.constring`) onto it with case-insensitive key matching.

pub mod env;
pub mod literal;
pub mod loader;
pub mod overlay;
pub mod path;
pub mod report;
pub mod schema;
pub mod version;

pub use env::{EnvSource, MockEnv, StdEnv};
pub use loader::{ConfigLoader, DockerConfig};
pub use overlay::EnvOverlayEngine;
pub use report::OverlayReport;
pub use schema::*;
pub use version::VersionValidator;
