//! Shared types for the docker-config system
//!
//! This crate contains the error types and overlay outcome types used by the
//! configuration overlay engine and the launcher binary.

pub mod error;
pub mod outcome;
pub mod utils;

// Re-export commonly used types
pub use error::{ConfigError, DockerConfigError, Result, VersionError};
pub use outcome::{OverlayOutcome, SOURCE_ENVS};
