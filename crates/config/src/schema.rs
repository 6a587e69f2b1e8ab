//! Overlay option definitions

use serde::{Deserialize, Serialize};

/// Default prefix marking an environment variable as a config override
pub const DEFAULT_PREFIX: &str = "NODE_CONFIG_";

/// Default name of the declared version field in the configuration
pub const DEFAULT_VERSION_KEY: &str = "configVersion";

/// Options controlling the environment overlay
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayOptions {
    /// Substring that marks a variable as an override
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Configuration field holding the declared version
    #[serde(default = "default_version_key")]
    pub version_key: String,
    /// What the overlay does with the expected-version variable
    #[serde(default)]
    pub version_policy: VersionKeyPolicy,
}

/// Handling of the expected-version variable (`<prefix>CONFIGVERSION`)
/// once the version check has passed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VersionKeyPolicy {
    /// Treat it like any other override and write it to the version field
    #[default]
    Overlay,
    /// Only feed it to the version check, never write it to the tree
    Exclude,
}

impl OverlayOptions {
    /// Name of the environment variable carrying the expected version
    pub fn version_variable(&self) -> String {
        format!("{}{}", self.prefix, self.version_key.to_uppercase())
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_version_policy(mut self, policy: VersionKeyPolicy) -> Self {
        self.version_policy = policy;
        self
    }
}

impl Default for OverlayOptions {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            version_key: default_version_key(),
            version_policy: VersionKeyPolicy::default(),
        }
    }
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

fn default_version_key() -> String {
    DEFAULT_VERSION_KEY.to_string()
}
