//! Configuration loader implementation

use crate::env::EnvSource;
use crate::overlay::EnvOverlayEngine;
use crate::path;
use crate::report::OverlayReport;
use crate::schema::OverlayOptions;
use crate::version::VersionValidator;
use anyhow::{Context, Result};
use figment::{
    providers::{Format, Json, Yaml},
    Figment,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::path::Path;
use tracing::info;
use types::{utils::value_kind, ConfigError, DockerConfigError};

/// A configuration tree that passed the version gate and had the
/// environment overlaid on it.
///
/// Built once at startup and handed to whatever needs configuration.
#[derive(Debug, Clone)]
pub struct DockerConfig {
    tree: Value,
    report: OverlayReport,
    options: OverlayOptions,
}

impl DockerConfig {
    /// Validate the config version, then overlay `env` onto `tree`.
    ///
    /// A version mismatch aborts before the tree is touched.
    pub fn from_tree(
        mut tree: Value,
        env: &dyn EnvSource,
        options: OverlayOptions,
    ) -> types::Result<Self> {
        if !tree.is_object() {
            return Err(ConfigError::InvalidRoot {
                found: value_kind(&tree).to_string(),
            }
            .into());
        }

        let expected = env.get(&options.version_variable());
        VersionValidator::validate_with(&tree, expected.as_deref(), &options)?;

        let outcomes = EnvOverlayEngine::new(options.clone()).apply(&mut tree, env);
        let report = OverlayReport::new(outcomes);
        info!("{}", report.summary());

        Ok(Self {
            tree,
            report,
            options,
        })
    }

    /// Case-insensitive lookup of a dotted path
    pub fn get(&self, path: &str) -> Option<&Value> {
        path::resolve(&self.tree, path)
    }

    /// Deserialize the overlaid configuration into a typed structure
    pub fn extract<T: DeserializeOwned>(&self) -> types::Result<T> {
        Ok(serde_json::from_value(self.tree.clone())?)
    }

    pub fn tree(&self) -> &Value {
        &self.tree
    }

    pub fn report(&self) -> &OverlayReport {
        &self.report
    }

    pub fn options(&self) -> &OverlayOptions {
        &self.options
    }

    pub fn into_inner(self) -> Value {
        self.tree
    }
}

/// Configuration loader that reads a YAML or JSON file and overlays the
/// environment on it
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from file and environment variables
    pub fn load<P: AsRef<Path>>(
        config_path: P,
        env: &dyn EnvSource,
        options: OverlayOptions,
    ) -> Result<DockerConfig> {
        let tree = Self::read_tree(config_path)?;
        Ok(DockerConfig::from_tree(tree, env, options)?)
    }

    /// Load configuration from a YAML string (for testing)
    pub fn load_from_str(
        yaml_content: &str,
        env: &dyn EnvSource,
        options: OverlayOptions,
    ) -> Result<DockerConfig> {
        let tree: Value = Figment::new()
            .merge(Yaml::string(yaml_content))
            .extract()
            .context("Failed to parse configuration from string")?;

        Ok(DockerConfig::from_tree(tree, env, options)?)
    }

    /// Read the base configuration tree, picking the format from the file
    /// extension
    pub fn read_tree<P: AsRef<Path>>(config_path: P) -> Result<Value> {
        let config_path = config_path.as_ref();

        // Figment treats a missing file as empty
        if !config_path.exists() {
            return Err(DockerConfigError::from(ConfigError::FileNotFound {
                path: config_path.display().to_string(),
            })
            .into());
        }

        let extension = config_path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        let figment = match extension.as_deref() {
            Some("yaml" | "yml") => Figment::new().merge(Yaml::file(config_path)),
            Some("json") => Figment::new().merge(Json::file(config_path)),
            _ => {
                return Err(DockerConfigError::from(ConfigError::UnsupportedFormat {
                    path: config_path.display().to_string(),
                })
                .into());
            }
        };

        figment
            .extract()
            .with_context(|| format!("Failed to parse configuration: {}", config_path.display()))
    }
}
