//! Error types for the docker-config system

use thiserror::Error;

/// Main error type for the docker-config system
#[derive(Error, Debug)]
pub enum DockerConfigError {
    /// Configuration loading related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Config version gate failures. The message is operator-facing and
    /// rendered as-is.
    #[error("{0}")]
    Version(#[from] VersionError),

    /// Failure to convert the overlaid tree into a typed structure
    #[error("Extraction error: {0}")]
    Extract(String),
}

/// Result type alias for docker-config operations
pub type Result<T> = std::result::Result<T, DockerConfigError>;

/// Version gate failures, checked before any environment overlay runs.
///
/// Each message says which side is out of date: the image (the declared
/// version baked into the configuration file) or the deployment (the
/// expected version supplied through the environment).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum VersionError {
    /// Expected version supplied but the configuration declares none
    #[error("config has no version, but {variable} given: please update your image.")]
    MissingDeclaredVersion { variable: String },

    /// Configuration declares a version but none was expected
    #[error("no {variable} given, but {key} set in configuration: please update your deployment.")]
    MissingExpectedVersion { variable: String, key: String },

    /// Declared version is not a number
    #[error("{key} must be a number. Using timestamps as {key} is strongly suggested.")]
    NonNumericDeclaredVersion { key: String },

    /// Expected version could not be read as a number
    #[error("{variable} must be a number, got [{value}]: please fix your deployment.")]
    NonNumericExpectedVersion { variable: String, value: String },

    /// Declared version is ahead of what the deployment expects
    #[error("{variable} outdated ({expected} < {declared}): please update your deployment.")]
    DeclaredVersionNewer {
        variable: String,
        declared: f64,
        expected: f64,
    },

    /// Declared version is behind what the deployment expects
    #[error("{variable} newer than {key} ({expected} > {declared}): please update your image.")]
    DeclaredVersionOlder {
        variable: String,
        key: String,
        declared: f64,
        expected: f64,
    },
}

/// Configuration loading specific errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    /// Unsupported file extension
    #[error("Unsupported configuration format: {path}")]
    UnsupportedFormat { path: String },

    /// Root of the configuration is not a mapping
    #[error("Configuration root must be a mapping, found {found}")]
    InvalidRoot { found: String },
}

impl From<ConfigError> for DockerConfigError {
    fn from(err: ConfigError) -> Self {
        DockerConfigError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for DockerConfigError {
    fn from(err: serde_json::Error) -> Self {
        DockerConfigError::Extract(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_messages_name_the_stale_side() {
        let err = VersionError::DeclaredVersionOlder {
            variable: "NODE_CONFIG_CONFIGVERSION".to_string(),
            key: "configVersion".to_string(),
            declared: 3.0,
            expected: 4.0,
        };
        assert!(err.to_string().ends_with("please update your image."));

        let err = VersionError::DeclaredVersionNewer {
            variable: "NODE_CONFIG_CONFIGVERSION".to_string(),
            declared: 4.0,
            expected: 3.0,
        };
        assert!(err.to_string().ends_with("please update your deployment."));
    }

    #[test]
    fn test_version_error_is_rendered_verbatim() {
        let err = VersionError::NonNumericDeclaredVersion {
            key: "configVersion".to_string(),
        };
        let message = err.to_string();
        assert_eq!(DockerConfigError::from(err).to_string(), message);
    }

    #[test]
    fn test_config_error_conversion() {
        let err: DockerConfigError = ConfigError::FileNotFound {
            path: "config.yaml".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Configuration error: Configuration file not found: config.yaml"
        );
    }
}
