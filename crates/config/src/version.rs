//! Config version gate
//!
//! The configuration file may declare a numeric version and the deployment
//! may state which version it expects. Both must agree (or both be absent)
//! before any environment overlay is attempted.

use crate::path;
use crate::schema::OverlayOptions;
use serde_json::Value;
use tracing::debug;
use types::VersionError;

/// Configuration version validator
pub struct VersionValidator;

impl VersionValidator {
    /// Check the declared version against `expected` using the default
    /// field and variable names.
    pub fn validate(config: &Value, expected: Option<&str>) -> Result<(), VersionError> {
        Self::validate_with(config, expected, &OverlayOptions::default())
    }

    /// Check the declared version against `expected`.
    ///
    /// The declared version is looked up case-insensitively under
    /// `options.version_key`, the same way the overlay resolves paths. A
    /// `null` declared version and an empty expected version count as absent.
    pub fn validate_with(
        config: &Value,
        expected: Option<&str>,
        options: &OverlayOptions,
    ) -> Result<(), VersionError> {
        let declared = path::resolve(config, &options.version_key).filter(|v| !v.is_null());
        let expected = expected.map(str::trim).filter(|e| !e.is_empty());

        let (declared, expected) = match (declared, expected) {
            (None, None) => {
                debug!("No config version declared or expected, skipping version check");
                return Ok(());
            }
            (None, Some(_)) => {
                return Err(VersionError::MissingDeclaredVersion {
                    variable: options.version_variable(),
                });
            }
            (Some(_), None) => {
                return Err(VersionError::MissingExpectedVersion {
                    variable: options.version_variable(),
                    key: options.version_key.clone(),
                });
            }
            (Some(declared), Some(expected)) => (declared, expected),
        };

        // Strings are rejected outright, "11" < "3" style comparisons are a trap
        let declared = match declared {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
        .ok_or_else(|| VersionError::NonNumericDeclaredVersion {
            key: options.version_key.clone(),
        })?;

        let expected = expected
            .parse::<f64>()
            .ok()
            .filter(|e| e.is_finite())
            .ok_or_else(|| VersionError::NonNumericExpectedVersion {
                variable: options.version_variable(),
                value: expected.to_string(),
            })?;

        if declared > expected {
            return Err(VersionError::DeclaredVersionNewer {
                variable: options.version_variable(),
                declared,
                expected,
            });
        }

        if declared < expected {
            return Err(VersionError::DeclaredVersionOlder {
                variable: options.version_variable(),
                key: options.version_key.clone(),
                declared,
                expected,
            });
        }

        debug!("Config version {} matches expected version", declared);
        Ok(())
    }
}
