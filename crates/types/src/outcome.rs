//! Per-variable results of an environment overlay pass

use crate::utils::{render_previous, REDACTED};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Source tag printed in front of every overlay message
pub const SOURCE_ENVS: &str = "ENVS";

/// What happened to a single environment variable during an overlay pass
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OverlayOutcome {
    /// The environment was empty, nothing was touched
    NoEnvironmentVariables,
    /// The value at `path` was replaced
    Applied {
        path: String,
        previous: Value,
        value: Value,
    },
    /// The derived path does not exist in the base configuration
    SkippedNoPathFound { path: String },
    /// The prefix occurs more than once in the variable name
    SkippedMalformedName { name: String },
    /// The variable feeds the version check and is not overlaid
    SkippedReserved { name: String },
}

impl OverlayOutcome {
    /// Whether the configuration tree was written for this outcome
    pub fn is_applied(&self) -> bool {
        matches!(self, OverlayOutcome::Applied { .. })
    }

    /// Whether the variable was skipped with a warning
    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            OverlayOutcome::SkippedNoPathFound { .. }
                | OverlayOutcome::SkippedMalformedName { .. }
                | OverlayOutcome::SkippedReserved { .. }
        )
    }

    /// Dotted path the outcome refers to, if one was derived
    pub fn path(&self) -> Option<&str> {
        match self {
            OverlayOutcome::Applied { path, .. } | OverlayOutcome::SkippedNoPathFound { path } => {
                Some(path)
            }
            _ => None,
        }
    }
}

// Never prints the new value, overlays routinely carry secrets.
impl fmt::Display for OverlayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OverlayOutcome::NoEnvironmentVariables => write!(
                f,
                "[{}] -> No environment variables found wont overwrite config file values.",
                SOURCE_ENVS
            ),
            OverlayOutcome::Applied { path, previous, .. } => write!(
                f,
                "|{}| -> variable [{}] set, overwriting [{}] with [{}]",
                SOURCE_ENVS,
                path,
                render_previous(previous),
                REDACTED
            ),
            OverlayOutcome::SkippedNoPathFound { path } => write!(
                f,
                "[{}] -> variable key {} does not exist in the config file, it will be skipped.",
                SOURCE_ENVS, path
            ),
            OverlayOutcome::SkippedMalformedName { name } => write!(
                f,
                "[{}] -> variable key {} has a bad format.",
                SOURCE_ENVS, name
            ),
            OverlayOutcome::SkippedReserved { name } => write!(
                f,
                "[{}] -> variable key {} is reserved for the version check, it will be skipped.",
                SOURCE_ENVS, name
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_applied_message_redacts_new_value() {
        let outcome = OverlayOutcome::Applied {
            path: "database.constring".to_string(),
            previous: json!("old"),
            value: json!("hunter2"),
        };
        let message = outcome.to_string();
        assert_eq!(
            message,
            "|ENVS| -> variable [database.constring] set, overwriting [old] with [new content..(secret)]"
        );
        assert!(!message.contains("hunter2"));
    }

    #[test]
    fn test_applied_message_serializes_structured_previous() {
        let outcome = OverlayOutcome::Applied {
            path: "pool".to_string(),
            previous: json!({"min": 1, "max": 4}),
            value: json!(8),
        };
        assert!(outcome.to_string().contains(r#"[{"min":1,"max":4}]"#));
    }

    #[test]
    fn test_classification() {
        let skipped = OverlayOutcome::SkippedMalformedName {
            name: "NODE_CONFIG_A_NODE_CONFIG_B".to_string(),
        };
        assert!(skipped.is_skipped());
        assert!(!skipped.is_applied());
        assert_eq!(skipped.path(), None);
        assert!(!OverlayOutcome::NoEnvironmentVariables.is_skipped());
    }
}
