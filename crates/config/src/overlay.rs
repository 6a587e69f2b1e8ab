//! Environment variable overlay engine
//!
//! Every variable whose name contains the prefix is turned into a path:
//! everything up to and including the prefix is dropped, the remainder is
//! lower-cased and `_` becomes `.`. `NODE_CONFIG_DATABASE_CONSTRING` thus
//! targets `database.constring`, which matches a `Database.ConString` key.
//! Only paths that already exist in the base configuration are written.

use crate::env::EnvSource;
use crate::literal;
use crate::path;
use crate::schema::{OverlayOptions, VersionKeyPolicy};
use serde_json::Value;
use tracing::{debug, info, warn};
use types::OverlayOutcome;

/// Applies prefixed environment variables on top of a configuration tree
#[derive(Debug, Clone, Default)]
pub struct EnvOverlayEngine {
    options: OverlayOptions,
}

impl EnvOverlayEngine {
    pub fn new(options: OverlayOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &OverlayOptions {
        &self.options
    }

    /// Overlay `env` onto `tree` using `prefix` and default options otherwise.
    pub fn overlay(tree: &mut Value, env: &dyn EnvSource, prefix: &str) -> Vec<OverlayOutcome> {
        Self::new(OverlayOptions::default().with_prefix(prefix)).apply(tree, env)
    }

    /// Overlay `env` onto `tree`, returning one outcome per prefixed variable
    /// in enumeration order.
    ///
    /// The tree is only written for `Applied` outcomes. Running the same
    /// environment snapshot twice leaves the tree as after the first run.
    pub fn apply(&self, tree: &mut Value, env: &dyn EnvSource) -> Vec<OverlayOutcome> {
        let mut vars = env.vars().peekable();
        if vars.peek().is_none() {
            let outcome = OverlayOutcome::NoEnvironmentVariables;
            info!("{}", outcome);
            return vec![outcome];
        }

        let prefix = self.options.prefix.as_str();
        let reserved_path = self.options.version_key.to_lowercase();
        let mut outcomes = Vec::new();

        for (name, raw) in vars {
            if !name.contains(prefix) {
                continue;
            }

            let outcome = self.apply_variable(tree, &name, &raw, prefix, &reserved_path);
            if outcome.is_applied() {
                info!("{}", outcome);
            } else {
                warn!("{}", outcome);
            }
            outcomes.push(outcome);
        }

        debug!("Environment overlay produced {} outcomes", outcomes.len());
        outcomes
    }

    fn apply_variable(
        &self,
        tree: &mut Value,
        name: &str,
        raw: &str,
        prefix: &str,
        reserved_path: &str,
    ) -> OverlayOutcome {
        let parts: Vec<&str> = name.split(prefix).collect();
        let [_, suffix] = parts.as_slice() else {
            return OverlayOutcome::SkippedMalformedName {
                name: name.to_string(),
            };
        };

        let path = suffix.to_lowercase().replace('_', ".");

        if self.options.version_policy == VersionKeyPolicy::Exclude && path == reserved_path {
            return OverlayOutcome::SkippedReserved {
                name: name.to_string(),
            };
        }

        let previous = match path::resolve(tree, &path) {
            Some(previous) if !path.is_empty() => previous.clone(),
            _ => return OverlayOutcome::SkippedNoPathFound { path },
        };

        let value = literal::coerce(raw);
        path::assign(tree, &path, value.clone());

        OverlayOutcome::Applied {
            path,
            previous,
            value,
        }
    }
}
