//! Overlay reporting utilities

use serde::Serialize;
use types::OverlayOutcome;

/// Report of one overlay pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OverlayReport {
    pub outcomes: Vec<OverlayOutcome>,
}

impl OverlayReport {
    pub fn new(outcomes: Vec<OverlayOutcome>) -> Self {
        Self { outcomes }
    }

    /// Outcomes that wrote to the configuration
    pub fn applied(&self) -> impl Iterator<Item = &OverlayOutcome> {
        self.outcomes.iter().filter(|o| o.is_applied())
    }

    /// Outcomes that were skipped with a warning
    pub fn skipped(&self) -> impl Iterator<Item = &OverlayOutcome> {
        self.outcomes.iter().filter(|o| o.is_skipped())
    }

    /// Paths that were overwritten, in processing order
    pub fn applied_paths(&self) -> Vec<&str> {
        self.applied().filter_map(OverlayOutcome::path).collect()
    }

    pub fn has_warnings(&self) -> bool {
        self.skipped().next().is_some()
    }

    pub fn summary(&self) -> String {
        format!(
            "Overlay: {} applied, {} skipped",
            self.applied().count(),
            self.skipped().count()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_counts() {
        let report = OverlayReport::new(vec![
            OverlayOutcome::Applied {
                path: "a.b".to_string(),
                previous: json!(1),
                value: json!(2),
            },
            OverlayOutcome::SkippedNoPathFound {
                path: "c".to_string(),
            },
            OverlayOutcome::SkippedMalformedName {
                name: "X".to_string(),
            },
        ]);

        assert_eq!(report.summary(), "Overlay: 1 applied, 2 skipped");
        assert_eq!(report.applied_paths(), vec!["a.b"]);
        assert!(report.has_warnings());
    }

    #[test]
    fn test_empty_environment_has_no_warnings() {
        let report = OverlayReport::new(vec![OverlayOutcome::NoEnvironmentVariables]);
        assert!(!report.has_warnings());
        assert_eq!(report.summary(), "Overlay: 0 applied, 0 skipped");
    }
}
