//! Summary of what a filter run changed.

use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterReport {
    pub format: String,
    pub environments: Vec<String>,
    pub rendered_blocks: usize,
    pub resolved_references: usize,
    /// Reference targets that had no recorded number when resolved.
    pub unresolved_references: Vec<String>,
}

impl FilterReport {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rendered_blocks == 0 && self.resolved_references == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_serializes_snake_case_fields() {
        let mut report = FilterReport::new("html");
        report.unresolved_references.push("thm-9".to_string());
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["format"], "html");
        assert_eq!(value["unresolved_references"][0], "thm-9");
        assert!(report.is_empty());
    }
}
