//! Finished scan results.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ScanWarning;
use crate::row::ReportRow;

/// Result of a completed scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Findings in traversal order.
    pub rows: Vec<ReportRow>,

    /// Number of entry points that were walked.
    pub assets_scanned: usize,

    /// Number of enumerated entries outside the content root or excluded.
    pub assets_filtered: usize,

    /// Assets skipped after a resolution failure.
    pub warnings: Vec<ScanWarning>,

    /// When this scan finished.
    pub scanned_at: DateTime<Utc>,

    /// Duration of the scan.
    pub scan_duration: Duration,
}

impl ScanReport {
    /// Create a new report.
    pub fn new(
        rows: Vec<ReportRow>,
        assets_scanned: usize,
        assets_filtered: usize,
        warnings: Vec<ScanWarning>,
        scan_duration: Duration,
    ) -> Self {
        Self {
            rows,
            assets_scanned,
            assets_filtered,
            warnings,
            scanned_at: Utc::now(),
            scan_duration,
        }
    }

    /// True when no missing references were found.
    pub fn is_clean(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of findings.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the report has no findings.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Check if any assets were skipped.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Rows belonging to one entry point.
    pub fn rows_for<'a>(&'a self, asset_path: &'a str) -> impl Iterator<Item = &'a ReportRow> + 'a {
        self.rows.iter().filter(move |r| r.asset_path() == asset_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_clean() {
        let report = ScanReport::new(Vec::new(), 0, 0, Vec::new(), Duration::ZERO);
        assert!(report.is_clean());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_rows_for() {
        let report = ScanReport::new(
            vec![
                ReportRow::new("Assets/A.prefab", "A", "Mesh"),
                ReportRow::new("Assets/B.prefab", "B", "Mesh"),
                ReportRow::new("Assets/A.prefab", "A/Child", "Material"),
            ],
            2,
            0,
            Vec::new(),
            Duration::from_millis(5),
        );
        assert_eq!(report.rows_for("Assets/A.prefab").count(), 2);
        assert_eq!(report.len(), 3);
    }
}
