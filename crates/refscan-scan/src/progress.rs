//! Scan progress reporting.

use std::time::Duration;

/// Progress information emitted before each entry point is walked.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanProgress {
    /// Entry point about to be walked.
    pub current_path: String,
    /// Position of the entry in the full enumeration.
    pub index: usize,
    /// Number of enumerated entries, eligible or not.
    pub total: usize,
    /// Findings recorded so far.
    pub findings: usize,
    /// Time elapsed since the scan started.
    pub elapsed: Duration,
}

impl ScanProgress {
    /// Fraction of the enumeration reached, in `0.0..=1.0`.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.index as f32 / self.total as f32
        }
    }

    /// Progress as a percentage.
    pub fn percentage(&self) -> f32 {
        self.fraction() * 100.0
    }
}
