//! Report rows describing a single missing reference.

use std::fmt;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// Name recorded when the missing thing is an object rather than a property.
pub const DEFAULT_MISSING_LABEL: &str = "Object";

/// One finding: where a missing reference was found and what it was called.
///
/// Rows are snapshots. They carry everything needed to describe the finding,
/// so they stay meaningful after the asset graph changes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportRow {
    asset_path: String,
    sub_path: String,
    property_name: CompactString,
}

impl ReportRow {
    /// Create a new row.
    pub fn new(
        asset_path: impl Into<String>,
        sub_path: impl Into<String>,
        property_name: impl Into<CompactString>,
    ) -> Self {
        Self {
            asset_path: asset_path.into(),
            sub_path: sub_path.into(),
            property_name: property_name.into(),
        }
    }

    /// Path of the entry point the finding belongs to.
    pub fn asset_path(&self) -> &str {
        &self.asset_path
    }

    /// Slash-joined route from the entry point's root, or empty.
    pub fn sub_path(&self) -> &str {
        &self.sub_path
    }

    /// Display name of the missing property, or the object-level label.
    pub fn property_name(&self) -> &str {
        &self.property_name
    }

    /// `Missing {name}` followed by ` in {sub_path}` when a sub-path exists.
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ReportRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Missing {}", self.property_name)?;
        if !self.sub_path.is_empty() {
            write!(f, " in {}", self.sub_path)?;
        }
        Ok(())
    }
}
