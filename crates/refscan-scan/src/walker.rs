//! Depth-first traversal of a resolved asset graph.

use compact_str::CompactString;
use tracing::trace;

use refscan_core::{Asset, CompositeNode, ReportRow, ResolveError, Scene, SerializedObject};

use crate::classify::is_missing;
use crate::tracker::SubPath;

/// In-flight state of one entry point's traversal.
#[derive(Debug, Clone)]
pub struct ScanCursor {
    asset_path: String,
    sub_path: SubPath,
}

impl ScanCursor {
    /// Create a cursor positioned at an entry point's root.
    pub fn new(asset_path: impl Into<String>) -> Self {
        Self {
            asset_path: asset_path.into(),
            sub_path: SubPath::new(),
        }
    }

    /// Path of the entry point being walked.
    pub fn asset_path(&self) -> &str {
        &self.asset_path
    }

    /// Current location below the entry point.
    pub fn sub_path(&self) -> &SubPath {
        &self.sub_path
    }

    /// Capture the current location as an immutable row.
    fn snapshot(&self, name: CompactString) -> ReportRow {
        ReportRow::new(self.asset_path.clone(), self.sub_path.as_str(), name)
    }
}

/// Failure raised while walking, with the sub-path where it happened.
#[derive(Debug)]
pub struct WalkFailure {
    /// Sub-path at the point of failure.
    pub sub_path: String,
    /// Underlying error.
    pub source: ResolveError,
}

/// Visits an asset graph and appends a row for every missing reference.
pub struct Walker<'a> {
    cursor: ScanCursor,
    rows: &'a mut Vec<ReportRow>,
    missing_label: &'a str,
}

impl<'a> Walker<'a> {
    /// Create a walker for one entry point, appending findings to `rows`.
    pub fn new(
        asset_path: impl Into<String>,
        rows: &'a mut Vec<ReportRow>,
        missing_label: &'a str,
    ) -> Self {
        Self {
            cursor: ScanCursor::new(asset_path),
            rows,
            missing_label,
        }
    }

    /// Current cursor state.
    pub fn cursor(&self) -> &ScanCursor {
        &self.cursor
    }

    /// Walk a resolved entry point. `None` means it did not resolve.
    pub fn walk(&mut self, asset: Option<&Asset>) -> Result<(), WalkFailure> {
        match asset {
            None => {
                self.declare_missing(None);
                Ok(())
            }
            Some(Asset::Scene(scene)) => self.visit_scene(Some(scene)),
            Some(Asset::Composite(node)) => self.visit_composite(Some(node)),
            Some(Asset::Object(object)) => self.visit_object(Some(object)),
        }
    }

    /// Visit every root node of a scene.
    pub fn visit_scene(&mut self, scene: Option<&Scene>) -> Result<(), WalkFailure> {
        let Some(scene) = scene else {
            self.declare_missing(None);
            return Ok(());
        };

        for root in &scene.roots {
            self.visit_composite(root.as_ref())?;
        }
        Ok(())
    }

    /// Visit a node's facets, then its children, inside the node's segment.
    pub fn visit_composite(&mut self, node: Option<&CompositeNode>) -> Result<(), WalkFailure> {
        let Some(node) = node else {
            self.declare_missing(None);
            return Ok(());
        };

        self.cursor.sub_path.step_into(&node.name);
        let result = self.visit_composite_contents(node);
        self.cursor.sub_path.step_back();
        result
    }

    fn visit_composite_contents(&mut self, node: &CompositeNode) -> Result<(), WalkFailure> {
        for facet in &node.facets {
            self.visit_object(facet.as_ref())?;
        }
        for child in &node.children {
            self.visit_composite(child.as_ref())?;
        }
        Ok(())
    }

    /// Visit every visible property of a single object.
    pub fn visit_object(&mut self, object: Option<&SerializedObject>) -> Result<(), WalkFailure> {
        let Some(object) = object else {
            self.declare_missing(None);
            return Ok(());
        };

        self.cursor.sub_path.step_into(object.short_type_name());
        let result = self.visit_properties(object);
        self.cursor.sub_path.step_back();
        result
    }

    fn visit_properties(&mut self, object: &SerializedObject) -> Result<(), WalkFailure> {
        if let Some(reason) = &object.corrupt {
            return Err(WalkFailure {
                sub_path: self.cursor.sub_path.as_str().to_string(),
                source: ResolveError::corrupt(reason.clone()),
            });
        }

        for property in object.visible_properties() {
            if is_missing(Some(property)) {
                self.declare_missing(Some(property.display_name()));
            }
        }
        Ok(())
    }

    fn declare_missing(&mut self, name: Option<CompactString>) {
        let name = name.unwrap_or_else(|| CompactString::from(self.missing_label));
        let row = self.cursor.snapshot(name);
        trace!(
            asset = row.asset_path(),
            sub_path = row.sub_path(),
            property = row.property_name(),
            "missing reference"
        );
        self.rows.push(row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refscan_core::{DEFAULT_MISSING_LABEL, SerializedProperty};

    fn walk(asset: Option<&Asset>) -> Vec<ReportRow> {
        let mut rows = Vec::new();
        let mut walker = Walker::new("Assets/Test.prefab", &mut rows, DEFAULT_MISSING_LABEL);
        walker.walk(asset).unwrap();
        assert!(walker.cursor().sub_path().is_empty());
        rows
    }

    #[test]
    fn test_unresolved_entry_point() {
        let rows = walk(None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sub_path(), "");
        assert_eq!(rows[0].property_name(), DEFAULT_MISSING_LABEL);
    }

    #[test]
    fn test_missing_facet_is_reported_at_node() {
        let node = CompositeNode::new("Enemy").with_missing_facet();
        let rows = walk(Some(&Asset::Composite(node)));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].description(), "Missing Object in Enemy");
    }

    #[test]
    fn test_facets_before_children() {
        let node = CompositeNode::new("Root")
            .with_child(CompositeNode::new("Child").with_facet(
                SerializedObject::new("UnityEngine.Light")
                    .with_properties(vec![SerializedProperty::dangling("m_Cookie", 4)]),
            ))
            .with_facet(
                SerializedObject::new("UnityEngine.Animator")
                    .with_properties(vec![SerializedProperty::dangling("m_Controller", 2)]),
            );
        let rows = walk(Some(&Asset::Composite(node)));
        let described: Vec<String> = rows.iter().map(ReportRow::description).collect();
        assert_eq!(
            described,
            vec![
                "Missing Controller in Root/Animator",
                "Missing Cookie in Root/Child/Light",
            ]
        );
    }

    #[test]
    fn test_corrupt_object_reports_sub_path_and_unwinds() {
        let node = CompositeNode::new("Root")
            .with_facet(SerializedObject::new("Game.Spawner").corrupted("truncated"));
        let mut rows = Vec::new();
        let mut walker = Walker::new("Assets/Level.prefab", &mut rows, DEFAULT_MISSING_LABEL);
        let failure = walker.walk(Some(&Asset::Composite(node))).unwrap_err();
        assert_eq!(failure.sub_path, "Root/Spawner");
        assert!(walker.cursor().sub_path().is_empty());
    }
}
