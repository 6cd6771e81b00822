//! Scan configuration types.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::asset::AssetKind;
use crate::row::DEFAULT_MISSING_LABEL;

/// What to do when an entry point fails to resolve unexpectedly.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailurePolicy {
    /// Abort the whole scan and publish no rows.
    #[default]
    Abort,
    /// Drop the failing asset's rows, record a warning, and continue.
    Skip,
}

/// Configuration for a missing reference scan.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ScanConfig {
    /// Only entry points under this root are scanned.
    #[builder(default = "\"Assets\".to_string()")]
    #[serde(default = "default_content_root")]
    pub content_root: String,

    /// Suffix of scene entry points.
    #[builder(default = "\".unity\".to_string()")]
    #[serde(default = "default_scene_extension")]
    pub scene_extension: String,

    /// Suffix of composite (prefab) entry points.
    #[builder(default = "\".prefab\".to_string()")]
    #[serde(default = "default_composite_extension")]
    pub composite_extension: String,

    /// Name recorded when an object itself is missing.
    #[builder(default = "DEFAULT_MISSING_LABEL.to_string()")]
    #[serde(default = "default_missing_label")]
    pub missing_object_label: String,

    /// Behavior on unexpected resolution failures.
    #[builder(default)]
    #[serde(default)]
    pub failure_policy: FailurePolicy,

    /// Glob patterns of entry points to skip.
    #[builder(default)]
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

fn default_content_root() -> String {
    "Assets".to_string()
}

fn default_scene_extension() -> String {
    ".unity".to_string()
}

fn default_composite_extension() -> String {
    ".prefab".to_string()
}

fn default_missing_label() -> String {
    DEFAULT_MISSING_LABEL.to_string()
}

impl ScanConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref root) = self.content_root {
            if root.is_empty() {
                return Err("Content root cannot be empty".to_string());
            }
        }
        let scene = self.scene_extension.as_deref().unwrap_or(".unity");
        let composite = self.composite_extension.as_deref().unwrap_or(".prefab");
        if scene.is_empty() || composite.is_empty() {
            return Err("Asset extensions cannot be empty".to_string());
        }
        if scene == composite {
            return Err("Scene and composite extensions must differ".to_string());
        }
        Ok(())
    }
}

impl ScanConfig {
    /// Create a new scan config builder.
    pub fn builder() -> ScanConfigBuilder {
        ScanConfigBuilder::default()
    }

    /// Create a config with defaults and the given content root.
    pub fn new(content_root: impl Into<String>) -> Self {
        Self {
            content_root: content_root.into(),
            scene_extension: default_scene_extension(),
            composite_extension: default_composite_extension(),
            missing_object_label: default_missing_label(),
            failure_policy: FailurePolicy::Abort,
            exclude_patterns: Vec::new(),
        }
    }

    /// Check if a path lies under the content root.
    pub fn is_under_root(&self, path: &str) -> bool {
        let root = self.content_root.trim_end_matches('/');
        match path.strip_prefix(root) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    /// Pick the resolution kind for an entry point from its suffix.
    pub fn kind_for(&self, path: &str) -> AssetKind {
        if path.ends_with(&self.scene_extension) {
            AssetKind::Scene
        } else if path.ends_with(&self.composite_extension) {
            AssetKind::Composite
        } else {
            AssetKind::Object
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(default_content_root())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = ScanConfig::builder()
            .content_root("Content")
            .failure_policy(FailurePolicy::Skip)
            .exclude_patterns(vec!["**/*.png".to_string()])
            .build()
            .unwrap();

        assert_eq!(config.content_root, "Content");
        assert_eq!(config.scene_extension, ".unity");
        assert_eq!(config.failure_policy, FailurePolicy::Skip);
        assert_eq!(config.exclude_patterns.len(), 1);
    }

    #[test]
    fn test_builder_rejects_empty_root() {
        assert!(ScanConfig::builder().content_root("").build().is_err());
    }

    #[test]
    fn test_builder_rejects_same_extensions() {
        let result = ScanConfig::builder()
            .scene_extension(".asset")
            .composite_extension(".asset")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_is_under_root() {
        let config = ScanConfig::default();
        assert!(config.is_under_root("Assets/Scenes/Main.unity"));
        assert!(config.is_under_root("Assets"));
        assert!(!config.is_under_root("AssetsBackup/Main.unity"));
        assert!(!config.is_under_root("Packages/com.foo/Thing.prefab"));
    }

    #[test]
    fn test_kind_for() {
        let config = ScanConfig::default();
        assert_eq!(config.kind_for("Assets/Main.unity"), AssetKind::Scene);
        assert_eq!(config.kind_for("Assets/Hero.prefab"), AssetKind::Composite);
        assert_eq!(config.kind_for("Assets/Hero.mat"), AssetKind::Object);
    }

    #[test]
    fn test_failure_policy_parse() {
        assert_eq!("skip".parse::<FailurePolicy>().unwrap(), FailurePolicy::Skip);
        assert_eq!(FailurePolicy::Abort.to_string(), "abort");
    }
}
