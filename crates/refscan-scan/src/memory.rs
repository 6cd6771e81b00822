//! In-memory asset host, loadable from a JSON project manifest.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use refscan_core::{Asset, AssetKind, ResolveError};

use crate::host::AssetHost;

/// A project manifest: the asset table a host exposes, in enumeration order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectManifest {
    /// Entries in enumeration order.
    #[serde(default)]
    pub assets: Vec<ManifestEntry>,
}

/// One manifest entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Asset identifier.
    pub path: String,

    /// Resolved asset graph; absent or `null` when the asset cannot be found.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset: Option<Asset>,

    /// Simulated resolution failure. Takes precedence over `asset`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
enum Entry {
    Present(Asset),
    NotFound,
    Failing(String),
}

/// Asset host backed by an ordered in-memory table.
///
/// Resolution is typed: an asset whose stored shape differs from the
/// requested kind does not resolve.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHost {
    entries: IndexMap<String, Entry>,
}

impl InMemoryHost {
    /// Create an empty host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an asset.
    pub fn insert(&mut self, path: impl Into<String>, asset: Asset) -> &mut Self {
        self.entries.insert(path.into(), Entry::Present(asset));
        self
    }

    /// Add an identifier that resolves to nothing.
    pub fn insert_not_found(&mut self, path: impl Into<String>) -> &mut Self {
        self.entries.insert(path.into(), Entry::NotFound);
        self
    }

    /// Add an identifier whose resolution fails.
    pub fn insert_failure(
        &mut self,
        path: impl Into<String>,
        message: impl Into<String>,
    ) -> &mut Self {
        self.entries.insert(path.into(), Entry::Failing(message.into()));
        self
    }

    /// Number of known identifiers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the host has no identifiers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a host from a parsed manifest.
    pub fn from_manifest(manifest: ProjectManifest) -> Self {
        let mut host = Self::new();
        for entry in manifest.assets {
            match (entry.error, entry.asset) {
                (Some(message), _) => host.insert_failure(entry.path, message),
                (None, Some(asset)) => host.insert(entry.path, asset),
                (None, None) => host.insert_not_found(entry.path),
            };
        }
        host
    }

    /// Parse a manifest from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, ResolveError> {
        let manifest: ProjectManifest = serde_json::from_str(json).map_err(parse_error)?;
        Ok(Self::from_manifest(manifest))
    }

    /// Parse a manifest from a reader.
    pub fn from_reader(reader: impl Read) -> Result<Self, ResolveError> {
        let manifest: ProjectManifest = serde_json::from_reader(reader).map_err(parse_error)?;
        Ok(Self::from_manifest(manifest))
    }

    /// Load a manifest from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ResolveError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ResolveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(BufReader::new(file))
    }
}

fn parse_error(err: serde_json::Error) -> ResolveError {
    ResolveError::Parse {
        message: err.to_string(),
    }
}

impl AssetHost for InMemoryHost {
    fn asset_paths(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn resolve(&self, path: &str, kind: AssetKind) -> Result<Option<Asset>, ResolveError> {
        match self.entries.get(path) {
            Some(Entry::Present(asset)) if asset.kind() == kind => Ok(Some(asset.clone())),
            Some(Entry::Present(_)) => Ok(None),
            Some(Entry::NotFound) | None => Ok(None),
            Some(Entry::Failing(message)) => Err(ResolveError::Other {
                message: message.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use refscan_core::CompositeNode;

    #[test]
    fn test_enumeration_order_is_insertion_order() {
        let mut host = InMemoryHost::new();
        host.insert_not_found("Assets/Z.asset")
            .insert("Assets/A.prefab", Asset::Composite(CompositeNode::new("A")))
            .insert_failure("Assets/M.mat", "bad");

        assert_eq!(
            host.asset_paths(),
            vec!["Assets/Z.asset", "Assets/A.prefab", "Assets/M.mat"]
        );
    }

    #[test]
    fn test_resolve_variants() {
        let mut host = InMemoryHost::new();
        host.insert("Assets/A.prefab", Asset::Composite(CompositeNode::new("A")))
            .insert_failure("Assets/M.mat", "bad");

        assert!(host.resolve("Assets/A.prefab", AssetKind::Composite).unwrap().is_some());
        assert!(host.resolve("Assets/A.prefab", AssetKind::Object).unwrap().is_none());
        assert!(host.resolve("Assets/A.prefab", AssetKind::Scene).unwrap().is_none());
        assert!(host.resolve("Assets/Unknown.prefab", AssetKind::Composite).unwrap().is_none());
        assert!(host.resolve("Assets/M.mat", AssetKind::Object).is_err());
    }

    #[test]
    fn test_from_json_str() {
        let json = r#"{
            "assets": [
                {"path": "Assets/Hero.prefab", "asset": {"shape": "composite", "name": "Hero"}},
                {"path": "Assets/Gone.asset", "asset": null},
                {"path": "Assets/Broken.mat", "error": "unexpected end of file"}
            ]
        }"#;
        let host = InMemoryHost::from_json_str(json).unwrap();
        assert_eq!(host.len(), 3);
        assert!(host.resolve("Assets/Gone.asset", AssetKind::Object).unwrap().is_none());
        assert!(matches!(
            host.resolve("Assets/Broken.mat", AssetKind::Object),
            Err(ResolveError::Other { .. })
        ));
    }

    #[test]
    fn test_from_json_str_rejects_garbage() {
        assert!(matches!(
            InMemoryHost::from_json_str("{ not json"),
            Err(ResolveError::Parse { .. })
        ));
    }
}
