//! Scan orchestration over every entry point a host exposes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use globset::{Glob, GlobSet, GlobSetBuilder};
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use refscan_core::{FailurePolicy, ScanConfig, ScanError, ScanReport, ScanWarning};

use crate::host::AssetHost;
use crate::progress::ScanProgress;
use crate::walker::{WalkFailure, Walker};

/// Finds missing references across a host's assets.
///
/// One scanner runs at most one scan at a time; a concurrent or re-entrant
/// call fails with [`ScanError::AlreadyRunning`].
pub struct MissingReferenceScanner {
    config: ScanConfig,
    excludes: GlobSet,
    progress_tx: broadcast::Sender<ScanProgress>,
    active: AtomicBool,
}

impl MissingReferenceScanner {
    /// Create a scanner with the default configuration.
    pub fn new() -> Self {
        let (progress_tx, _) = broadcast::channel(100);
        Self {
            config: ScanConfig::default(),
            excludes: GlobSet::empty(),
            progress_tx,
            active: AtomicBool::new(false),
        }
    }

    /// Create a scanner with a custom configuration.
    pub fn with_config(config: ScanConfig) -> Result<Self, ScanError> {
        let excludes = build_excludes(&config.exclude_patterns)?;
        let (progress_tx, _) = broadcast::channel(100);
        Ok(Self {
            config,
            excludes,
            progress_tx,
            active: AtomicBool::new(false),
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Subscribe to scan progress updates.
    pub fn subscribe(&self) -> broadcast::Receiver<ScanProgress> {
        self.progress_tx.subscribe()
    }

    /// Check if an entry point is scanned under this configuration.
    pub fn is_eligible(&self, path: &str) -> bool {
        self.config.is_under_root(path) && !self.excludes.is_match(path)
    }

    /// Scan every eligible entry point.
    pub fn scan<H: AssetHost + ?Sized>(&self, host: &H) -> Result<ScanReport, ScanError> {
        self.scan_with_cancel(host, |_| {}, &CancellationToken::new())
    }

    /// Scan, invoking `on_progress` before each entry point.
    pub fn scan_with_progress<H, F>(
        &self,
        host: &H,
        on_progress: F,
    ) -> Result<ScanReport, ScanError>
    where
        H: AssetHost + ?Sized,
        F: FnMut(&ScanProgress),
    {
        self.scan_with_cancel(host, on_progress, &CancellationToken::new())
    }

    /// Scan with progress and cancellation.
    ///
    /// The token is checked before each eligible entry point; an asset
    /// already being walked always finishes.
    pub fn scan_with_cancel<H, F>(
        &self,
        host: &H,
        mut on_progress: F,
        cancel: &CancellationToken,
    ) -> Result<ScanReport, ScanError>
    where
        H: AssetHost + ?Sized,
        F: FnMut(&ScanProgress),
    {
        let _guard = ActiveGuard::acquire(&self.active).ok_or(ScanError::AlreadyRunning)?;

        let start = Instant::now();
        let paths = host.asset_paths();
        let total = paths.len();

        info!(total, root = %self.config.content_root, "Starting missing reference scan");

        let mut rows = Vec::new();
        let mut warnings = Vec::new();
        let mut scanned = 0usize;
        let mut filtered = 0usize;

        for (index, path) in paths.iter().enumerate() {
            if !self.is_eligible(path) {
                filtered += 1;
                continue;
            }

            if cancel.is_cancelled() {
                info!(completed = scanned, position = index, total, "Scan cancelled");
                return Err(ScanError::Cancelled {
                    completed: scanned,
                    total,
                });
            }

            let progress = ScanProgress {
                current_path: path.clone(),
                index,
                total,
                findings: rows.len(),
                elapsed: start.elapsed(),
            };
            on_progress(&progress);
            let _ = self.progress_tx.send(progress);

            let kind = self.config.kind_for(path);
            debug!(path = %path, %kind, "Scanning entry point");

            let mark = rows.len();
            let outcome = match host.resolve(path, kind) {
                Ok(asset) => {
                    let mut walker =
                        Walker::new(path.as_str(), &mut rows, &self.config.missing_object_label);
                    walker.walk(asset.as_ref())
                }
                Err(source) => Err(WalkFailure {
                    sub_path: String::new(),
                    source,
                }),
            };

            if let Err(failure) = outcome {
                match self.config.failure_policy {
                    FailurePolicy::Abort => {
                        return Err(ScanError::Resolve {
                            asset_path: path.clone(),
                            sub_path: failure.sub_path,
                            source: failure.source,
                        });
                    }
                    FailurePolicy::Skip => {
                        rows.truncate(mark);
                        warn!(
                            path = %path,
                            sub_path = %failure.sub_path,
                            error = %failure.source,
                            "Skipping asset after resolution failure"
                        );
                        warnings.push(ScanWarning::skipped(
                            path.as_str(),
                            failure.sub_path,
                            &failure.source,
                        ));
                        continue;
                    }
                }
            }

            scanned += 1;
        }

        info!(
            scanned,
            findings = rows.len(),
            skipped = warnings.len(),
            "Missing reference scan finished"
        );

        Ok(ScanReport::new(
            rows,
            scanned,
            filtered,
            warnings,
            start.elapsed(),
        ))
    }
}

impl Default for MissingReferenceScanner {
    fn default() -> Self {
        Self::new()
    }
}

fn build_excludes(patterns: &[String]) -> Result<GlobSet, ScanError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ScanError::InvalidConfig {
            message: format!("invalid exclude pattern '{pattern}': {e}"),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ScanError::InvalidConfig {
        message: e.to_string(),
    })
}

/// Marks a scanner busy for the lifetime of one scan.
struct ActiveGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> ActiveGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryHost;
    use refscan_core::{Asset, CompositeNode, SerializedObject, SerializedProperty};

    fn host_with_one_finding() -> InMemoryHost {
        let mut host = InMemoryHost::new();
        host.insert(
            "Assets/Hero.prefab",
            Asset::Composite(CompositeNode::new("Hero").with_facet(
                SerializedObject::new("UnityEngine.SpriteRenderer")
                    .with_properties(vec![SerializedProperty::dangling("m_Sprite", 21)]),
            )),
        );
        host
    }

    #[test]
    fn test_basic_scan() {
        let scanner = MissingReferenceScanner::new();
        let report = scanner.scan(&host_with_one_finding()).unwrap();

        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].description(), "Missing Sprite in Hero/SpriteRenderer");
        assert_eq!(report.assets_scanned, 1);
    }

    #[test]
    fn test_invalid_exclude_pattern() {
        let config = ScanConfig::builder()
            .exclude_patterns(vec!["Assets/[".to_string()])
            .build()
            .unwrap();
        assert!(matches!(
            MissingReferenceScanner::with_config(config),
            Err(ScanError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_guard_releases_after_scan() {
        let scanner = MissingReferenceScanner::new();
        let host = host_with_one_finding();
        assert!(scanner.scan(&host).is_ok());
        assert!(scanner.scan(&host).is_ok());
    }

    #[test]
    fn test_progress_is_broadcast() {
        let scanner = MissingReferenceScanner::new();
        let mut rx = scanner.subscribe();
        scanner.scan(&host_with_one_finding()).unwrap();

        let progress = rx.try_recv().unwrap();
        assert_eq!(progress.current_path, "Assets/Hero.prefab");
        assert_eq!(progress.index, 0);
    }
}
