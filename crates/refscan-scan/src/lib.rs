//! Missing reference scanning engine for refscan.
//!
//! Walks every serialized object graph a host exposes and reports
//! object-reference properties whose target no longer exists but which
//! still carry a stored reference id.
//!
//! # Overview
//!
//! - [`SubPath`] tracks the slash-joined location during traversal
//! - [`is_missing`] classifies a single property
//! - [`Walker`] visits scenes, composite nodes and objects depth-first
//! - [`MissingReferenceScanner`] enumerates entry points, dispatches them to
//!   the walker, and reports progress
//!
//! # Example
//!
//! ```rust
//! use refscan_scan::{
//!     Asset, CompositeNode, InMemoryHost, MissingReferenceScanner, SerializedObject,
//!     SerializedProperty,
//! };
//!
//! let mut host = InMemoryHost::new();
//! host.insert(
//!     "Assets/Hero.prefab",
//!     Asset::Composite(CompositeNode::new("Hero").with_facet(
//!         SerializedObject::new("UnityEngine.MeshRenderer")
//!             .with_properties(vec![SerializedProperty::dangling("m_Material", 42)]),
//!     )),
//! );
//!
//! let report = MissingReferenceScanner::new().scan(&host).unwrap();
//! assert_eq!(report.rows[0].description(), "Missing Material in Hero/MeshRenderer");
//! ```
//!
//! # Progress Monitoring
//!
//! Pass a callback to [`MissingReferenceScanner::scan_with_progress`], or
//! subscribe to the broadcast channel:
//!
//! ```rust,no_run
//! use refscan_scan::{InMemoryHost, MissingReferenceScanner};
//! use tokio::sync::broadcast::error::TryRecvError;
//!
//! let scanner = MissingReferenceScanner::new();
//! let mut progress_rx = scanner.subscribe();
//! scanner.scan(&InMemoryHost::new()).unwrap();
//! loop {
//!     match progress_rx.try_recv() {
//!         Ok(progress) => {
//!             println!("{} ({:.0}%)", progress.current_path, progress.percentage())
//!         }
//!         // The channel keeps the latest 100 events; older ones are dropped.
//!         Err(TryRecvError::Lagged(_)) => continue,
//!         Err(_) => break,
//!     }
//! }
//! ```

mod classify;
mod host;
mod memory;
mod progress;
mod scanner;
mod tracker;
mod walker;

pub use classify::is_missing;
pub use host::AssetHost;
pub use memory::{InMemoryHost, ManifestEntry, ProjectManifest};
pub use progress::ScanProgress;
pub use scanner::MissingReferenceScanner;
pub use tracker::SubPath;
pub use walker::{ScanCursor, WalkFailure, Walker};

pub use tokio_util::sync::CancellationToken;

// Re-export core types for convenience
pub use refscan_core::{
    Asset, AssetKind, CompositeNode, FailurePolicy, ReportRow, ResolveError, ScanConfig,
    ScanError, ScanReport, ScanWarning, Scene, SerializedObject, SerializedProperty,
};
