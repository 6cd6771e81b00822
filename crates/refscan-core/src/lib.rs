//! Core types for refscan.
//!
//! This crate provides the data structures shared by the scanning engine and
//! its front ends: the serialized asset graph model, report rows, scan
//! configuration, and error types.

mod asset;
mod config;
mod error;
mod report;
mod row;

pub use asset::{
    Asset, AssetKind, CompositeNode, ObjectRef, PropertyKind, Scene, SerializedObject,
    SerializedProperty, VisibleProperties, nicify_name, short_type_name,
};
pub use config::{FailurePolicy, ScanConfig, ScanConfigBuilder};
pub use error::{ResolveError, ScanError, ScanWarning};
pub use report::ScanReport;
pub use row::{DEFAULT_MISSING_LABEL, ReportRow};
