//! Host environment abstraction.

use refscan_core::{Asset, AssetKind, ResolveError};

/// Supplies entry points and resolves them to asset graphs.
///
/// Implementations wrap whatever owns the project's assets: an editor, an
/// asset database export, or an in-memory fixture.
pub trait AssetHost {
    /// All known asset identifiers, in enumeration order.
    fn asset_paths(&self) -> Vec<String>;

    /// Resolve an identifier as the given kind.
    ///
    /// `Ok(None)` means the asset could not be found, which the scanner
    /// records as a finding. `Err` is an unexpected failure.
    fn resolve(&self, path: &str, kind: AssetKind) -> Result<Option<Asset>, ResolveError>;
}

impl<H: AssetHost + ?Sized> AssetHost for &H {
    fn asset_paths(&self) -> Vec<String> {
        (**self).asset_paths()
    }

    fn resolve(&self, path: &str, kind: AssetKind) -> Result<Option<Asset>, ResolveError> {
        (**self).resolve(path, kind)
    }
}
