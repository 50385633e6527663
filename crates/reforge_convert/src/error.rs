//! Error types for the conversion core.
//!
//! The taxonomy distinguishes fatal resolution errors (a declared media
//! path is missing), fatal configuration errors (no writable output
//! location), and adapter failures surfaced at the archive seam. Recoverable
//! anomalies — unparsable version markers, unsupported editions — are
//! logged and handled in place, never raised.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during mount resolution and invalidation.
#[derive(Error, Debug)]
pub enum Error {
    /// Filesystem I/O failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error from the underlying tree layer.
    #[error(transparent)]
    Vfs(#[from] reforge_vfs::Error),

    /// A declared media path resolves to neither a file nor a directory.
    /// Mount resolution aborts on the first occurrence; no partial tree is
    /// ever returned.
    #[error("media at path {0} could not be found")]
    MissingMedia(String),

    /// The output tree cannot yield any writable native path. This is an
    /// environment misconfiguration the caller must fix, not a retryable
    /// condition.
    #[error("could not resolve a writable asset path in {0}")]
    NoWritableTarget(String),

    /// The archive adapter failed to open a packed container.
    #[error("archive error: {0}")]
    Archive(String),

    /// Error reported by the conversion driver.
    #[error("conversion driver error: {0}")]
    Driver(String),
}
