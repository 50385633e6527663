//! The tree source capability set.
//!
//! Every backing store — a real directory, an in-memory tree, a mounted
//! archive, a union of other sources — implements [`TreeSource`]. Consumers
//! never see the concrete type; they hold a [`VfsPath`](crate::VfsPath)
//! pointing into an `Arc<dyn TreeSource>`.
//!
//! Paths are passed as slices of already-split segments. Segment splitting
//! and normalization happen once, in [`VfsPath::join`](crate::VfsPath::join),
//! so implementations can treat the slice as canonical.

use crate::error::Result;
use camino::Utf8PathBuf;
use std::io::{Read, Write};

/// Boxed reader returned by [`TreeSource::open_read`].
pub type ReadHandle = Box<dyn Read + Send>;

/// Boxed writer returned by [`TreeSource::open_write`].
pub type WriteHandle = Box<dyn Write + Send>;

/// A filesystem-like backing store.
///
/// The capability set mirrors what the conversion pipeline needs from both
/// its read side (source data) and its write side (converted output):
/// existence probes, byte-stream access, listing, directory creation, and
/// native-path resolution for display and for the writable-target probe.
///
/// Implementations that cannot support a capability (e.g. writes into an
/// archive) return [`Error::ReadOnly`](crate::Error::ReadOnly) or `None`
/// rather than panicking.
pub trait TreeSource: Send + Sync {
    /// Whether `parts` resolves to a directory. The empty slice is the root.
    fn is_dir(&self, parts: &[String]) -> bool;

    /// Whether `parts` resolves to a file.
    fn is_file(&self, parts: &[String]) -> bool;

    /// Open a file for reading.
    fn open_read(&self, parts: &[String]) -> Result<ReadHandle>;

    /// Open a file for writing, truncating any existing content.
    fn open_write(&self, parts: &[String]) -> Result<WriteHandle>;

    /// List the names of a directory's children.
    fn list(&self, parts: &[String]) -> Result<Vec<String>>;

    /// Create the directory and all missing ancestors.
    fn mkdirs(&self, parts: &[String]) -> Result<()>;

    /// Resolve to a native filesystem path, if the entry exists on disk.
    fn resolve_native(&self, parts: &[String]) -> Option<Utf8PathBuf>;

    /// Resolve to a native filesystem path suitable for writing.
    ///
    /// Unlike [`resolve_native`](Self::resolve_native) the target does not
    /// have to exist yet; `None` means this source can never yield a
    /// writable native location.
    fn resolve_native_w(&self, parts: &[String]) -> Option<Utf8PathBuf>;
}

/// Render segments as a display path (`a/b/c`; the root renders as `.`).
pub(crate) fn display_parts(parts: &[String]) -> String {
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}
