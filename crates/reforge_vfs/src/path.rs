//! Cheap, cloneable handles into a tree source.

use crate::error::Result;
use crate::tree::{display_parts, ReadHandle, TreeSource, WriteHandle};
use camino::Utf8PathBuf;
use std::fmt;
use std::io::Read as _;
use std::sync::Arc;

/// A location inside some [`TreeSource`].
///
/// A `VfsPath` is a shared reference to the source plus an owned segment
/// vector; cloning and joining are cheap and never touch the underlying
/// store. All actual I/O delegates to the source.
#[derive(Clone)]
pub struct VfsPath {
    source: Arc<dyn TreeSource>,
    parts: Vec<String>,
}

impl VfsPath {
    /// The root of `source`.
    pub fn root(source: Arc<dyn TreeSource>) -> Self {
        Self {
            source,
            parts: Vec::new(),
        }
    }

    /// Append a sub-path.
    ///
    /// `sub` may contain `/` separators. Empty and `.` segments are dropped;
    /// `..` is not supported by the virtual namespace and is dropped as well.
    pub fn join(&self, sub: &str) -> Self {
        let mut parts = self.parts.clone();
        for seg in sub.split('/') {
            if seg.is_empty() || seg == "." || seg == ".." {
                continue;
            }
            parts.push(seg.to_string());
        }
        Self {
            source: Arc::clone(&self.source),
            parts,
        }
    }

    /// Append already-split segments.
    pub fn descend(&self, sub: &[String]) -> Self {
        let mut parts = self.parts.clone();
        parts.extend_from_slice(sub);
        Self {
            source: Arc::clone(&self.source),
            parts,
        }
    }

    /// The parent location, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        if self.parts.is_empty() {
            return None;
        }
        Some(Self {
            source: Arc::clone(&self.source),
            parts: self.parts[..self.parts.len() - 1].to_vec(),
        })
    }

    /// The path segments, root first.
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// The final segment, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.parts.last().map(String::as_str)
    }

    /// The final segment's extension, lowercased, without the dot.
    pub fn extension(&self) -> Option<String> {
        let name = self.file_name()?;
        let (stem, ext) = name.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    pub fn is_dir(&self) -> bool {
        self.source.is_dir(&self.parts)
    }

    pub fn is_file(&self) -> bool {
        self.source.is_file(&self.parts)
    }

    pub fn open_read(&self) -> Result<ReadHandle> {
        self.source.open_read(&self.parts)
    }

    pub fn open_write(&self) -> Result<WriteHandle> {
        self.source.open_write(&self.parts)
    }

    pub fn list(&self) -> Result<Vec<String>> {
        self.source.list(&self.parts)
    }

    pub fn mkdirs(&self) -> Result<()> {
        self.source.mkdirs(&self.parts)
    }

    pub fn resolve_native(&self) -> Option<Utf8PathBuf> {
        self.source.resolve_native(&self.parts)
    }

    pub fn resolve_native_w(&self) -> Option<Utf8PathBuf> {
        self.source.resolve_native_w(&self.parts)
    }

    /// Read the whole file into a string. Convenience for small text files
    /// such as version markers.
    pub fn read_to_string(&self) -> Result<String> {
        let mut handle = self.open_read()?;
        let mut out = String::new();
        handle.read_to_string(&mut out)?;
        Ok(out)
    }
}

impl fmt::Display for VfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&display_parts(&self.parts))
    }
}

impl fmt::Debug for VfsPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VfsPath({})", display_parts(&self.parts))
    }
}

#[cfg(test)]
mod tests {
    use crate::memory::MemoryTree;

    #[test]
    fn test_join_normalizes_segments() {
        let root = MemoryTree::new().into_path();
        let path = root.join("a//b/./c");
        assert_eq!(path.parts(), ["a", "b", "c"]);
        assert_eq!(path.to_string(), "a/b/c");
    }

    #[test]
    fn test_join_drops_parent_references() {
        let root = MemoryTree::new().into_path();
        let path = root.join("a/../b");
        assert_eq!(path.parts(), ["a", "b"]);
    }

    #[test]
    fn test_parent_and_file_name() {
        let root = MemoryTree::new().into_path();
        let path = root.join("data/graphics.drs");
        assert_eq!(path.file_name(), Some("graphics.drs"));
        assert_eq!(path.parent().unwrap().to_string(), "data");
        assert!(root.parent().is_none());
    }

    #[test]
    fn test_extension_is_lowercased() {
        let root = MemoryTree::new().into_path();
        assert_eq!(root.join("x/SOUNDS.DRS").extension().as_deref(), Some("drs"));
        assert_eq!(root.join("x/noext").extension(), None);
        // a leading dot is a hidden file, not an extension
        assert_eq!(root.join("x/.hidden").extension(), None);
    }

    #[test]
    fn test_root_displays_as_dot() {
        let root = MemoryTree::new().into_path();
        assert_eq!(root.to_string(), ".");
    }
}
