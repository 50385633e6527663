//! Real-directory tree source.
//!
//! [`Directory`] exposes a directory on the native filesystem through the
//! [`TreeSource`] capability set. The optional case-ignoring mode resolves
//! every path component case-insensitively against the actual directory
//! entries — game data frequently ships with inconsistent casing (`Data/`
//! vs `DATA/`), and the media path tables declare one canonical spelling.

use crate::error::{Error, Result};
use crate::path::VfsPath;
use crate::tree::{display_parts, ReadHandle, TreeSource, WriteHandle};
use camino::{Utf8Path, Utf8PathBuf};
use std::fs;
use std::sync::Arc;

/// A tree source backed by a native directory.
pub struct Directory {
    root: Utf8PathBuf,
    case_ignoring: bool,
}

impl Directory {
    /// Open an existing native directory with exact component matching.
    pub fn new(root: impl Into<Utf8PathBuf>) -> Result<Self> {
        Self::open(root.into(), false)
    }

    /// Open an existing native directory, resolving each path component
    /// case-insensitively when no exact match exists.
    pub fn case_ignoring(root: impl Into<Utf8PathBuf>) -> Result<Self> {
        Self::open(root.into(), true)
    }

    fn open(root: Utf8PathBuf, case_ignoring: bool) -> Result<Self> {
        if !root.as_std_path().is_dir() {
            return Err(Error::NotADirectory(root.into_string()));
        }
        Ok(Self {
            root,
            case_ignoring,
        })
    }

    /// Wrap this source's root in a [`VfsPath`] handle.
    pub fn into_path(self) -> VfsPath {
        VfsPath::root(Arc::new(self))
    }

    /// Resolve segments to an existing native path, or `None`.
    fn resolve(&self, parts: &[String]) -> Option<Utf8PathBuf> {
        let mut current = self.root.clone();
        for seg in parts {
            let exact = current.join(seg);
            if exact.as_std_path().exists() {
                current = exact;
                continue;
            }
            if !self.case_ignoring {
                return None;
            }
            current = match_component_ignoring_case(&current, seg)?;
        }
        Some(current)
    }

    /// Resolve segments for a write: follow existing components (honoring
    /// case-ignoring mode), then append the remainder verbatim.
    fn resolve_for_write(&self, parts: &[String]) -> Utf8PathBuf {
        let mut current = self.root.clone();
        for (idx, seg) in parts.iter().enumerate() {
            let exact = current.join(seg);
            if exact.as_std_path().exists() {
                current = exact;
                continue;
            }
            if self.case_ignoring {
                if let Some(matched) = match_component_ignoring_case(&current, seg) {
                    current = matched;
                    continue;
                }
            }
            // nothing on disk from here on; keep the requested spelling
            current = exact;
            for rest in &parts[idx + 1..] {
                current.push(rest);
            }
            break;
        }
        current
    }
}

/// Scan `dir` for an entry whose name matches `seg` ignoring ASCII case.
fn match_component_ignoring_case(dir: &Utf8Path, seg: &str) -> Option<Utf8PathBuf> {
    let entries = fs::read_dir(dir.as_std_path()).ok()?;
    for entry in entries.flatten() {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if name.eq_ignore_ascii_case(seg) {
            return Some(dir.join(name));
        }
    }
    None
}

impl TreeSource for Directory {
    fn is_dir(&self, parts: &[String]) -> bool {
        self.resolve(parts)
            .is_some_and(|p| p.as_std_path().is_dir())
    }

    fn is_file(&self, parts: &[String]) -> bool {
        self.resolve(parts)
            .is_some_and(|p| p.as_std_path().is_file())
    }

    fn open_read(&self, parts: &[String]) -> Result<ReadHandle> {
        let native = self
            .resolve(parts)
            .ok_or_else(|| Error::NotFound(display_parts(parts)))?;
        if !native.as_std_path().is_file() {
            return Err(Error::NotAFile(display_parts(parts)));
        }
        Ok(Box::new(fs::File::open(native.as_std_path())?))
    }

    fn open_write(&self, parts: &[String]) -> Result<WriteHandle> {
        let native = self.resolve_for_write(parts);
        Ok(Box::new(fs::File::create(native.as_std_path())?))
    }

    fn list(&self, parts: &[String]) -> Result<Vec<String>> {
        let native = self
            .resolve(parts)
            .ok_or_else(|| Error::NotFound(display_parts(parts)))?;
        if !native.as_std_path().is_dir() {
            return Err(Error::NotADirectory(display_parts(parts)));
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(native.as_std_path())? {
            let entry = entry?;
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(name) => {
                    tracing::warn!("Skipping non-UTF-8 entry: {:?}", name);
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn mkdirs(&self, parts: &[String]) -> Result<()> {
        let native = self.resolve_for_write(parts);
        fs::create_dir_all(native.as_std_path())?;
        Ok(())
    }

    fn resolve_native(&self, parts: &[String]) -> Option<Utf8PathBuf> {
        self.resolve(parts)
    }

    fn resolve_native_w(&self, parts: &[String]) -> Option<Utf8PathBuf> {
        Some(self.resolve_for_write(parts))
    }
}
