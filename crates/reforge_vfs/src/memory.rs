//! In-memory tree source.
//!
//! [`MemoryTree`] stores files as byte vectors keyed by their joined path.
//! Directories are implied by the keys, like entries in an archive's table
//! of contents. Archive adapters typically decode a container into one of
//! these and hand out its root; tests use it as a cheap writable fixture.

use crate::error::{Error, Result};
use crate::path::VfsPath;
use crate::tree::{display_parts, ReadHandle, TreeSource, WriteHandle};
use camino::Utf8PathBuf;
use std::collections::{BTreeMap, BTreeSet};
use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};

type FileMap = BTreeMap<String, Vec<u8>>;

/// A tree held entirely in memory.
#[derive(Clone, Default)]
pub struct MemoryTree {
    files: Arc<Mutex<FileMap>>,
}

impl MemoryTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file at a `/`-separated path, replacing any previous content.
    pub fn insert(&self, path: &str, bytes: impl Into<Vec<u8>>) {
        let key = path
            .split('/')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("/");
        self.lock().insert(key, bytes.into());
    }

    /// Wrap this tree's root in a [`VfsPath`] handle.
    pub fn into_path(self) -> VfsPath {
        VfsPath::root(Arc::new(self))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FileMap> {
        self.files.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn key(parts: &[String]) -> String {
        parts.join("/")
    }
}

impl TreeSource for MemoryTree {
    fn is_dir(&self, parts: &[String]) -> bool {
        if parts.is_empty() {
            return true;
        }
        let prefix = format!("{}/", Self::key(parts));
        self.lock().keys().any(|k| k.starts_with(&prefix))
    }

    fn is_file(&self, parts: &[String]) -> bool {
        self.lock().contains_key(&Self::key(parts))
    }

    fn open_read(&self, parts: &[String]) -> Result<ReadHandle> {
        let bytes = self
            .lock()
            .get(&Self::key(parts))
            .cloned()
            .ok_or_else(|| Error::NotFound(display_parts(parts)))?;
        Ok(Box::new(Cursor::new(bytes)))
    }

    fn open_write(&self, parts: &[String]) -> Result<WriteHandle> {
        Ok(Box::new(MemoryWriter {
            key: Self::key(parts),
            buf: Vec::new(),
            files: Arc::clone(&self.files),
        }))
    }

    fn list(&self, parts: &[String]) -> Result<Vec<String>> {
        let prefix = if parts.is_empty() {
            String::new()
        } else {
            format!("{}/", Self::key(parts))
        };
        let mut names = BTreeSet::new();
        for key in self.lock().keys() {
            let Some(rest) = key.strip_prefix(&prefix) else {
                continue;
            };
            if let Some(first) = rest.split('/').next() {
                if !first.is_empty() {
                    names.insert(first.to_string());
                }
            }
        }
        if names.is_empty() && !self.is_dir(parts) {
            return Err(Error::NotFound(display_parts(parts)));
        }
        Ok(names.into_iter().collect())
    }

    fn mkdirs(&self, _parts: &[String]) -> Result<()> {
        // directories are implied by file keys
        Ok(())
    }

    fn resolve_native(&self, _parts: &[String]) -> Option<Utf8PathBuf> {
        None
    }

    fn resolve_native_w(&self, _parts: &[String]) -> Option<Utf8PathBuf> {
        None
    }
}

/// Write handle that commits its buffer into the tree when dropped.
struct MemoryWriter {
    key: String,
    buf: Vec<u8>,
    files: Arc<Mutex<FileMap>>,
}

impl Write for MemoryWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buf.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let mut files = self.files.lock().unwrap_or_else(|e| e.into_inner());
        files.insert(self.key.clone(), self.buf.clone());
        Ok(())
    }
}

impl Drop for MemoryWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}
