//! Union mounts.
//!
//! A [`Union`] composes any number of tree sources into one namespace.
//! Sources are mounted at arbitrary points; mountpoints don't need to exist
//! beforehand — their ancestor directories are implied by the mount itself.
//!
//! Resolution rules:
//!
//! - Direct path conflicts resolve **last-wins**: the most recently mounted
//!   source that has an entry at the path provides it. A directory mounted
//!   later shadows a file mounted earlier at the same path, and vice versa.
//! - Directory listings are the **union** of the children of every mounted
//!   source that has a directory at the path, plus any implied mountpoint
//!   components, deduplicated and sorted for determinism.
//! - Writes and directory creation go to the most recently mounted source
//!   covering the path.

use crate::error::{Error, Result};
use crate::path::VfsPath;
use crate::tree::{display_parts, ReadHandle, TreeSource, WriteHandle};
use camino::Utf8PathBuf;
use std::collections::BTreeSet;
use std::sync::{Arc, RwLock};

struct Mount {
    at: Vec<String>,
    path: VfsPath,
}

impl Mount {
    /// If `parts` falls under this mountpoint, translate it into the
    /// mounted source.
    fn translate(&self, parts: &[String]) -> Option<VfsPath> {
        let rest = parts.strip_prefix(self.at.as_slice())?;
        Some(self.path.descend(rest))
    }

    /// Whether `parts` is a strict ancestor of this mountpoint, which makes
    /// it an implied directory.
    fn implies_dir_at(&self, parts: &[String]) -> bool {
        self.at.len() > parts.len() && self.at.starts_with(parts)
    }
}

/// An ordered composition of mounted tree sources.
#[derive(Default)]
pub struct Union {
    mounts: RwLock<Vec<Mount>>,
}

impl Union {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mount `path` at the `/`-separated mountpoint `at` (empty string for
    /// the union root). Later mounts take precedence on direct conflicts.
    pub fn mount(&self, at: &str, path: VfsPath) {
        let at: Vec<String> = at
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        tracing::debug!("Mounting {} at '{}'", path, at.join("/"));
        self.guard_mut().push(Mount { at, path });
    }

    /// Wrap this union's root in a [`VfsPath`] handle.
    pub fn root(self: Arc<Self>) -> VfsPath {
        VfsPath::root(self)
    }

    fn guard(&self) -> std::sync::RwLockReadGuard<'_, Vec<Mount>> {
        self.mounts.read().unwrap_or_else(|e| e.into_inner())
    }

    fn guard_mut(&self) -> std::sync::RwLockWriteGuard<'_, Vec<Mount>> {
        self.mounts.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl TreeSource for Union {
    fn is_dir(&self, parts: &[String]) -> bool {
        for mount in self.guard().iter().rev() {
            if mount.implies_dir_at(parts) {
                return true;
            }
            if let Some(cand) = mount.translate(parts) {
                if cand.is_dir() {
                    return true;
                }
                if cand.is_file() {
                    // a later-mounted file shadows earlier directories
                    return false;
                }
            }
        }
        false
    }

    fn is_file(&self, parts: &[String]) -> bool {
        for mount in self.guard().iter().rev() {
            if mount.implies_dir_at(parts) {
                return false;
            }
            if let Some(cand) = mount.translate(parts) {
                if cand.is_file() {
                    return true;
                }
                if cand.is_dir() {
                    return false;
                }
            }
        }
        false
    }

    fn open_read(&self, parts: &[String]) -> Result<ReadHandle> {
        for mount in self.guard().iter().rev() {
            if mount.implies_dir_at(parts) {
                return Err(Error::NotAFile(display_parts(parts)));
            }
            if let Some(cand) = mount.translate(parts) {
                if cand.is_file() {
                    return cand.open_read();
                }
                if cand.is_dir() {
                    return Err(Error::NotAFile(display_parts(parts)));
                }
            }
        }
        Err(Error::NotFound(display_parts(parts)))
    }

    fn open_write(&self, parts: &[String]) -> Result<WriteHandle> {
        for mount in self.guard().iter().rev() {
            if let Some(cand) = mount.translate(parts) {
                return cand.open_write();
            }
        }
        Err(Error::NotFound(display_parts(parts)))
    }

    fn list(&self, parts: &[String]) -> Result<Vec<String>> {
        let mut names = BTreeSet::new();
        let mut found = false;

        // reverse scan, same layering as is_dir/is_file: a file cuts off
        // every directory mounted below it
        for mount in self.guard().iter().rev() {
            if mount.implies_dir_at(parts) {
                names.insert(mount.at[parts.len()].clone());
                found = true;
                continue;
            }
            if let Some(cand) = mount.translate(parts) {
                if cand.is_dir() {
                    names.extend(cand.list()?);
                    found = true;
                } else if cand.is_file() {
                    if found {
                        break;
                    }
                    return Err(Error::NotADirectory(display_parts(parts)));
                }
            }
        }

        if !found {
            return Err(Error::NotFound(display_parts(parts)));
        }
        Ok(names.into_iter().collect())
    }

    fn mkdirs(&self, parts: &[String]) -> Result<()> {
        for mount in self.guard().iter().rev() {
            if let Some(cand) = mount.translate(parts) {
                return cand.mkdirs();
            }
        }
        Err(Error::NotFound(display_parts(parts)))
    }

    fn resolve_native(&self, parts: &[String]) -> Option<Utf8PathBuf> {
        for mount in self.guard().iter().rev() {
            if let Some(cand) = mount.translate(parts) {
                if cand.is_file() || cand.is_dir() {
                    if let Some(native) = cand.resolve_native() {
                        return Some(native);
                    }
                }
            }
        }
        None
    }

    fn resolve_native_w(&self, parts: &[String]) -> Option<Utf8PathBuf> {
        for mount in self.guard().iter().rev() {
            if let Some(cand) = mount.translate(parts) {
                if let Some(native) = cand.resolve_native_w() {
                    return Some(native);
                }
            }
        }
        None
    }
}
