//! Cross-cutting decorators around tree sources.
//!
//! These wrap an existing [`VfsPath`] subtree and re-expose it as a new
//! root with extra behavior layered on top. They are decorators, not new
//! tree types — every operation ultimately lands on the wrapped source.

use crate::error::{Error, Result};
use crate::path::VfsPath;
use crate::tree::{display_parts, ReadHandle, TreeSource, WriteHandle};
use camino::Utf8PathBuf;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Shared lock used by [`Synchronizer`] wrappers.
pub type AccessLock = Arc<RwLock<()>>;

/// Makes a tree safe for a multi-worker consumer.
///
/// Read operations take the shared guard and proceed concurrently;
/// operations that mutate directory structure (`open_write`, `mkdirs`) take
/// the exclusive guard and are serialized. The `RwLock` release/acquire on
/// the exclusive guard is what makes a structural mutation visible to every
/// subsequently scheduled read under the same lock.
///
/// Two wrappers can share one [`AccessLock`] (via [`with_lock`](Self::with_lock))
/// so that a read tree and a write tree are serialized against each other
/// process-wide.
///
/// Note that the exclusive guard is held only while the operation itself
/// runs; bytes streamed through an already-opened handle are not locked.
/// Workers writing to distinct files therefore proceed in parallel once
/// their files exist.
pub struct Synchronizer {
    inner: VfsPath,
    lock: AccessLock,
}

impl Synchronizer {
    /// Wrap `inner` with a fresh lock.
    pub fn new(inner: VfsPath) -> Self {
        Self::with_lock(inner, Arc::new(RwLock::new(())))
    }

    /// Wrap `inner` with a caller-provided lock, shared with other wrappers.
    pub fn with_lock(inner: VfsPath, lock: AccessLock) -> Self {
        Self { inner, lock }
    }

    /// Wrap this synchronizer's root in a [`VfsPath`] handle.
    pub fn into_path(self) -> VfsPath {
        VfsPath::root(Arc::new(self))
    }

    fn shared(&self) -> RwLockReadGuard<'_, ()> {
        self.lock.read().unwrap_or_else(|e| e.into_inner())
    }

    fn exclusive(&self) -> RwLockWriteGuard<'_, ()> {
        self.lock.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl TreeSource for Synchronizer {
    fn is_dir(&self, parts: &[String]) -> bool {
        let _guard = self.shared();
        self.inner.descend(parts).is_dir()
    }

    fn is_file(&self, parts: &[String]) -> bool {
        let _guard = self.shared();
        self.inner.descend(parts).is_file()
    }

    fn open_read(&self, parts: &[String]) -> Result<ReadHandle> {
        let _guard = self.shared();
        self.inner.descend(parts).open_read()
    }

    fn open_write(&self, parts: &[String]) -> Result<WriteHandle> {
        let _guard = self.exclusive();
        self.inner.descend(parts).open_write()
    }

    fn list(&self, parts: &[String]) -> Result<Vec<String>> {
        let _guard = self.shared();
        self.inner.descend(parts).list()
    }

    fn mkdirs(&self, parts: &[String]) -> Result<()> {
        let _guard = self.exclusive();
        self.inner.descend(parts).mkdirs()
    }

    fn resolve_native(&self, parts: &[String]) -> Option<Utf8PathBuf> {
        let _guard = self.shared();
        self.inner.descend(parts).resolve_native()
    }

    fn resolve_native_w(&self, parts: &[String]) -> Option<Utf8PathBuf> {
        let _guard = self.shared();
        self.inner.descend(parts).resolve_native_w()
    }
}

/// Creates missing parent directories before every file write.
///
/// Output paths mirror source paths the converter discovered lazily, so the
/// directory skeleton doesn't exist ahead of time.
pub struct DirectoryCreator {
    inner: VfsPath,
}

impl DirectoryCreator {
    pub fn new(inner: VfsPath) -> Self {
        Self { inner }
    }

    /// Wrap this creator's root in a [`VfsPath`] handle.
    pub fn into_path(self) -> VfsPath {
        VfsPath::root(Arc::new(self))
    }
}

impl TreeSource for DirectoryCreator {
    fn is_dir(&self, parts: &[String]) -> bool {
        self.inner.descend(parts).is_dir()
    }

    fn is_file(&self, parts: &[String]) -> bool {
        self.inner.descend(parts).is_file()
    }

    fn open_read(&self, parts: &[String]) -> Result<ReadHandle> {
        self.inner.descend(parts).open_read()
    }

    fn open_write(&self, parts: &[String]) -> Result<WriteHandle> {
        let target = self.inner.descend(parts);
        if let Some(parent) = target.parent() {
            parent.mkdirs()?;
        }
        target.open_write()
    }

    fn list(&self, parts: &[String]) -> Result<Vec<String>> {
        self.inner.descend(parts).list()
    }

    fn mkdirs(&self, parts: &[String]) -> Result<()> {
        self.inner.descend(parts).mkdirs()
    }

    fn resolve_native(&self, parts: &[String]) -> Option<Utf8PathBuf> {
        self.inner.descend(parts).resolve_native()
    }

    fn resolve_native_w(&self, parts: &[String]) -> Option<Utf8PathBuf> {
        self.inner.descend(parts).resolve_native_w()
    }
}

/// Rejects every mutation on the wrapped tree.
///
/// Opened archives are presented through this wrapper: their in-memory
/// trees could technically accept writes, but nothing would ever persist
/// them back into the container.
pub struct WriteBlocker {
    inner: VfsPath,
}

impl WriteBlocker {
    pub fn new(inner: VfsPath) -> Self {
        Self { inner }
    }

    /// Wrap this blocker's root in a [`VfsPath`] handle.
    pub fn into_path(self) -> VfsPath {
        VfsPath::root(Arc::new(self))
    }
}

impl TreeSource for WriteBlocker {
    fn is_dir(&self, parts: &[String]) -> bool {
        self.inner.descend(parts).is_dir()
    }

    fn is_file(&self, parts: &[String]) -> bool {
        self.inner.descend(parts).is_file()
    }

    fn open_read(&self, parts: &[String]) -> Result<ReadHandle> {
        self.inner.descend(parts).open_read()
    }

    fn open_write(&self, parts: &[String]) -> Result<WriteHandle> {
        Err(Error::ReadOnly(display_parts(parts)))
    }

    fn list(&self, parts: &[String]) -> Result<Vec<String>> {
        self.inner.descend(parts).list()
    }

    fn mkdirs(&self, parts: &[String]) -> Result<()> {
        Err(Error::ReadOnly(display_parts(parts)))
    }

    fn resolve_native(&self, parts: &[String]) -> Option<Utf8PathBuf> {
        self.inner.descend(parts).resolve_native()
    }

    fn resolve_native_w(&self, _parts: &[String]) -> Option<Utf8PathBuf> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::Directory;
    use crate::memory::MemoryTree;
    use camino::Utf8PathBuf;
    use std::io::Write as _;
    use std::thread;

    #[test]
    fn test_directory_creator_makes_parents() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        let out = DirectoryCreator::new(Directory::new(root).unwrap().into_path()).into_path();

        let mut handle = out.join("deep/nested/tree/file.bin").open_write().unwrap();
        handle.write_all(b"ok").unwrap();
        drop(handle);

        assert!(dir.path().join("deep/nested/tree/file.bin").is_file());
    }

    #[test]
    fn test_synchronizer_delegates() {
        let tree = MemoryTree::new();
        tree.insert("a/file.txt", b"hello".to_vec());
        let sync = Synchronizer::new(tree.into_path()).into_path();

        assert!(sync.join("a").is_dir());
        assert!(sync.join("a/file.txt").is_file());
        assert_eq!(sync.join("a/file.txt").read_to_string().unwrap(), "hello");
        assert_eq!(sync.join("a").list().unwrap(), vec!["file.txt".to_string()]);
    }

    #[test]
    fn test_synchronizer_subtree_root() {
        let tree = MemoryTree::new();
        tree.insert("converted/x.bin", b"x".to_vec());
        // wrap a subtree, not the whole source
        let sync = Synchronizer::new(tree.into_path().join("converted")).into_path();

        assert!(sync.join("x.bin").is_file());
        assert!(!sync.join("converted").is_dir());
    }

    #[test]
    fn test_write_blocker_rejects_mutations() {
        let tree = MemoryTree::new();
        tree.insert("pack/entry.bmp", b"pixels".to_vec());
        let blocked = WriteBlocker::new(tree.into_path()).into_path();

        assert_eq!(
            blocked.join("pack/entry.bmp").read_to_string().unwrap(),
            "pixels"
        );
        assert_eq!(blocked.join("pack").list().unwrap(), vec!["entry.bmp".to_string()]);
        assert!(matches!(
            blocked.join("pack/new.bmp").open_write(),
            Err(Error::ReadOnly(_))
        ));
        assert!(matches!(
            blocked.join("pack/sub").mkdirs(),
            Err(Error::ReadOnly(_))
        ));
        assert!(blocked.resolve_native_w().is_none());
    }

    #[test]
    fn test_structural_mutations_visible_to_later_readers() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();

        let lock: AccessLock = Arc::new(RwLock::new(()));
        let writer = Synchronizer::with_lock(
            DirectoryCreator::new(Directory::new(root.clone()).unwrap().into_path()).into_path(),
            Arc::clone(&lock),
        )
        .into_path();
        let reader =
            Synchronizer::with_lock(Directory::new(root).unwrap().into_path(), lock).into_path();

        let mut workers = Vec::new();
        for n in 0..8 {
            let writer = writer.clone();
            workers.push(thread::spawn(move || {
                let path = writer.join(&format!("shard{n}/part.bin"));
                let mut handle = path.open_write().unwrap();
                handle.write_all(b"chunk").unwrap();
            }));
        }
        for worker in workers {
            worker.join().unwrap();
        }

        // every structural mutation must be visible once the workers joined
        let listed = reader.list().unwrap();
        assert_eq!(listed.len(), 8);
        for n in 0..8 {
            assert!(reader.join(&format!("shard{n}/part.bin")).is_file());
        }
    }
}
