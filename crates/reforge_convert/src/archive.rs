//! Archive adapter seam.
//!
//! Packed containers (DRS-style archives and their relatives) are decoded
//! by external codec crates. The mount resolver only needs two things from
//! them: a way to recognize a container by extension, and a way to turn its
//! bytes into a directory-like tree it can mount. This trait is that
//! boundary — the core calls it, never implements a codec.

use crate::error::Result;
use crate::media::GameVersion;
use reforge_vfs::{ReadHandle, VfsPath};

/// Opens packed containers into mountable trees.
pub trait ArchiveOpener: Send + Sync {
    /// Whether this opener recognizes the (lowercased, dot-less) file
    /// extension as a packed container.
    fn handles(&self, extension: &str) -> bool;

    /// Decode a container and expose its contents as a tree root.
    ///
    /// The detected game version is passed through because some container
    /// formats changed layout between editions.
    fn open(&self, file: ReadHandle, game: &GameVersion) -> Result<VfsPath>;
}
