//! Union-mount virtual filesystem layer for game asset conversion.
//!
//! Game installations scatter their assets across plain directories and
//! packed containers. This crate provides the read-through abstraction the
//! conversion core composes them with:
//!
//! - **`TreeSource`**: the capability set every backing store implements
//! - **`VfsPath`**: cheap cloneable handles into any source
//! - **`Directory`**: a native-directory backend, optionally case-ignoring
//! - **`MemoryTree`**: a bytes-backed tree for archive contents and tests
//! - **`Union`**: ordered union mounts with last-wins conflict resolution
//! - **`Synchronizer` / `DirectoryCreator` / `WriteBlocker`**: decorators
//!   that make a tree safe and convenient for a multi-worker consumer, or
//!   read-only
//!
//! # Example
//!
//! ```no_run
//! use reforge_vfs::{Directory, Union};
//! use std::sync::Arc;
//!
//! # fn main() -> reforge_vfs::Result<()> {
//! let install = Directory::case_ignoring("/games/aok")?.into_path();
//! let sounds = Directory::new("/games/aok/sound")?.into_path();
//!
//! let union = Arc::new(Union::new());
//! union.mount("", install);
//! union.mount("sounds", sounds);
//!
//! let root = union.root();
//! for name in root.join("sounds").list()? {
//!     println!("{name}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod directory;
pub mod error;
pub mod memory;
pub mod path;
pub mod tree;
pub mod union;
pub mod wrapper;

// Re-export main types
pub use directory::Directory;
pub use error::{Error, Result};
pub use memory::MemoryTree;
pub use path::VfsPath;
pub use tree::{ReadHandle, TreeSource, WriteHandle};
pub use union::Union;
pub use wrapper::{AccessLock, DirectoryCreator, Synchronizer, WriteBlocker};
