//! Asset source mounting and incremental invalidation.
//!
//! A game installation scatters its assets across plain directories and
//! packed containers. This crate resolves them into one logical,
//! read-through virtual filesystem and decides — on every run — which
//! categories of converted output are stale:
//!
//! - **Mount resolution**: merge every media path declared by the detected
//!   edition and its expansions into a single composed tree, dispatching
//!   per path on directory vs. packed container vs. auxiliary file
//! - **Incremental invalidation**: map the persisted version markers plus
//!   the static change table onto a minimal per-component reconversion plan
//! - **Synchronized dual-root access**: wrap the source view and the output
//!   tree so a multi-worker conversion driver can interleave reads and
//!   writes safely
//!
//! Archive codecs, version detection, and the conversion pipeline itself
//! are external collaborators consumed through the [`ArchiveOpener`],
//! [`VersionDetector`], and [`ConversionDriver`] seams.
//!
//! # Example
//!
//! ```no_run
//! use reforge_convert::{conversion_required, Invalidation};
//! use reforge_vfs::Directory;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let assets = Directory::new("/var/lib/mygame/assets")?.into_path();
//!
//! match conversion_required(&assets)? {
//!     Invalidation::UpToDate => println!("assets are up to date"),
//!     Invalidation::Convert { request, target } => {
//!         println!("converting {:?} into {}", request.requested(), target);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod changelog;
pub mod driver;
pub mod error;
pub mod invalidate;
pub mod media;
pub mod mount;
pub mod request;

#[cfg(test)]
mod test_support;

// Re-export main types
pub use archive::ArchiveOpener;
pub use changelog::{Component, ASSET_VERSION, GAMESPEC_VERSION};
pub use driver::{convert_assets, format_progress, ConversionDriver, ConversionJob, ProgressEvent};
pub use error::{Error, Result};
pub use invalidate::{conversion_required, force_conversion, Invalidation};
pub use media::{Edition, Expansion, GameVersion, MediaCategory, Support, VersionDetector};
pub use mount::{mount_asset_dirs, mount_input, MediaSource, MountOutcome};
pub use request::ConversionRequest;
