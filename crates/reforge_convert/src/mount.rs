//! Mount resolution.
//!
//! Composes a detected installation into one virtual tree:
//!
//! 1. The whole source tree is mounted at the union root, so paths the
//!    media tables don't mention stay reachable verbatim.
//! 2. For the primary edition, then each active expansion in activation
//!    order: every declared media path is classified once and mounted at
//!    its category's target directory. Directories are aliased live;
//!    recognized packed containers are opened through the
//!    [`ArchiveOpener`] and their roots aliased; unrecognized files are
//!    skipped (auxiliary files are routinely listed alongside real
//!    sources). A path that doesn't exist at all aborts resolution
//!    immediately — no partial tree is returned.
//!
//! Mount order is the determinism guarantee: later mounts shadow earlier
//! ones at direct conflicts, and sibling entries union, both per
//! [`reforge_vfs::Union`] semantics.

use crate::archive::ArchiveOpener;
use crate::error::{Error, Result};
use crate::media::{GameVersion, MediaPaths, Support, VersionDetector};
use reforge_vfs::{Union, VfsPath, WriteBlocker};
use std::sync::Arc;

/// What a declared media path turned out to be.
///
/// Classification happens exactly once per path; a missing path is the
/// error case ([`Error::MissingMedia`]), not a variant.
pub enum MediaSource {
    /// An existing directory, mountable as a live alias.
    Directory(VfsPath),
    /// A packed container, already opened into a mountable tree.
    Archive(VfsPath),
    /// An existing file of no recognized container type.
    Unrecognized,
}

/// Classify one declared media path against the source tree.
pub fn classify(
    path: VfsPath,
    game: &GameVersion,
    opener: &dyn ArchiveOpener,
) -> Result<MediaSource> {
    if path.is_dir() {
        return Ok(MediaSource::Directory(path));
    }
    if path.is_file() {
        let recognized = path
            .extension()
            .is_some_and(|ext| opener.handles(&ext));
        if !recognized {
            return Ok(MediaSource::Unrecognized);
        }
        let handle = path.open_read()?;
        return Ok(MediaSource::Archive(opener.open(handle, game)?));
    }
    Err(Error::MissingMedia(path.to_string()))
}

/// Mount one media path table into the union.
fn mount_media_paths(
    union: &Union,
    srcdir: &VfsPath,
    media_paths: &MediaPaths,
    game: &GameVersion,
    opener: &dyn ArchiveOpener,
) -> Result<()> {
    for (category, paths) in media_paths {
        for path in paths {
            let source = srcdir.join(path);
            match classify(source, game, opener)? {
                MediaSource::Directory(dir) => union.mount(category.target_dir(), dir),
                MediaSource::Archive(root) => {
                    // nothing ever persists back into a container
                    union.mount(category.target_dir(), WriteBlocker::new(root).into_path());
                }
                MediaSource::Unrecognized => {
                    tracing::debug!("Skipping unrecognized media file: {}", path);
                }
            }
        }
    }
    Ok(())
}

/// Compose the unified source view for a detected installation.
///
/// Returns the root of a union tree with `srcdir` at `/` and every declared
/// media source mounted under its category directory. Fails on the first
/// declared path that resolves to nothing.
pub fn mount_asset_dirs(
    srcdir: &VfsPath,
    game: &GameVersion,
    opener: &dyn ArchiveOpener,
) -> Result<VfsPath> {
    let union = Arc::new(Union::new());
    union.mount("", srcdir.clone());

    mount_media_paths(&union, srcdir, &game.edition.media_paths, game, opener)?;
    for expansion in &game.expansions {
        mount_media_paths(&union, srcdir, &expansion.media_paths, game, opener)?;
    }

    Ok(union.root())
}

/// Outcome of [`mount_input`].
pub enum MountOutcome {
    /// A usable installation was found and composed.
    Mounted { tree: VfsPath, game: GameVersion },
    /// Nothing usable was detected. An explicit signal, not an error — the
    /// caller decides how to report it.
    Unsupported,
}

/// Detect the installed game version and mount its asset sources.
///
/// Broken editions refuse conversion; unsupported (but not broken)
/// editions and expansions are warned about and processed anyway.
pub fn mount_input(
    srcdir: &VfsPath,
    detector: &dyn VersionDetector,
    opener: &dyn ArchiveOpener,
) -> Result<MountOutcome> {
    let Some(game) = detector.detect(srcdir) else {
        tracing::warn!("No valid game version could be detected in {}", srcdir);
        return Ok(MountOutcome::Unsupported);
    };

    match game.edition.support {
        Support::Breaks => {
            tracing::warn!("You have installed an incompatible game edition:");
            tracing::warn!(" * {}", game.edition);
            let supported = detector.supported_editions();
            if !supported.is_empty() {
                tracing::warn!("You need at least one of:");
                for name in supported {
                    tracing::warn!(" * {}", name);
                }
            }
            return Ok(MountOutcome::Unsupported);
        }
        Support::Unsupported => {
            tracing::warn!("Game edition is not officially supported: {}", game.edition);
        }
        Support::Supported => {}
    }

    for expansion in &game.expansions {
        match expansion.support {
            Support::Breaks => {
                tracing::warn!("You have installed an incompatible game expansion:");
                tracing::warn!(" * {}", expansion);
            }
            Support::Unsupported => {
                tracing::warn!("Game expansion is not officially supported: {}", expansion);
            }
            Support::Supported => {}
        }
    }

    tracing::info!("Game edition detected: {}", game.edition);
    for expansion in &game.expansions {
        tracing::info!("Expansion detected: {}", expansion);
    }

    let tree = mount_asset_dirs(srcdir, &game, opener)?;
    Ok(MountOutcome::Mounted { tree, game })
}
