//! Conversion driver seam and progress aggregation.
//!
//! The driver itself — the pipeline that decodes and re-encodes assets —
//! is an external, multi-worker consumer. This module defines what it is
//! handed (a [`ConversionJob`] with synchronized read and write roots) and
//! what it yields back (a lazy sequence of [`ProgressEvent`]s), and wires
//! the two together in [`convert_assets`].

use crate::archive::ArchiveOpener;
use crate::error::Result;
use crate::media::{GameVersion, VersionDetector};
use crate::mount::{mount_input, MountOutcome};
use crate::request::ConversionRequest;
use camino::Utf8PathBuf;
use reforge_vfs::{DirectoryCreator, Synchronizer, VfsPath};
use serde::Serialize;
use std::sync::{Arc, RwLock};

/// One step of driver progress.
///
/// The sequence is lazy and practically bounded by the asset count. The
/// driver may send an estimate at any point (typically once, early); items
/// converted before the estimate arrives are counted into the total.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum ProgressEvent {
    /// Estimated number of items still to convert.
    Estimate(usize),
    /// Description of the item just converted.
    Converted(String),
}

/// Everything the driver needs for one run.
///
/// Both roots are already wrapped for multi-worker access: reads of
/// disjoint paths proceed concurrently, structural mutations are
/// serialized across the pair.
pub struct ConversionJob {
    /// Synchronized view of the composed source tree.
    pub srcdir: VfsPath,
    /// Synchronized, directory-creating view of the output tree.
    pub targetdir: VfsPath,
    /// The detected edition and expansions.
    pub game: GameVersion,
    /// Which components to convert and whether caches may be reused.
    pub request: ConversionRequest,
}

/// The external conversion pipeline.
pub trait ConversionDriver {
    /// Run the conversion, yielding progress lazily.
    fn convert<'a>(
        &'a self,
        job: &'a ConversionJob,
    ) -> Box<dyn Iterator<Item = Result<ProgressEvent>> + 'a>;
}

/// Render a running progress count, with a percentage once a total is known.
pub fn format_progress(current: usize, total: usize) -> String {
    if total == 0 {
        return format!("{current}");
    }
    format!("{}/{} ({}%)", current, total, 100 * current / total)
}

/// Mount the input, prepare the output, run the driver, aggregate progress.
///
/// Returns `Ok(None)` when no supported installation was detected (already
/// warned about), otherwise the native path of the composed source view.
pub fn convert_assets(
    assets: &VfsPath,
    srcdir: &VfsPath,
    detector: &dyn VersionDetector,
    opener: &dyn ArchiveOpener,
    driver: &dyn ConversionDriver,
    request: ConversionRequest,
) -> Result<Option<Utf8PathBuf>> {
    let MountOutcome::Mounted { tree, game } = mount_input(srcdir, detector, opener)? else {
        return Ok(None);
    };

    let converted = assets.join("converted");
    converted.mkdirs()?;

    // one lock across both roots: structural mutations on either side are
    // serialized against all reads and writes on both
    let lock = Arc::new(RwLock::new(()));
    let read_root = Synchronizer::with_lock(tree.clone(), Arc::clone(&lock)).into_path();
    let write_root =
        Synchronizer::with_lock(DirectoryCreator::new(converted).into_path(), lock).into_path();

    let job = ConversionJob {
        srcdir: read_root,
        targetdir: write_root,
        game,
        request,
    };

    let mut converted_count = 0usize;
    let mut total_count: Option<usize> = None;

    for event in driver.convert(&job) {
        match event? {
            ProgressEvent::Estimate(remaining) => {
                total_count = Some(remaining + converted_count);
            }
            ProgressEvent::Converted(item) => {
                match total_count {
                    Some(total) => tracing::info!(
                        "[{}] {}",
                        format_progress(converted_count, total),
                        item
                    ),
                    None => tracing::info!("[{}] {}", converted_count, item),
                }
                converted_count += 1;
            }
        }
    }

    Ok(tree.resolve_native())
}
