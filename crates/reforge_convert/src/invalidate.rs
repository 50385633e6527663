//! Incremental invalidation.
//!
//! On every run the engine reads the two persisted version markers from
//! the converted-output tree, asks the change table what became stale, and
//! turns the answer into a [`ConversionRequest`]. Both entry points are
//! read-only — running them twice against an untouched output tree yields
//! the same decision twice.
//!
//! The two markers deliberately use different "unset" sentinels: the asset
//! version is an integer ordinal compared against the change table, so
//! absence coerces to `-1` (older than every entry); the spec version is
//! an opaque token compared for equality, so absence stays `None`.

use crate::changelog::{
    self, ASSET_VERSION, ASSET_VERSION_FILENAME, GAMESPEC_VERSION_FILENAME,
};
use crate::error::{Error, Result};
use crate::request::ConversionRequest;
use camino::Utf8PathBuf;
use reforge_vfs::VfsPath;

/// Sentinel for "never converted".
const NEVER_CONVERTED: i64 = -1;

/// Read the asset-output version marker.
///
/// A missing marker means the assets were never converted. Unparsable
/// content is a recoverable anomaly: it coerces to the same sentinel, with
/// a warning.
pub fn read_asset_version(converted: &VfsPath) -> i64 {
    let marker = converted.join(ASSET_VERSION_FILENAME);
    let content = match marker.read_to_string() {
        Ok(content) => content,
        Err(_) => {
            tracing::info!("No converted assets have been found");
            return NEVER_CONVERTED;
        }
    };
    match content.trim().parse::<i64>() {
        Ok(version) => version,
        Err(_) => {
            tracing::warn!(
                "Converted asset version has improper format; expected integer number"
            );
            NEVER_CONVERTED
        }
    }
}

/// Read the game-spec version marker. Missing means unset, not `-1`.
pub fn read_spec_version(converted: &VfsPath) -> Option<String> {
    let marker = converted.join(GAMESPEC_VERSION_FILENAME);
    match marker.read_to_string() {
        Ok(content) => Some(content.trim().to_string()),
        Err(_) => {
            tracing::info!("Game specification version file not found");
            None
        }
    }
}

/// The invalidation decision.
#[derive(Debug, PartialEq, Eq)]
pub enum Invalidation {
    /// Converted output matches the current format; nothing to do.
    UpToDate,
    /// Conversion is needed for the components the request leaves unskipped.
    Convert {
        request: ConversionRequest,
        /// Writable native location of the output tree.
        target: Utf8PathBuf,
    },
}

/// Decide whether conversion is required and for which components.
///
/// `asset_dir` is the root of the converted-output tree (the markers live
/// under its `converted/` subdirectory). Fails only when conversion is
/// needed but no writable native path can be resolved — that is an
/// environment misconfiguration, not a staleness question.
pub fn conversion_required(asset_dir: &VfsPath) -> Result<Invalidation> {
    let converted = asset_dir.join("converted");

    let asset_version = read_asset_version(&converted);
    let spec_version = read_spec_version(&converted);

    let changes = changelog::changes(asset_version, spec_version.as_deref());
    if changes.is_empty() {
        tracing::debug!("Converted assets are up to date");
        return Ok(Invalidation::UpToDate);
    }

    if asset_version >= 0 && asset_version != ASSET_VERSION {
        tracing::info!(
            "Found converted assets with version {}, but need version {}",
            asset_version,
            ASSET_VERSION
        );
    }
    tracing::info!("Converting: {}", change_summary(&changes));

    let target = writable_target(asset_dir)?;
    tracing::info!("Will save to '{}'", target);

    let mut request = ConversionRequest::new();
    request.apply_changes(&changes);

    Ok(Invalidation::Convert { request, target })
}

/// Request conversion of everything, ignoring the persisted markers.
///
/// The force override is a separate entry point by design: it must not be
/// folded into the version comparison. The full universe includes the
/// metadata component, so the parse cache is disabled here too.
pub fn force_conversion(asset_dir: &VfsPath) -> Result<Invalidation> {
    let target = writable_target(asset_dir)?;

    let mut request = ConversionRequest::new();
    request.apply_changes(&changelog::Component::ALL.into_iter().collect());

    Ok(Invalidation::Convert { request, target })
}

/// Alphabetical, comma-separated rendering of a change set.
fn change_summary(changes: &std::collections::BTreeSet<changelog::Component>) -> String {
    let mut tags: Vec<_> = changes.iter().map(|c| c.tag()).collect();
    tags.sort_unstable();
    tags.join(", ")
}

fn writable_target(asset_dir: &VfsPath) -> Result<Utf8PathBuf> {
    asset_dir
        .resolve_native_w()
        .ok_or_else(|| Error::NoWritableTarget(asset_dir.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changelog::{Component, GAMESPEC_VERSION};
    use camino::Utf8PathBuf;
    use reforge_vfs::{Directory, MemoryTree};
    use std::collections::BTreeSet;
    use std::fs;

    fn output_fixture(
        asset_version: Option<&str>,
        spec_version: Option<&str>,
    ) -> (tempfile::TempDir, VfsPath) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("converted")).unwrap();
        if let Some(v) = asset_version {
            fs::write(dir.path().join("converted").join(ASSET_VERSION_FILENAME), v).unwrap();
        }
        if let Some(v) = spec_version {
            fs::write(
                dir.path().join("converted").join(GAMESPEC_VERSION_FILENAME),
                v,
            )
            .unwrap();
        }
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        (dir, Directory::new(root).unwrap().into_path())
    }

    #[test]
    fn test_missing_markers_mean_never_converted() {
        let (_dir, asset_dir) = output_fixture(None, None);
        let converted = asset_dir.join("converted");
        assert_eq!(read_asset_version(&converted), -1);
        assert_eq!(read_spec_version(&converted), None);
    }

    #[test]
    fn test_unparsable_marker_coerces_with_warning() {
        let (_dir, asset_dir) = output_fixture(Some("not-a-number"), None);
        assert_eq!(read_asset_version(&asset_dir.join("converted")), -1);
    }

    #[test]
    fn test_markers_are_trimmed() {
        let (_dir, asset_dir) = output_fixture(Some("  3\n"), Some(" 2.1 \n"));
        let converted = asset_dir.join("converted");
        assert_eq!(read_asset_version(&converted), 3);
        assert_eq!(read_spec_version(&converted).as_deref(), Some("2.1"));
    }

    #[test]
    fn test_change_summary_is_sorted_alphabetically() {
        let changes: BTreeSet<_> = [
            Component::Sounds,
            Component::Media,
            Component::Metadata,
            Component::Graphics,
        ]
        .into();
        assert_eq!(change_summary(&changes), "graphics, media, metadata, sounds");
    }

    #[test]
    fn test_up_to_date_output() {
        let (_dir, asset_dir) =
            output_fixture(Some(&ASSET_VERSION.to_string()), Some(GAMESPEC_VERSION));
        assert_eq!(
            conversion_required(&asset_dir).unwrap(),
            Invalidation::UpToDate
        );
    }

    #[test]
    fn test_stored_version_three_requests_graphics_and_metadata() {
        let (_dir, asset_dir) = output_fixture(Some("3"), Some(GAMESPEC_VERSION));

        let Invalidation::Convert { request, target } =
            conversion_required(&asset_dir).unwrap()
        else {
            panic!("expected a conversion decision");
        };

        let expected: BTreeSet<_> = [Component::Graphics, Component::Metadata].into();
        assert_eq!(request.requested(), expected);
        for component in [
            Component::Media,
            Component::Sounds,
            Component::Interface,
            Component::Scripts,
        ] {
            assert!(request.skips(component), "{component} should be skipped");
        }
        assert!(!request.skips(Component::Graphics));
        assert!(!request.skips(Component::Metadata));
        // metadata changed, so the parse cache must be off
        assert!(!request.parse_cache_enabled());
        assert!(target.as_std_path().is_dir());
    }

    #[test]
    fn test_no_markers_requests_full_universe() {
        let (_dir, asset_dir) = output_fixture(None, None);

        let Invalidation::Convert { request, .. } = conversion_required(&asset_dir).unwrap()
        else {
            panic!("expected a conversion decision");
        };

        assert_eq!(request.requested(), Component::ALL.into_iter().collect());
        for component in Component::ALL {
            assert!(!request.skips(component));
        }
    }

    #[test]
    fn test_missing_markers_equivalent_to_explicit_sentinels() {
        let (_dir_a, missing) = output_fixture(None, None);
        let (_dir_b, explicit) = output_fixture(Some("-1"), Some(""));

        let decide = |dir: &VfsPath| match conversion_required(dir).unwrap() {
            Invalidation::Convert { request, .. } => request,
            Invalidation::UpToDate => panic!("expected a conversion decision"),
        };
        assert_eq!(decide(&missing), decide(&explicit));
    }

    #[test]
    fn test_invalidation_is_idempotent() {
        let (_dir, asset_dir) = output_fixture(Some("2"), Some(GAMESPEC_VERSION));
        let first = conversion_required(&asset_dir).unwrap();
        let second = conversion_required(&asset_dir).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_spec_mismatch_alone_invalidates_metadata() {
        let (_dir, asset_dir) =
            output_fixture(Some(&ASSET_VERSION.to_string()), Some("stale-token"));

        let Invalidation::Convert { request, .. } = conversion_required(&asset_dir).unwrap()
        else {
            panic!("expected a conversion decision");
        };
        assert_eq!(
            request.requested(),
            BTreeSet::from([Component::Metadata])
        );
        assert!(!request.parse_cache_enabled());
    }

    #[test]
    fn test_unwritable_output_is_a_configuration_error() {
        // a memory tree can never yield a writable native path
        let tree = MemoryTree::new();
        tree.insert("converted/placeholder", b"x".to_vec());
        let asset_dir = tree.into_path();

        assert!(matches!(
            conversion_required(&asset_dir),
            Err(Error::NoWritableTarget(_))
        ));
        assert!(matches!(
            force_conversion(&asset_dir),
            Err(Error::NoWritableTarget(_))
        ));
    }

    #[test]
    fn test_force_requests_everything_even_when_up_to_date() {
        let (_dir, asset_dir) =
            output_fixture(Some(&ASSET_VERSION.to_string()), Some(GAMESPEC_VERSION));

        let Invalidation::Convert { request, .. } = force_conversion(&asset_dir).unwrap()
        else {
            panic!("expected a conversion decision");
        };
        assert_eq!(request.requested(), Component::ALL.into_iter().collect());
        assert!(!request.parse_cache_enabled());
    }
}
