//! Shared fixtures for the crate's tests.

use crate::archive::ArchiveOpener;
use crate::error::{Error, Result};
use crate::media::{Edition, GameVersion, MediaPaths, Support, VersionDetector};
use reforge_vfs::{MemoryTree, ReadHandle, VfsPath};
use std::io::Read as _;

/// Install a test subscriber so `RUST_LOG=debug cargo test` shows the
/// resolver's diagnostics. Safe to call from every test.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Toy container format: one `name=content` entry per line, extension `pak`.
pub struct PakOpener;

impl ArchiveOpener for PakOpener {
    fn handles(&self, extension: &str) -> bool {
        extension == "pak"
    }

    fn open(&self, mut file: ReadHandle, _game: &GameVersion) -> Result<VfsPath> {
        let mut text = String::new();
        file.read_to_string(&mut text)
            .map_err(|e| Error::Archive(e.to_string()))?;

        let tree = MemoryTree::new();
        for line in text.lines().filter(|l| !l.is_empty()) {
            let Some((name, content)) = line.split_once('=') else {
                return Err(Error::Archive(format!("malformed entry: {line}")));
            };
            tree.insert(name, content.as_bytes().to_vec());
        }
        Ok(tree.into_path())
    }
}

/// Detector that always reports the same result.
pub struct FixedDetector(pub Option<GameVersion>);

impl VersionDetector for FixedDetector {
    fn detect(&self, _srcdir: &VfsPath) -> Option<GameVersion> {
        self.0.clone()
    }

    fn supported_editions(&self) -> Vec<String> {
        vec!["Gold Edition".to_string()]
    }
}

pub fn edition_with(media_paths: MediaPaths) -> Edition {
    Edition::new("Gold Edition", Support::Supported, media_paths)
}

pub fn game_with(edition: Edition) -> GameVersion {
    GameVersion::new(edition, Vec::new())
}
