//! Edition and expansion media path tables.
//!
//! An [`Edition`] describes one detected base release of the source game:
//! its support classification and, for every media category, the ordered
//! list of source-relative paths its assets live in. Those paths may point
//! at plain directories or at packed containers — the mount resolver
//! classifies them, this module only declares them. [`Expansion`]s have the
//! same shape and layer on top of their edition.
//!
//! The tables are static data defined alongside the detection logic; this
//! core consumes them through the [`VersionDetector`] seam and never
//! inspects an installation itself.

use reforge_vfs::VfsPath;
use serde::Serialize;
use std::fmt;

/// How well a detected edition or expansion works with the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Support {
    /// Fully supported.
    Supported,
    /// Known but not supported; conversion proceeds at the user's risk.
    Unsupported,
    /// Known to produce broken output; conversion is refused.
    Breaks,
}

/// Coarse classification of asset kind.
///
/// Each category doubles as a mount point in the virtual tree (its
/// [`target_dir`](Self::target_dir)) and as the granularity at which
/// media reconversion is requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    Graphics,
    Sounds,
    Interface,
    Scripts,
}

impl MediaCategory {
    /// Every category, in mount order.
    pub const ALL: [MediaCategory; 4] = [
        MediaCategory::Graphics,
        MediaCategory::Sounds,
        MediaCategory::Interface,
        MediaCategory::Scripts,
    ];

    /// The category's mount point name in the composed virtual tree.
    pub fn target_dir(self) -> &'static str {
        match self {
            MediaCategory::Graphics => "graphics",
            MediaCategory::Sounds => "sounds",
            MediaCategory::Interface => "interface",
            MediaCategory::Scripts => "scripts",
        }
    }
}

impl fmt::Display for MediaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.target_dir())
    }
}

/// Ordered media path declarations: category -> source-relative paths.
///
/// Declaration order is a determinism requirement — later paths shadow
/// earlier ones at colliding subpaths once mounted.
pub type MediaPaths = Vec<(MediaCategory, Vec<String>)>;

/// A detected base product release.
#[derive(Debug, Clone)]
pub struct Edition {
    pub name: String,
    pub support: Support,
    pub media_paths: MediaPaths,
}

impl Edition {
    pub fn new(name: impl Into<String>, support: Support, media_paths: MediaPaths) -> Self {
        Self {
            name: name.into(),
            support,
            media_paths,
        }
    }
}

impl fmt::Display for Edition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// An add-on product layered on an edition.
#[derive(Debug, Clone)]
pub struct Expansion {
    pub name: String,
    pub support: Support,
    pub media_paths: MediaPaths,
}

impl Expansion {
    pub fn new(name: impl Into<String>, support: Support, media_paths: MediaPaths) -> Self {
        Self {
            name: name.into(),
            support,
            media_paths,
        }
    }
}

impl fmt::Display for Expansion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The detected pair: one primary edition plus its active expansions, in
/// activation order.
#[derive(Debug, Clone)]
pub struct GameVersion {
    pub edition: Edition,
    pub expansions: Vec<Expansion>,
}

impl GameVersion {
    pub fn new(edition: Edition, expansions: Vec<Expansion>) -> Self {
        Self {
            edition,
            expansions,
        }
    }
}

/// Detection seam: inspect a source tree, recognize what is installed.
///
/// Implementations live with the per-game detection logic (file probes,
/// installer manifests), not in this core. Returning `None` means nothing
/// recognizable was found — an explicit outcome, not an error.
pub trait VersionDetector {
    fn detect(&self, srcdir: &VfsPath) -> Option<GameVersion>;

    /// Names of editions the converter fully supports, for the diagnostic
    /// shown when only broken editions are installed.
    fn supported_editions(&self) -> Vec<String> {
        Vec::new()
    }
}
