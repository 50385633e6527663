//! Converted-asset format history.
//!
//! Every time the converted-output format changes, the asset version is
//! bumped and a [`CHANGES`] entry records which components the bump
//! affects. The invalidation engine compares the version persisted in the
//! output tree against this table to decide what needs reconverting.
//!
//! The table is append-only and ascending by version; [`changes`] takes the
//! union of everything strictly newer than the stored version, so the
//! change set can only grow as the stored version falls further behind.

use crate::media::MediaCategory;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;

/// Version of the converted asset format this build produces.
pub const ASSET_VERSION: i64 = 5;

/// Version token of the game specification format this build produces.
pub const GAMESPEC_VERSION: &str = "2.1";

/// Marker file holding the asset version, under `<output>/converted/`.
pub const ASSET_VERSION_FILENAME: &str = "asset_version";

/// Marker file holding the game spec version, under `<output>/converted/`.
pub const GAMESPEC_VERSION_FILENAME: &str = "gamespec_version";

/// A reconvertible unit of converter output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Component {
    /// Media files of every category (textures, audio, ...).
    Media,
    /// Converted game data definitions.
    Metadata,
    Sounds,
    Graphics,
    Interface,
    Scripts,
}

impl Component {
    /// The component universe.
    pub const ALL: [Component; 6] = [
        Component::Media,
        Component::Metadata,
        Component::Sounds,
        Component::Graphics,
        Component::Interface,
        Component::Scripts,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Component::Media => "media",
            Component::Metadata => "metadata",
            Component::Sounds => "sounds",
            Component::Graphics => "graphics",
            Component::Interface => "interface",
            Component::Scripts => "scripts",
        }
    }

    /// The component a media category's output belongs to.
    pub fn from_category(category: MediaCategory) -> Self {
        match category {
            MediaCategory::Graphics => Component::Graphics,
            MediaCategory::Sounds => Component::Sounds,
            MediaCategory::Interface => Component::Interface,
            MediaCategory::Scripts => Component::Scripts,
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

struct ChangeEntry {
    version: i64,
    components: &'static [Component],
}

/// Format history, ascending by version. Output produced at version `v`
/// is stale for every component listed by entries with version `> v`.
static CHANGES: &[ChangeEntry] = &[
    ChangeEntry {
        version: 0,
        components: &Component::ALL,
    },
    ChangeEntry {
        version: 1,
        components: &[Component::Sounds],
    },
    ChangeEntry {
        version: 2,
        components: &[Component::Interface, Component::Scripts],
    },
    ChangeEntry {
        version: 3,
        components: &[Component::Media, Component::Sounds],
    },
    ChangeEntry {
        version: 4,
        components: &[Component::Graphics],
    },
    ChangeEntry {
        version: 5,
        components: &[Component::Graphics, Component::Metadata],
    },
];

/// Components stale for output converted at `asset_version` with the given
/// stored spec token.
///
/// `asset_version` of `-1` means "never converted" and yields the full
/// universe. A missing (`None`) or mismatched spec token additionally
/// invalidates [`Component::Metadata`], since the metadata output encodes
/// the spec format.
pub fn changes(asset_version: i64, spec_version: Option<&str>) -> BTreeSet<Component> {
    let mut out = BTreeSet::new();
    for entry in CHANGES {
        if entry.version > asset_version {
            out.extend(entry.components.iter().copied());
        }
    }
    if spec_version != Some(GAMESPEC_VERSION) {
        out.insert(Component::Metadata);
    }
    out
}
