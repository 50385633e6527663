//! The conversion request handed to the driver.
//!
//! The driver receives one [`ConversionRequest`] per run. It starts out
//! requesting everything; the invalidation engine inverts a change set into
//! skip flags over the full component universe, so the driver only ever
//! checks `request.skips(component)`.

use crate::changelog::Component;
use serde::Serialize;
use std::collections::BTreeSet;

/// Per-component skip flags plus the parse-cache toggle.
///
/// The parse cache stores the decoded raw game data between runs to skip
/// the expensive reading stage. It is keyed on the metadata format, so any
/// change set containing [`Component::Metadata`] forces it off — a cache
/// built against the previous format must not be reused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversionRequest {
    skip: BTreeSet<Component>,
    use_parse_cache: bool,
}

impl Default for ConversionRequest {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionRequest {
    /// A request for everything: nothing skipped, parse cache enabled.
    pub fn new() -> Self {
        Self {
            skip: BTreeSet::new(),
            use_parse_cache: true,
        }
    }

    /// Whether the driver should skip this component.
    pub fn skips(&self, component: Component) -> bool {
        self.skip.contains(&component)
    }

    /// Mark a component as not needing reconversion.
    pub fn set_skip(&mut self, component: Component) {
        self.skip.insert(component);
    }

    /// Whether the raw-data reading stage may reuse its cache.
    pub fn parse_cache_enabled(&self) -> bool {
        self.use_parse_cache
    }

    pub fn disable_parse_cache(&mut self) {
        self.use_parse_cache = false;
    }

    /// The components the driver will actually convert.
    pub fn requested(&self) -> BTreeSet<Component> {
        Component::ALL
            .into_iter()
            .filter(|c| !self.skip.contains(c))
            .collect()
    }

    /// Restrict the request to a change set: every component *not* in
    /// `changes` is skipped, and the parse cache is disabled if the
    /// metadata format changed.
    pub fn apply_changes(&mut self, changes: &BTreeSet<Component>) {
        for component in Component::ALL {
            if !changes.contains(&component) {
                self.skip.insert(component);
            }
        }
        if changes.contains(&Component::Metadata) {
            self.use_parse_cache = false;
        }
    }
}
