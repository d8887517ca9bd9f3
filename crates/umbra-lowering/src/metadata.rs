//! Read-only per-location facts consulted by the lowering passes.
//!
//! The metadata table is computed by the front end before lowering starts
//! and is strictly a passed-in lookup: no pass mutates it, and every pass
//! can be tested against a hand-built [`InMemoryMetadata`].

use rustc_hash::FxHashMap;

use umbra_ir::{Location, LoweringError, Result};

/// Facts the front end recorded about one marked location.
#[derive(Clone, Debug)]
pub struct LocationInfo {
    /// Declared type of the vertices reachable at this location.
    pub type_name: String,
    /// How many `@optional` scopes enclose this location.
    pub optional_scopes_depth: u32,
    /// Whether this location lies inside a `@fold` scope.
    pub within_fold: bool,
}

impl LocationInfo {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            optional_scopes_depth: 0,
            within_fold: false,
        }
    }

    pub fn with_optional_depth(mut self, depth: u32) -> Self {
        self.optional_scopes_depth = depth;
        self
    }

    pub fn with_fold_membership(mut self) -> Self {
        self.within_fold = true;
        self
    }
}

/// Lookup interface the lowering passes depend on.
pub trait QueryMetadata {
    /// Facts about a marked location. A location the front end never
    /// registered is a malformed-IR fault.
    fn location_info(&self, location: &Location) -> Result<&LocationInfo>;

    /// Map from each revisit location to the origin location it duplicates.
    fn revisit_translations(&self) -> &FxHashMap<Location, Location>;
}

/// Metadata table backed by in-memory maps.
///
/// The front end populates one per compiled query; tests hand-build
/// minimal tables with the `with_*` constructors.
#[derive(Clone, Debug, Default)]
pub struct InMemoryMetadata {
    locations: FxHashMap<Location, LocationInfo>,
    revisits: FxHashMap<Location, Location>,
}

impl InMemoryMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_location(mut self, location: impl Into<Location>, info: LocationInfo) -> Self {
        self.locations.insert(location.into(), info);
        self
    }

    /// Registers a revisit location and the origin it duplicates.
    ///
    /// Chains of revisits collapse at insertion, so every value in the
    /// finished map is an ultimate origin regardless of insertion order.
    pub fn with_revisit(
        mut self,
        revisit: impl Into<Location>,
        origin: impl Into<Location>,
    ) -> Self {
        let revisit = revisit.into();
        let mut origin = origin.into();
        if let Some(deeper) = self.revisits.get(&origin) {
            origin = deeper.clone();
        }
        for target in self.revisits.values_mut() {
            if *target == revisit {
                *target = origin.clone();
            }
        }
        self.revisits.insert(revisit, origin);
        self
    }
}

impl QueryMetadata for InMemoryMetadata {
    fn location_info(&self, location: &Location) -> Result<&LocationInfo> {
        self.locations.get(location).ok_or_else(|| {
            LoweringError::MalformedIr(format!("no metadata recorded for location {location}"))
        })
    }

    fn revisit_translations(&self) -> &FxHashMap<Location, Location> {
        &self.revisits
    }
}
