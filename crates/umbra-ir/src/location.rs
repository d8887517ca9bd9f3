//! Compile-time identifiers for traversal positions.

use std::fmt;

/// Direction of an edge traversal.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum EdgeDirection {
    Out,
    In,
}

impl fmt::Display for EdgeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeDirection::Out => write!(f, "out"),
            EdgeDirection::In => write!(f, "in"),
        }
    }
}

/// A position on the main traversal path.
///
/// The `query_path` starts at the root type name and records each traversed
/// edge. The `visit` counter distinguishes revisits of the same path minted
/// by the front end when control returns after an optional branch.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct VertexLocation {
    query_path: Vec<String>,
    visit: u32,
}

impl VertexLocation {
    pub fn new(root_type: impl Into<String>) -> Self {
        Self {
            query_path: vec![root_type.into()],
            visit: 0,
        }
    }

    /// Extends the path along an edge. The result is a first visit.
    pub fn step(&self, edge_name: impl Into<String>) -> Self {
        let mut query_path = self.query_path.clone();
        query_path.push(edge_name.into());
        Self {
            query_path,
            visit: 0,
        }
    }

    /// Mints the next revisit of this position.
    pub fn revisit(&self) -> Self {
        Self {
            query_path: self.query_path.clone(),
            visit: self.visit + 1,
        }
    }

    pub fn query_path(&self) -> &[String] {
        &self.query_path
    }

    pub fn visit(&self) -> u32 {
        self.visit
    }
}

impl fmt::Display for VertexLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.query_path.join("."))?;
        if self.visit > 0 {
            write!(f, "~{}", self.visit)?;
        }
        Ok(())
    }
}

/// A position inside a `@fold` scope.
///
/// Carries the vertex where the fold was entered and the folded edges
/// walked since. Reads at a fold location yield aggregated lists rather
/// than scalars.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FoldLocation {
    base: VertexLocation,
    fold_path: Vec<(EdgeDirection, String)>,
}

impl FoldLocation {
    pub fn new(base: VertexLocation, direction: EdgeDirection, edge_name: impl Into<String>) -> Self {
        Self {
            base,
            fold_path: vec![(direction, edge_name.into())],
        }
    }

    /// Extends the fold scope along another folded edge.
    pub fn step(&self, direction: EdgeDirection, edge_name: impl Into<String>) -> Self {
        let mut fold_path = self.fold_path.clone();
        fold_path.push((direction, edge_name.into()));
        Self {
            base: self.base.clone(),
            fold_path,
        }
    }

    pub fn base(&self) -> &VertexLocation {
        &self.base
    }

    pub fn fold_path(&self) -> &[(EdgeDirection, String)] {
        &self.fold_path
    }
}

impl fmt::Display for FoldLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base)?;
        for (direction, edge_name) in &self.fold_path {
            write!(f, "/fold:{direction}_{edge_name}")?;
        }
        Ok(())
    }
}

/// An opaque identifier for a position reached by the traversal.
///
/// Created once by the front end and immutable thereafter.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Location {
    Vertex(VertexLocation),
    Fold(FoldLocation),
}

impl Location {
    /// The root location of a traversal starting at the given type.
    pub fn at(root_type: impl Into<String>) -> Self {
        Location::Vertex(VertexLocation::new(root_type))
    }

    /// Whether this position lies inside a `@fold` scope.
    pub fn is_fold(&self) -> bool {
        matches!(self, Location::Fold(_))
    }

    /// Produces the field-qualified identifier for a property read here.
    pub fn navigate_to_field(&self, field: impl Into<String>) -> FieldRef {
        FieldRef {
            location: self.clone(),
            field: field.into(),
        }
    }
}

impl From<VertexLocation> for Location {
    fn from(location: VertexLocation) -> Self {
        Location::Vertex(location)
    }
}

impl From<FoldLocation> for Location {
    fn from(location: FoldLocation) -> Self {
        Location::Fold(location)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Vertex(location) => write!(f, "{location}"),
            Location::Fold(location) => write!(f, "{location}"),
        }
    }
}

/// A specific property read at a specific location.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FieldRef {
    pub location: Location,
    pub field: String,
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.location, self.field)
    }
}
