//! The linear block sequence a compiled query lowers through.

use std::collections::{BTreeMap, BTreeSet};

use crate::expression::Expression;
use crate::location::{EdgeDirection, FoldLocation, Location};

/// One step of a compiled query.
///
/// The front end emits blocks in a fixed legal order: every `Traverse`,
/// `Fold`, or `Recurse` is eventually followed, skipping only `Filter` and
/// `CoerceType` blocks, by the `MarkLocation` of its destination, and
/// exactly one `GlobalOperationsStart` separates per-path operations from
/// query-wide post-processing.
#[derive(Clone, Debug, PartialEq)]
pub enum IrBlock {
    /// Root of a traversal; no source edge.
    QueryRoot { start_types: BTreeSet<String> },
    /// Follow an edge. Optional traversals must not eliminate the
    /// enclosing result row when the edge is absent.
    Traverse {
        direction: EdgeDirection,
        edge_name: String,
        optional: bool,
    },
    /// Bounded repeated traversal of an edge.
    Recurse {
        direction: EdgeDirection,
        edge_name: String,
        depth: u32,
    },
    /// Enter a fold scope; descendant results aggregate into a list.
    Fold { fold_scope: FoldLocation },
    /// Exit the innermost fold scope.
    Unfold,
    /// Return to a previously visited location after a branch completes.
    Backtrack { location: Location },
    /// Bind the next sequential point to a location identifier.
    MarkLocation { location: Location },
    /// Narrow the runtime type at the current point.
    CoerceType { target_types: BTreeSet<String> },
    /// A predicate that must hold for the current point to remain in the
    /// result.
    Filter { predicate: Expression },
    /// Sentinel between per-path traversal and query-wide post-processing.
    GlobalOperationsStart,
    /// The query's output projection, named column by named column.
    ConstructResult {
        outputs: BTreeMap<String, Expression>,
    },
}

impl IrBlock {
    /// Narrows the current point to a single type.
    pub fn coerce_to(type_name: impl Into<String>) -> Self {
        IrBlock::CoerceType {
            target_types: BTreeSet::from([type_name.into()]),
        }
    }

    /// Whether this block moves the traversal to a new position.
    pub fn is_traversal_step(&self) -> bool {
        matches!(
            self,
            IrBlock::Traverse { .. } | IrBlock::Fold { .. } | IrBlock::Recurse { .. }
        )
    }

    /// The expressions embedded in this block, if any.
    pub fn expressions(&self) -> Vec<&Expression> {
        match self {
            IrBlock::Filter { predicate } => vec![predicate],
            IrBlock::ConstructResult { outputs } => outputs.values().collect(),
            IrBlock::QueryRoot { .. }
            | IrBlock::Traverse { .. }
            | IrBlock::Recurse { .. }
            | IrBlock::Fold { .. }
            | IrBlock::Unfold
            | IrBlock::Backtrack { .. }
            | IrBlock::MarkLocation { .. }
            | IrBlock::CoerceType { .. }
            | IrBlock::GlobalOperationsStart => Vec::new(),
        }
    }

    /// Stable name of the block kind, for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            IrBlock::QueryRoot { .. } => "QueryRoot",
            IrBlock::Traverse { .. } => "Traverse",
            IrBlock::Recurse { .. } => "Recurse",
            IrBlock::Fold { .. } => "Fold",
            IrBlock::Unfold => "Unfold",
            IrBlock::Backtrack { .. } => "Backtrack",
            IrBlock::MarkLocation { .. } => "MarkLocation",
            IrBlock::CoerceType { .. } => "CoerceType",
            IrBlock::Filter { .. } => "Filter",
            IrBlock::GlobalOperationsStart => "GlobalOperationsStart",
            IrBlock::ConstructResult { .. } => "ConstructResult",
        }
    }
}
