//! Pass 4: defer optional-scope filters to the global section.
//!
//! A filter on a property reached through an `@optional` edge must only
//! suppress a result row when the edge exists and the filter fails; a
//! missing optional edge is never a filter failure. Backends whose native
//! optional-match semantics suppress the row on any filter failure get
//! the correct behavior by materializing the optional branch first and
//! filtering afterwards, so every filter inside an optional scope moves
//! to just after the `GlobalOperationsStart` sentinel.
//!
//! Must run after local-field resolution: relocating a filter that still
//! contains a `LocalField` would silently change its meaning.

use tracing::debug;

use umbra_ir::{IrBlock, LoweringError, Result};

use crate::metadata::QueryMetadata;

/// Moves every `Filter` lying inside an optional scope to immediately
/// after the single `GlobalOperationsStart` block, preserving the
/// filters' relative order.
///
/// Scope tracking is a single flag: set on entering an optional
/// `Traverse`, and recomputed from the metadata table on every
/// `Backtrack` so that leaving an inner optional scope keeps an enclosing
/// one active. Filters outside optional scopes are never touched.
pub fn hoist_optional_filters(
    blocks: &[IrBlock],
    metadata: &dyn QueryMetadata,
) -> Result<Vec<IrBlock>> {
    let mut lowered = Vec::with_capacity(blocks.len());
    let mut hoisted: Vec<IrBlock> = Vec::new();
    let mut within_optional = false;

    for block in blocks {
        match block {
            IrBlock::Filter { .. } if within_optional => {
                hoisted.push(block.clone());
                continue;
            }
            IrBlock::Traverse { optional: true, .. } => {
                within_optional = true;
            }
            IrBlock::Backtrack { location } => {
                within_optional = metadata.location_info(location)?.optional_scopes_depth > 0;
            }
            _ => {}
        }

        lowered.push(block.clone());
        if matches!(block, IrBlock::GlobalOperationsStart) {
            debug!(filters = hoisted.len(), "lowering.optional_filters.hoisted");
            lowered.append(&mut hoisted);
        }
    }

    if !hoisted.is_empty() {
        return Err(LoweringError::MalformedIr(format!(
            "{} optional-scope filters have no GlobalOperationsStart to move to",
            hoisted.len(),
        )));
    }
    Ok(lowered)
}
