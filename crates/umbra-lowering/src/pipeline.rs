//! Fixed-order composition of the lowering passes.

use tracing::debug;

use umbra_ir::{IrBlock, Result};

use crate::local_fields::resolve_local_fields;
use crate::metadata::QueryMetadata;
use crate::optional_filters::hoist_optional_filters;
use crate::revisits::remove_location_revisits;
use crate::type_bounds::insert_explicit_type_bounds;

/// Lowers one compiled query into the form backend code generators
/// consume.
///
/// The pass order is a correctness requirement, not a preference: filters
/// may only be relocated (pass 4) once every type, location, and field
/// reference inside them is concrete and unambiguous (passes 1 through 3).
/// The driver adds no validation of its own and lets any fault from a
/// pass propagate to the caller untouched.
pub fn lower_ir(blocks: &[IrBlock], metadata: &dyn QueryMetadata) -> Result<Vec<IrBlock>> {
    let input_len = blocks.len();

    let lowered = insert_explicit_type_bounds(blocks, metadata)?;
    debug!(
        blocks_in = input_len,
        blocks_out = lowered.len(),
        "lowering.pass.type_bounds"
    );

    let input_len = lowered.len();
    let lowered = remove_location_revisits(&lowered, metadata)?;
    debug!(
        blocks_in = input_len,
        blocks_out = lowered.len(),
        "lowering.pass.revisits"
    );

    let lowered = resolve_local_fields(&lowered)?;
    debug!(blocks = lowered.len(), "lowering.pass.local_fields");

    let lowered = hoist_optional_filters(&lowered, metadata)?;
    debug!(blocks = lowered.len(), "lowering.pass.optional_filters");

    Ok(lowered)
}
