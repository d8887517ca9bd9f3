//! Pass 1: make destination types explicit after every traversal step.
//!
//! Backends are not necessarily aware that every edge endpoint in the
//! schema is strictly typed, so the implicit type of each traversed
//! destination is exposed as an explicit `CoerceType` block.

use tracing::trace;

use umbra_ir::{IrBlock, Location, LoweringError, Result};

use crate::metadata::QueryMetadata;

/// What the lookahead from a traversal step found first.
enum Lookahead<'a> {
    AlreadyCoerced,
    MarkedAt(&'a Location),
}

/// Guarantees a `CoerceType` immediately follows every `Traverse`, `Fold`,
/// and `Recurse` block.
///
/// Filtering happens before location-marking, so reaching a `MarkLocation`
/// without passing a `CoerceType` means no coercion exists for the step;
/// the destination's declared type is then read from `metadata` and a new
/// `CoerceType` is inserted directly after the triggering block, before
/// any skipped `Filter`s, so those filters can rely on the narrowed type.
/// Block count only grows and the relative order of the original blocks is
/// preserved, which also makes the pass idempotent.
pub fn insert_explicit_type_bounds(
    blocks: &[IrBlock],
    metadata: &dyn QueryMetadata,
) -> Result<Vec<IrBlock>> {
    let mut lowered = Vec::with_capacity(blocks.len());

    for (index, block) in blocks.iter().enumerate() {
        lowered.push(block.clone());
        if !block.is_traversal_step() {
            continue;
        }

        let mut found = None;
        for lookahead in &blocks[index + 1..] {
            match lookahead {
                IrBlock::CoerceType { .. } => {
                    found = Some(Lookahead::AlreadyCoerced);
                    break;
                }
                IrBlock::MarkLocation { location } => {
                    found = Some(Lookahead::MarkedAt(location));
                    break;
                }
                IrBlock::Filter { .. } => continue,
                other => {
                    return Err(LoweringError::MalformedIr(format!(
                        "expected only Filter or CoerceType between the {} at index {index} \
                         and its MarkLocation, found {}",
                        block.kind_name(),
                        other.kind_name(),
                    )))
                }
            }
        }

        match found {
            Some(Lookahead::AlreadyCoerced) => {}
            Some(Lookahead::MarkedAt(location)) => {
                let info = metadata.location_info(location)?;
                trace!(
                    destination = %location,
                    type_name = %info.type_name,
                    "lowering.type_bounds.insert"
                );
                lowered.push(IrBlock::coerce_to(info.type_name.clone()));
            }
            None => {
                return Err(LoweringError::MalformedIr(format!(
                    "the {} at index {index} has no MarkLocation or CoerceType after it",
                    block.kind_name(),
                )))
            }
        }
    }

    Ok(lowered)
}
