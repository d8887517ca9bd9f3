//! Pass 2: eliminate location revisits.
//!
//! The front end models "returning to an optional branch's origin" by
//! minting a fresh, semantically equivalent location and marking it again.
//! Backends without a revisit concept need neither the duplicate binding
//! nor references to it, so the duplicate `MarkLocation`s are dropped and
//! every expression is rewritten to read from the origin instead.

use tracing::debug;

use umbra_ir::{IrBlock, LoweringError, Result};

use crate::metadata::QueryMetadata;
use crate::rewrite::{location_rewriter, rewrite_block_expressions};

/// Drops revisit `MarkLocation`s and redirects all expression references
/// from revisit locations to their origins.
///
/// The revisit-to-origin translation map comes from `metadata`. Output
/// block count equals input count minus the dropped marks, and no block
/// in the output references a revisit location; the latter is re-checked
/// before returning and a violation is an internal fault.
pub fn remove_location_revisits(
    blocks: &[IrBlock],
    metadata: &dyn QueryMetadata,
) -> Result<Vec<IrBlock>> {
    let translations = metadata.revisit_translations();
    let mut rewriter = location_rewriter(translations);

    let mut lowered = Vec::with_capacity(blocks.len());
    let mut dropped = 0usize;
    for block in blocks {
        match block {
            IrBlock::MarkLocation { location } if translations.contains_key(location) => {
                dropped += 1;
            }
            _ => lowered.push(rewrite_block_expressions(block, &mut rewriter)),
        }
    }
    debug!(dropped, "lowering.revisits.marks_removed");

    for block in &lowered {
        for expression in block.expressions() {
            for location in expression.referenced_locations() {
                if translations.contains_key(location) {
                    return Err(LoweringError::InvariantViolation(format!(
                        "revisit location {location} is still referenced after elimination",
                    )));
                }
            }
        }
    }

    Ok(lowered)
}
