//! Generic expression rewriting over IR blocks.

use rustc_hash::FxHashMap;

use umbra_ir::{Expression, IrBlock, Location};

/// Applies `f` to every expression embedded in `block`, bottom-up through
/// each tree. Blocks that carry no expressions come back as structural
/// clones. `f` must be total over every [`Expression`] variant; it may not
/// assume any particular variant is absent.
pub fn rewrite_block_expressions<F>(block: &IrBlock, f: &mut F) -> IrBlock
where
    F: FnMut(Expression) -> Expression,
{
    match block {
        IrBlock::Filter { predicate } => IrBlock::Filter {
            predicate: predicate.clone().map(f),
        },
        IrBlock::ConstructResult { outputs } => IrBlock::ConstructResult {
            outputs: outputs
                .iter()
                .map(|(name, output)| (name.clone(), output.clone().map(f)))
                .collect(),
        },
        IrBlock::QueryRoot { .. }
        | IrBlock::Traverse { .. }
        | IrBlock::Recurse { .. }
        | IrBlock::Fold { .. }
        | IrBlock::Unfold
        | IrBlock::Backtrack { .. }
        | IrBlock::MarkLocation { .. }
        | IrBlock::CoerceType { .. }
        | IrBlock::GlobalOperationsStart => block.clone(),
    }
}

/// Builds a rewrite function that substitutes every context-field read of
/// a location keyed in `translations` with the mapped origin location.
pub fn location_rewriter(
    translations: &FxHashMap<Location, Location>,
) -> impl FnMut(Expression) -> Expression + '_ {
    move |expression| match expression {
        Expression::ContextField { mut field } => {
            if let Some(origin) = translations.get(&field.location) {
                field.location = origin.clone();
            }
            Expression::ContextField { field }
        }
        Expression::FoldedContextField { mut field } => {
            if let Some(origin) = translations.get(&field.location) {
                field.location = origin.clone();
            }
            Expression::FoldedContextField { field }
        }
        other => other,
    }
}
