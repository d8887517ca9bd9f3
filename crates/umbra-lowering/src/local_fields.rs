//! Pass 3: bind unqualified field reads to their owning location.
//!
//! A `LocalField` means "this field, at whichever location is currently
//! open" and is only meaningful while block position and open location
//! are still synonymous. Once later passes may physically relocate
//! filters, every such read must name its location explicitly.

use tracing::debug;

use umbra_ir::{Expression, IrBlock, LoweringError, Result};

use crate::rewrite::rewrite_block_expressions;

/// Rewrites every `LocalField` into a `ContextField` (or a
/// `FoldedContextField` when the owning location is a fold-scope
/// location) naming the location whose `MarkLocation` closes the block's
/// segment.
///
/// Blocks accumulate in a pending buffer until the next `MarkLocation`
/// binds and flushes them. Blocks left pending after the final
/// `MarkLocation` belong to the global section and are emitted
/// unrewritten. This is a strict 1:1 rewrite: a changed block count is an
/// internal fault.
pub fn resolve_local_fields(blocks: &[IrBlock]) -> Result<Vec<IrBlock>> {
    let mut lowered = Vec::with_capacity(blocks.len());
    let mut pending: Vec<&IrBlock> = Vec::new();

    for block in blocks {
        match block {
            IrBlock::MarkLocation { location } => {
                let mut bind = |expression: Expression| match expression {
                    Expression::LocalField { field_name } => {
                        let field = location.navigate_to_field(field_name);
                        if location.is_fold() {
                            Expression::FoldedContextField { field }
                        } else {
                            Expression::ContextField { field }
                        }
                    }
                    other => other,
                };
                for buffered in pending.drain(..) {
                    lowered.push(rewrite_block_expressions(buffered, &mut bind));
                }
                lowered.push(block.clone());
            }
            other => pending.push(other),
        }
    }
    lowered.extend(pending.drain(..).cloned());

    if lowered.len() != blocks.len() {
        return Err(LoweringError::InvariantViolation(format!(
            "local-field resolution changed the block count: {} in, {} out",
            blocks.len(),
            lowered.len(),
        )));
    }
    debug!(blocks = lowered.len(), "lowering.local_fields.resolved");
    Ok(lowered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use umbra_ir::{
        BinaryOperator, EdgeDirection, FoldLocation, LiteralValue, Location, VertexLocation,
    };

    fn local_name_filter() -> IrBlock {
        IrBlock::Filter {
            predicate: Expression::binary(
                BinaryOperator::Equals,
                Expression::LocalField {
                    field_name: "name".into(),
                },
                Expression::Variable {
                    name: "wanted_name".into(),
                },
            ),
        }
    }

    #[test]
    fn buffered_filters_bind_to_the_following_mark() {
        let account = VertexLocation::new("Account");
        let follows = account.step("out_Account_Follows");
        let blocks = vec![
            IrBlock::MarkLocation {
                location: account.into(),
            },
            IrBlock::Traverse {
                direction: EdgeDirection::Out,
                edge_name: "out_Account_Follows".into(),
                optional: false,
            },
            local_name_filter(),
            IrBlock::MarkLocation {
                location: follows.clone().into(),
            },
        ];
        let lowered = resolve_local_fields(&blocks).expect("lowering succeeds");

        assert_eq!(lowered.len(), blocks.len());
        match &lowered[2] {
            IrBlock::Filter { predicate } => {
                assert!(!predicate.contains_local_field());
                let expected = Location::from(follows).navigate_to_field("name");
                assert!(predicate.referenced_locations().contains(&&expected.location));
                match predicate {
                    Expression::BinaryComposition { left, .. } => match left.as_ref() {
                        Expression::ContextField { field } => assert_eq!(*field, expected),
                        other => panic!("unexpected left operand: {other:?}"),
                    },
                    other => panic!("unexpected predicate: {other:?}"),
                }
            }
            other => panic!("unexpected block: {other:?}"),
        }
    }

    #[test]
    fn fold_scope_locations_bind_folded_reads() {
        let account = VertexLocation::new("Account");
        let fold = FoldLocation::new(account, EdgeDirection::Out, "out_Account_Posts");
        let blocks = vec![
            IrBlock::Fold {
                fold_scope: fold.clone(),
            },
            local_name_filter(),
            IrBlock::MarkLocation {
                location: fold.clone().into(),
            },
        ];
        let lowered = resolve_local_fields(&blocks).expect("lowering succeeds");

        match &lowered[1] {
            IrBlock::Filter { predicate } => match predicate {
                Expression::BinaryComposition { left, .. } => match left.as_ref() {
                    Expression::FoldedContextField { field } => {
                        assert_eq!(field.location, Location::from(fold));
                        assert_eq!(field.field, "name");
                    }
                    other => panic!("unexpected left operand: {other:?}"),
                },
                other => panic!("unexpected predicate: {other:?}"),
            },
            other => panic!("unexpected block: {other:?}"),
        }
    }

    #[test]
    fn the_global_section_tail_is_emitted_unrewritten() {
        let account = Location::at("Account");
        let output = Expression::ContextField {
            field: account.navigate_to_field("name"),
        };
        let blocks = vec![
            IrBlock::MarkLocation {
                location: account.clone(),
            },
            IrBlock::GlobalOperationsStart,
            IrBlock::ConstructResult {
                outputs: BTreeMap::from([("name".to_string(), output)]),
            },
        ];
        let lowered = resolve_local_fields(&blocks).expect("lowering succeeds");
        assert_eq!(lowered, blocks);
    }

    #[test]
    fn literal_only_predicates_survive_binding_untouched() {
        let account = Location::at("Account");
        let filter = IrBlock::Filter {
            predicate: Expression::Literal(LiteralValue::Bool(true)),
        };
        let blocks = vec![
            filter.clone(),
            IrBlock::MarkLocation { location: account },
        ];
        let lowered = resolve_local_fields(&blocks).expect("lowering succeeds");
        assert_eq!(lowered[0], filter);
    }
}
