//! Expression trees embedded in filter and result-construction blocks.

use std::fmt;

use crate::location::{FieldRef, Location};

/// A literal value appearing in an expression.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

/// Binary operators usable in filter predicates.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BinaryOperator {
    Equals,
    NotEquals,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
    And,
    Or,
    Contains,
    HasSubstring,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            BinaryOperator::Equals => "=",
            BinaryOperator::NotEquals => "!=",
            BinaryOperator::LessThan => "<",
            BinaryOperator::LessThanOrEqual => "<=",
            BinaryOperator::GreaterThan => ">",
            BinaryOperator::GreaterThanOrEqual => ">=",
            BinaryOperator::And => "&&",
            BinaryOperator::Or => "||",
            BinaryOperator::Contains => "contains",
            BinaryOperator::HasSubstring => "has_substring",
        };
        write!(f, "{symbol}")
    }
}

/// A computed value used inside `Filter` and `ConstructResult` blocks.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Literal(LiteralValue),
    /// A runtime query parameter, bound at execution time.
    Variable { name: String },
    /// An unqualified property read at whichever location is currently
    /// open. Only valid until local-field resolution runs.
    LocalField { field_name: String },
    /// A property read fully qualified by an explicit location.
    ContextField { field: FieldRef },
    /// Like `ContextField`, but the location lies in a fold scope, so the
    /// read yields an aggregated list rather than a scalar.
    FoldedContextField { field: FieldRef },
    BinaryComposition {
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    TernaryConditional {
        predicate: Box<Expression>,
        if_true: Box<Expression>,
        if_false: Box<Expression>,
    },
}

impl Expression {
    /// Convenience constructor for a binary composition.
    pub fn binary(operator: BinaryOperator, left: Expression, right: Expression) -> Self {
        Expression::BinaryComposition {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Rewrites the tree bottom-up: children are rebuilt first, then `f`
    /// is applied to every node, leaves included. `f` must be total over
    /// all variants it may encounter.
    pub fn map<F>(self, f: &mut F) -> Expression
    where
        F: FnMut(Expression) -> Expression,
    {
        let rebuilt = match self {
            Expression::BinaryComposition {
                operator,
                left,
                right,
            } => Expression::BinaryComposition {
                operator,
                left: Box::new((*left).map(f)),
                right: Box::new((*right).map(f)),
            },
            Expression::TernaryConditional {
                predicate,
                if_true,
                if_false,
            } => Expression::TernaryConditional {
                predicate: Box::new((*predicate).map(f)),
                if_true: Box::new((*if_true).map(f)),
                if_false: Box::new((*if_false).map(f)),
            },
            leaf @ (Expression::Literal(_)
            | Expression::Variable { .. }
            | Expression::LocalField { .. }
            | Expression::ContextField { .. }
            | Expression::FoldedContextField { .. }) => leaf,
        };
        f(rebuilt)
    }

    /// Visits every node of the tree, children before parents.
    pub fn for_each<'a, F>(&'a self, f: &mut F)
    where
        F: FnMut(&'a Expression),
    {
        match self {
            Expression::BinaryComposition { left, right, .. } => {
                left.for_each(f);
                right.for_each(f);
            }
            Expression::TernaryConditional {
                predicate,
                if_true,
                if_false,
            } => {
                predicate.for_each(f);
                if_true.for_each(f);
                if_false.for_each(f);
            }
            Expression::Literal(_)
            | Expression::Variable { .. }
            | Expression::LocalField { .. }
            | Expression::ContextField { .. }
            | Expression::FoldedContextField { .. } => {}
        }
        f(self);
    }

    /// All locations this expression reads from.
    pub fn referenced_locations(&self) -> Vec<&Location> {
        let mut locations = Vec::new();
        self.for_each(&mut |node| match node {
            Expression::ContextField { field } | Expression::FoldedContextField { field } => {
                locations.push(&field.location);
            }
            _ => {}
        });
        locations
    }

    /// Whether any node of the tree is an unresolved `LocalField`.
    pub fn contains_local_field(&self) -> bool {
        let mut found = false;
        self.for_each(&mut |node| {
            found |= matches!(node, Expression::LocalField { .. });
        });
        found
    }
}
