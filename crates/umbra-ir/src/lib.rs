#![forbid(unsafe_code)]

//! Backend-agnostic intermediate representation for compiled graph queries.
//!
//! A compiled query is a linear sequence of [`IrBlock`]s, each possibly
//! carrying an [`Expression`] tree. Positions reached by the traversal are
//! identified by immutable [`Location`] values minted by the front end;
//! the lowering passes only rename or drop references to them.

pub mod block;
pub mod expression;
pub mod location;

pub use block::IrBlock;
pub use expression::{BinaryOperator, Expression, LiteralValue};
pub use location::{EdgeDirection, FieldRef, FoldLocation, Location, VertexLocation};

/// Faults raised by the lowering pipeline.
///
/// Both variants signal a defect in the front end, the metadata table, or
/// the pipeline itself, never a problem with user input. They are fatal:
/// no pass retries, recovers, or emits a partial result.
#[derive(thiserror::Error, Debug)]
pub enum LoweringError {
    /// A structural assumption about the input block sequence was violated.
    #[error("malformed IR: {0}")]
    MalformedIr(String),
    /// A pass's own output failed its stated invariant.
    #[error("lowering invariant violated: {0}")]
    InvariantViolation(String),
}

pub type Result<T> = std::result::Result<T, LoweringError>;
