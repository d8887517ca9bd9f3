#![forbid(unsafe_code)]

//! Lowering passes that rewrite backend-agnostic traversal IR into a shape
//! backend code generators can emit directly.
//!
//! The pipeline preserves the source language's `@optional` and `@fold`
//! semantics, which differ from the native optional-match semantics of
//! typical backends: a filter on a property behind an optional edge must
//! only suppress a row when the edge exists and the filter fails, never
//! when the edge is absent. See [`pipeline::lower_ir`] for the fixed pass
//! order that upholds this.

pub mod local_fields;
pub mod metadata;
pub mod optional_filters;
pub mod pipeline;
pub mod revisits;
pub mod rewrite;
pub mod type_bounds;

pub use metadata::{InMemoryMetadata, LocationInfo, QueryMetadata};
pub use pipeline::lower_ir;
