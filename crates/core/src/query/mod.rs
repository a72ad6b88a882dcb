//! Building blocks for exclusion clauses.

#![allow(missing_docs)]

mod args;
mod clauses;
pub mod columns;
mod predicate;

pub use args::QueryArgs;
pub use clauses::{JoinClauses, JoinFragment, WhereConditions};
pub use predicate::{ColumnPath, IdSet, Literal, Predicate};
