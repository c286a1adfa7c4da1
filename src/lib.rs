//! # r2rml-unfold
//!
//! Compiles R2RML triples maps into SQL queries that fetch exactly the
//! columns needed to materialize their triples.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │          MappingDocument (JSON, linked references)       │
//! │   triples maps: logical table, subject, pred-obj maps    │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [unfold]
//! ┌─────────────────────────────────────────────────────────┐
//! │   Query AST per triples map         AliasRegistry        │
//! │   (T1 base, LEFT JOIN T2.., WHERE)  (term map -> alias)  │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [sql]
//! ┌─────────────────────────────────────────────────────────┐
//! │      SQL text: Postgres | MySQL | T-SQL | DuckDB         │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use r2rml_unfold::prelude::*;
//!
//! let document = MappingDocument::from_json(json)?;
//! let mut unfolder = Unfolder::with_dialect(Dialect::Postgres);
//! for (id, query) in unfolder.unfold_document(&document) {
//!     println!("-- {id}\n{query}");
//! }
//! ```

pub mod config;
pub mod mapping;
pub mod sql;
pub mod unfold;

// Re-export SQL submodules at crate level
pub use sql::dialect;
pub use sql::expr;
pub use sql::query;
pub use sql::token;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::config::{AliasCollisionPolicy, Settings};
    pub use crate::dialect::{Dialect, SqlDialect};
    pub use crate::mapping::{
        JoinCondition, LogicalTable, MappingDocument, ObjectMap, PredicateMap,
        PredicateObjectKey, PredicateObjectMap, RefObjectMap, SubjectMap, TermMap, TermMapKey,
        TermMapValue, TriplesMap,
    };
    pub use crate::query::{FromItem, JoinTable, JoinType, Query, SelectItem, TableRef};
    pub use crate::unfold::{AliasRegistry, UnfoldError, UnfoldResult, Unfolder};
}
