//! SQL generation module.
//!
//! This module provides the type-safe SQL builder unfolded queries are
//! expressed in. It includes:
//!
//! - [`query`] - SELECT query AST (select list, from-items, joins, filter)
//! - [`expr`] - Expression AST and builder DSL
//! - [`parse`] - Parsing of raw `rr:sqlQuery` text
//! - [`token`] - Token types for SQL generation
//! - [`dialect`] - SQL dialect implementations

pub mod dialect;
pub mod expr;
pub mod parse;
pub mod query;
pub mod token;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types at the sql module level
pub use dialect::{Dialect, SqlDialect, UnknownDialect};
pub use expr::{
    col, lit_bool, lit_int, lit_str, table_col, BinaryOperator, Expr, ExprExt, Literal,
};
pub use parse::{ensure_terminated, parse_select, strip_terminator, RawQueryError};
pub use query::{FromItem, JoinTable, JoinType, Query, SelectItem, TableRef};
pub use token::{Token, TokenStream};
