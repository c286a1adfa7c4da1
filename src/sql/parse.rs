//! Raw SQL parsing for `rr:sqlQuery` logical tables.
//!
//! Mapping documents may carry arbitrary SQL text as a row source. This
//! module turns that text into a structured `sqlparser` query so it can be
//! nested as a sub-query. Callers decide what to do when parsing fails.

use sqlparser::ast::{Query as ParsedQuery, Statement};
use sqlparser::parser::Parser;
use thiserror::Error;

use super::dialect::{Dialect, SqlDialect};

/// Statement terminator appended to raw SQL text before parsing.
pub const STATEMENT_TERMINATOR: char = ';';

/// Errors produced while parsing raw SQL text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RawQueryError {
    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Expected a single SELECT statement, found {0} statements")]
    StatementCount(usize),

    #[error("Statement is not a SELECT query")]
    NotASelect,
}

/// Ensure the text ends with a statement terminator.
///
/// Trailing whitespace is dropped before checking; text that already ends
/// with `;` is returned unchanged apart from that trim.
pub fn ensure_terminated(sql: &str) -> String {
    let trimmed = sql.trim_end();
    if trimmed.ends_with(STATEMENT_TERMINATOR) {
        trimmed.to_string()
    } else {
        format!("{trimmed}{STATEMENT_TERMINATOR}")
    }
}

/// Strip trailing terminators (and whitespace) so the text can be nested
/// inside parentheses.
pub fn strip_terminator(sql: &str) -> &str {
    sql.trim_end()
        .trim_end_matches(STATEMENT_TERMINATOR)
        .trim_end()
}

/// Whether the last line of the text carries a `--` comment, which would
/// swallow anything rendered after it on the same line.
pub fn ends_in_line_comment(sql: &str) -> bool {
    strip_terminator(sql)
        .lines()
        .last()
        .is_some_and(|line| line.contains("--"))
}

/// Parse SQL text into a single SELECT query.
pub fn parse_select(sql: &str, dialect: Dialect) -> Result<Box<ParsedQuery>, RawQueryError> {
    let parser_dialect = dialect.parser_dialect();
    let mut statements = Parser::parse_sql(&*parser_dialect, sql)
        .map_err(|e| RawQueryError::Syntax(e.to_string()))?;

    if statements.len() != 1 {
        return Err(RawQueryError::StatementCount(statements.len()));
    }

    match statements.remove(0) {
        Statement::Query(query) => Ok(query),
        _ => Err(RawQueryError::NotASelect),
    }
}
