//! Test utilities for SQL emission validation.
//!
//! Provides helpers for validating that emitted SQL is syntactically correct
//! using sqlparser-rs for roundtrip validation.

use sqlparser::parser::Parser;

use super::dialect::{Dialect, SqlDialect};

/// Validates that a SQL string is syntactically valid for the given dialect.
///
/// Uses the same `sqlparser` dialect that reads `rr:sqlQuery` text, so an
/// unfolded query is checked against the grammar of its target database.
///
/// # Example
///
/// ```ignore
/// use crate::sql::test_utils::validate_sql;
/// use crate::sql::dialect::Dialect;
///
/// let sql = "SELECT * FROM employee";
/// validate_sql(sql, Dialect::Postgres).unwrap();
/// ```
pub fn validate_sql(sql: &str, dialect: Dialect) -> Result<(), String> {
    let parser_dialect = dialect.parser_dialect();

    Parser::parse_sql(&*parser_dialect, sql)
        .map(|_| ())
        .map_err(|e| format!("Invalid SQL for {:?}: {}\nSQL: {}", dialect, e, sql))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_sql() {
        for dialect in Dialect::ALL {
            validate_sql("SELECT * FROM employee", dialect).unwrap();
        }
    }

    #[test]
    fn test_validate_invalid_sql() {
        let result = validate_sql("SELEC * FORM employee", Dialect::Postgres);
        assert!(result.is_err());
    }
}
