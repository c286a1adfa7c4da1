//! Logical table resolution.
//!
//! Turns a triples map's row source into a from-item. Raw SQL that the
//! parser cannot read is passed through untouched rather than failing the
//! rule.

use tracing::warn;

use crate::mapping::LogicalTable;
use crate::sql::dialect::helpers::unquote_double as unquote;
use crate::sql::dialect::Dialect;
use crate::sql::parse::{ensure_terminated, parse_select};
use crate::sql::query::{FromItem, TableRef};

/// Resolve a logical table to a from-item.
///
/// Returns `None` for a logical table kind with no SQL counterpart.
pub fn resolve_logical_table(table: &LogicalTable, dialect: Dialect) -> Option<FromItem> {
    match table {
        LogicalTable::TableName { name } => Some(FromItem::Table(table_ref(name))),

        LogicalTable::QueryString { query } => {
            let sql = ensure_terminated(query);
            match parse_select(&sql, dialect) {
                Ok(parsed) => Some(FromItem::Subquery(parsed)),
                Err(e) => {
                    warn!(
                        error = %e,
                        %dialect,
                        "unable to parse logical table query, passing SQL text through"
                    );
                    Some(FromItem::RawSubquery(sql))
                }
            }
        }

        LogicalTable::Unsupported => {
            warn!(kind = table.kind(), "invalid logical table type");
            None
        }
    }
}

/// Build a table reference from an `rr:tableName` value.
///
/// Accepts `table` or `schema.table`; delimited parts (`"Emp"`) lose their
/// double quotes since the dialect re-quotes every identifier.
pub fn table_ref(name: &str) -> TableRef {
    match split_qualified(name) {
        Some((schema, table)) => TableRef::new(&unquote(table)).with_schema(&unquote(schema)),
        None => TableRef::new(&unquote(name)),
    }
}

/// Split `schema.table` at the first dot outside double quotes.
fn split_qualified(name: &str) -> Option<(&str, &str)> {
    let mut in_quotes = false;
    for (i, c) in name.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '.' if !in_quotes => return Some((&name[..i], &name[i + 1..])),
            _ => {}
        }
    }
    None
}
