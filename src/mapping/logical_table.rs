//! Logical tables - the row source of a triples map.

use serde::{Deserialize, Serialize};

/// Row source of a triples map (`rr:logicalTable`).
///
/// Serialized with a `kind` tag:
///
/// ```json
/// { "kind": "table_name", "name": "employee" }
/// { "kind": "query_string", "query": "SELECT id, name FROM employee" }
/// ```
///
/// Any other `kind` deserializes to [`LogicalTable::Unsupported`], which the
/// unfolder reports as a rule without a usable source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LogicalTable {
    /// `rr:tableName` - a base table or view, optionally schema-qualified.
    TableName { name: String },

    /// `rr:sqlQuery` - raw SQL text.
    QueryString { query: String },

    /// A row source kind this crate does not understand.
    #[serde(other)]
    Unsupported,
}

impl LogicalTable {
    pub fn table_name(name: impl Into<String>) -> Self {
        LogicalTable::TableName { name: name.into() }
    }

    pub fn query_string(query: impl Into<String>) -> Self {
        LogicalTable::QueryString {
            query: query.into(),
        }
    }

    /// Short name of the variant, for log output.
    pub fn kind(&self) -> &'static str {
        match self {
            LogicalTable::TableName { .. } => "table_name",
            LogicalTable::QueryString { .. } => "query_string",
            LogicalTable::Unsupported => "unsupported",
        }
    }
}
