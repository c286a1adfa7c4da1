//! Referencing object maps (`rr:parentTriplesMap`).
//!
//! A referencing object map produces its object from the subject of a
//! parent triples map, joined to the child row by column equalities.

use serde::{Deserialize, Serialize};

use super::logical_table::LogicalTable;
use super::term_map::{TermMap, TermMapValue};

/// Reference to another triples map with join conditions.
///
/// ```json
/// {
///   "parent_triples_map": "DepartmentMap",
///   "join_conditions": [{ "child": "dept_id", "parent": "id" }]
/// }
/// ```
///
/// `parent_logical_table` and `parent_subject` are filled in by
/// [`MappingDocument::link`](super::MappingDocument::link). A document may
/// also carry the parent logical table inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefObjectMap {
    /// Id of the parent triples map.
    pub parent_triples_map: String,

    /// Join conditions (may be empty for a cross join).
    #[serde(default)]
    pub join_conditions: Vec<JoinCondition>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_logical_table: Option<LogicalTable>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_subject: Option<TermMapValue>,
}

impl RefObjectMap {
    pub fn new(parent_triples_map: impl Into<String>) -> Self {
        Self {
            parent_triples_map: parent_triples_map.into(),
            join_conditions: Vec::new(),
            parent_logical_table: None,
            parent_subject: None,
        }
    }

    /// Add a join condition.
    pub fn with_condition(mut self, child: impl Into<String>, parent: impl Into<String>) -> Self {
        self.join_conditions.push(JoinCondition::new(child, parent));
        self
    }

    /// Columns of the parent subject, read through the join.
    pub fn parent_columns(&self) -> Vec<String> {
        self.parent_subject
            .as_ref()
            .map(TermMapValue::columns)
            .unwrap_or_default()
    }

    pub fn child_columns(&self) -> Vec<&str> {
        self.join_conditions
            .iter()
            .map(|jc| jc.child.as_str())
            .collect()
    }

    pub fn has_conditions(&self) -> bool {
        !self.join_conditions.is_empty()
    }
}

impl TermMap for RefObjectMap {
    fn columns(&self) -> Vec<String> {
        self.parent_columns()
    }
}

/// A single `rr:joinCondition`: `child.<child> = parent.<parent>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinCondition {
    /// Column in the child triples map's logical table.
    pub child: String,
    /// Column in the parent triples map's logical table.
    pub parent: String,
}

impl JoinCondition {
    pub fn new(child: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            child: child.into(),
            parent: parent.into(),
        }
    }
}
