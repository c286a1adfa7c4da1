//! Term maps - how subjects, predicates, and objects are read from a row.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::ref_object_map::RefObjectMap;
use super::template::{extract_template_columns, match_template};
use crate::sql::dialect::helpers::unquote_double;
use crate::sql::expr::{lit_bool, table_col, Expr, ExprExt};

/// The columns a term map reads.
///
/// Constant terms read nothing and return an empty list.
pub trait TermMap {
    fn columns(&self) -> Vec<String>;
}

/// How a term is produced: a constant, a column value, or a template.
///
/// ```json
/// { "constant": "http://example.org/name" }
/// { "column": "name" }
/// { "template": "http://example.org/emp/{id}" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TermMapValue {
    /// `rr:constant`
    Constant(String),
    /// `rr:column`
    Column(String),
    /// `rr:template`
    Template(String),
}

impl TermMapValue {
    /// Referenced columns, in order of first appearance.
    pub fn columns(&self) -> Vec<String> {
        match self {
            TermMapValue::Constant(_) => Vec::new(),
            TermMapValue::Column(column) => vec![column.clone()],
            TermMapValue::Template(template) => extract_template_columns(template),
        }
    }

    /// Source text of the term map, for messages.
    pub fn text(&self) -> &str {
        match self {
            TermMapValue::Constant(s) | TermMapValue::Column(s) | TermMapValue::Template(s) => s,
        }
    }
}

/// `rr:subjectMap`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectMap {
    pub value: TermMapValue,
}

impl SubjectMap {
    pub fn new(value: TermMapValue) -> Self {
        Self { value }
    }

    pub fn template(template: impl Into<String>) -> Self {
        Self::new(TermMapValue::Template(template.into()))
    }

    pub fn column(column: impl Into<String>) -> Self {
        Self::new(TermMapValue::Column(column.into()))
    }

    /// Condition restricting rows of `alias` to those whose rendered
    /// subject equals `value`.
    ///
    /// Returns `None` when no row could produce `value`: a template whose
    /// literal text does not match, or a constant that differs. A matching
    /// constant yields the always-true condition.
    pub fn condition_for_value(&self, value: &str, alias: &str) -> Option<Expr> {
        match &self.value {
            TermMapValue::Column(column) => {
                Some(table_col(alias, &unquote_double(column)).eq(value))
            }
            TermMapValue::Template(template) => {
                let bindings = match_template(template, value)?;
                let conditions = bindings
                    .into_iter()
                    .map(|(column, v)| table_col(alias, &unquote_double(&column)).eq(v));
                Some(Expr::conjunction(conditions).unwrap_or_else(|| lit_bool(true)))
            }
            TermMapValue::Constant(constant) => (constant == value).then(|| lit_bool(true)),
        }
    }
}

impl TermMap for SubjectMap {
    fn columns(&self) -> Vec<String> {
        self.value.columns()
    }
}

/// `rr:predicateMap`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PredicateMap {
    pub value: TermMapValue,
}

impl PredicateMap {
    pub fn constant(iri: impl Into<String>) -> Self {
        Self {
            value: TermMapValue::Constant(iri.into()),
        }
    }
}

impl TermMap for PredicateMap {
    fn columns(&self) -> Vec<String> {
        self.value.columns()
    }
}

/// `rr:objectMap` (non-referencing)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectMap {
    pub value: TermMapValue,
}

impl ObjectMap {
    pub fn column(column: impl Into<String>) -> Self {
        Self {
            value: TermMapValue::Column(column.into()),
        }
    }

    pub fn template(template: impl Into<String>) -> Self {
        Self {
            value: TermMapValue::Template(template.into()),
        }
    }

    pub fn constant(value: impl Into<String>) -> Self {
        Self {
            value: TermMapValue::Constant(value.into()),
        }
    }
}

impl TermMap for ObjectMap {
    fn columns(&self) -> Vec<String> {
        self.value.columns()
    }
}

/// `rr:predicateObjectMap`
///
/// Only the first entry of each list takes part in unfolding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredicateObjectMap {
    #[serde(default)]
    pub predicate_maps: Vec<PredicateMap>,
    #[serde(default)]
    pub object_maps: Vec<ObjectMap>,
    #[serde(default)]
    pub ref_object_maps: Vec<RefObjectMap>,
}

impl PredicateObjectMap {
    pub fn new(predicate: PredicateMap) -> Self {
        Self {
            predicate_maps: vec![predicate],
            ..Self::default()
        }
    }

    pub fn with_object(mut self, object: ObjectMap) -> Self {
        self.object_maps.push(object);
        self
    }

    pub fn with_ref_object(mut self, ref_object: RefObjectMap) -> Self {
        self.ref_object_maps.push(ref_object);
        self
    }

    pub fn predicate_map(&self) -> Option<&PredicateMap> {
        self.predicate_maps.first()
    }

    pub fn object_map(&self) -> Option<&ObjectMap> {
        self.object_maps.first()
    }

    pub fn ref_object_map(&self) -> Option<&RefObjectMap> {
        self.ref_object_maps.first()
    }

    /// Name of the first predicate, for messages.
    pub fn predicate_name(&self) -> &str {
        self.predicate_map()
            .map(|pm| pm.value.text())
            .unwrap_or("<no predicate>")
    }
}

// =============================================================================
// Identity
// =============================================================================

/// Identity of a term map inside a document.
///
/// Term maps are addressed by position: the owning triples map id plus,
/// for predicate-object members, the index of the predicate-object map.
/// Only the first predicate, object, and referencing object map of an
/// association are addressable, matching what unfolding reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TermMapKey {
    Subject(String),
    Predicate(String, usize),
    Object(String, usize),
    RefObject(String, usize),
}

impl fmt::Display for TermMapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermMapKey::Subject(tm) => write!(f, "{tm}/subject"),
            TermMapKey::Predicate(tm, pom) => write!(f, "{tm}/pom[{pom}]/predicate"),
            TermMapKey::Object(tm, pom) => write!(f, "{tm}/pom[{pom}]/object"),
            TermMapKey::RefObject(tm, pom) => write!(f, "{tm}/pom[{pom}]/ref_object"),
        }
    }
}

/// Identity of a predicate-object map: triples map id and position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PredicateObjectKey(pub String, pub usize);

impl fmt::Display for PredicateObjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/pom[{}]", self.0, self.1)
    }
}
