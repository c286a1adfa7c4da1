//! Mapping documents and triples maps.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::logical_table::LogicalTable;
use super::template::parse_template;
use super::term_map::{PredicateObjectMap, SubjectMap, TermMapValue};
use super::MappingError;

/// One mapping rule (`rr:TriplesMap`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriplesMap {
    /// Unique id within the document.
    pub id: String,
    pub logical_table: LogicalTable,
    pub subject_map: SubjectMap,
    #[serde(default)]
    pub predicate_object_maps: Vec<PredicateObjectMap>,
}

impl TriplesMap {
    pub fn new(id: impl Into<String>, logical_table: LogicalTable, subject_map: SubjectMap) -> Self {
        Self {
            id: id.into(),
            logical_table,
            subject_map,
            predicate_object_maps: Vec::new(),
        }
    }

    pub fn with_predicate_object_map(mut self, pom: PredicateObjectMap) -> Self {
        self.predicate_object_maps.push(pom);
        self
    }

    /// Every term map value in this rule, subject first.
    fn term_map_values(&self) -> impl Iterator<Item = &TermMapValue> {
        let pom_values = self.predicate_object_maps.iter().flat_map(|pom| {
            pom.predicate_maps
                .iter()
                .map(|pm| &pm.value)
                .chain(pom.object_maps.iter().map(|om| &om.value))
        });
        std::iter::once(&self.subject_map.value).chain(pom_values)
    }
}

/// An ordered collection of triples maps.
///
/// ```json
/// {
///   "triples_maps": [
///     {
///       "id": "EmployeeMap",
///       "logical_table": { "kind": "table_name", "name": "employee" },
///       "subject_map": { "template": "http://example.org/emp/{id}" },
///       "predicate_object_maps": [
///         {
///           "predicate_maps": [{ "constant": "http://example.org/name" }],
///           "object_maps": [{ "column": "name" }]
///         }
///       ]
///     }
///   ]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingDocument {
    #[serde(default)]
    pub triples_maps: Vec<TriplesMap>,
}

impl MappingDocument {
    pub fn new(triples_maps: Vec<TriplesMap>) -> Self {
        Self { triples_maps }
    }

    /// Parse, validate, and link a JSON mapping document.
    pub fn from_json(json: &str) -> Result<Self, MappingError> {
        let mut document: MappingDocument = serde_json::from_str(json)?;
        document.validate()?;
        document.link();
        Ok(document)
    }

    /// Load a JSON mapping document from disk.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MappingError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Look up a triples map by id.
    pub fn get(&self, id: &str) -> Option<&TriplesMap> {
        self.triples_maps.iter().find(|tm| tm.id == id)
    }

    /// Check ids are unique and every template is well formed.
    pub fn validate(&self) -> Result<(), MappingError> {
        let mut seen = HashSet::new();
        for tm in &self.triples_maps {
            if !seen.insert(tm.id.as_str()) {
                return Err(MappingError::DuplicateTriplesMap(tm.id.clone()));
            }
            for value in tm.term_map_values() {
                if let TermMapValue::Template(template) = value {
                    parse_template(template)?;
                }
            }
        }
        Ok(())
    }

    /// Resolve every referencing object map against its parent triples map.
    ///
    /// Copies the parent's logical table and subject map into the reference.
    /// References to unknown parents are left as they are; unfolding such a
    /// rule fails on its own without affecting the rest of the document.
    pub fn link(&mut self) {
        let parents: HashMap<String, (LogicalTable, TermMapValue)> = self
            .triples_maps
            .iter()
            .map(|tm| {
                (
                    tm.id.clone(),
                    (tm.logical_table.clone(), tm.subject_map.value.clone()),
                )
            })
            .collect();

        for tm in &mut self.triples_maps {
            for pom in &mut tm.predicate_object_maps {
                for rom in &mut pom.ref_object_maps {
                    if let Some((table, subject)) = parents.get(&rom.parent_triples_map) {
                        rom.parent_logical_table = Some(table.clone());
                        rom.parent_subject = Some(subject.clone());
                    }
                }
            }
        }
    }

    /// Report the first referencing object map whose parent is not in the
    /// document.
    pub fn check_references(&self) -> Result<(), MappingError> {
        for tm in &self.triples_maps {
            for pom in &tm.predicate_object_maps {
                for rom in &pom.ref_object_maps {
                    if self.get(&rom.parent_triples_map).is_none() {
                        return Err(MappingError::UnresolvedParentTriplesMap {
                            triples_map: tm.id.clone(),
                            parent: rom.parent_triples_map.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}
