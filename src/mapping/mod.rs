//! R2RML mapping object graph.
//!
//! A [`MappingDocument`] is a list of [`TriplesMap`]s, each with a
//! [`LogicalTable`] row source, a [`SubjectMap`], and
//! [`PredicateObjectMap`]s. Documents are read from JSON with
//! [`MappingDocument::from_json`], which also links every
//! [`RefObjectMap`] to its parent triples map.

mod document;
mod logical_table;
mod ref_object_map;
pub mod template;
mod term_map;

pub use document::{MappingDocument, TriplesMap};
pub use logical_table::LogicalTable;
pub use ref_object_map::{JoinCondition, RefObjectMap};
pub use template::extract_template_columns;
pub use term_map::{
    ObjectMap, PredicateMap, PredicateObjectKey, PredicateObjectMap, SubjectMap, TermMap,
    TermMapKey, TermMapValue,
};

use thiserror::Error;

/// Errors produced while loading a mapping document.
#[derive(Debug, Error)]
pub enum MappingError {
    #[error("Failed to read mapping file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse mapping document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Duplicate triples map id: {0}")]
    DuplicateTriplesMap(String),

    #[error("Invalid template '{template}': {message}")]
    InvalidTemplate { template: String, message: String },

    #[error("Triples map '{triples_map}' references unknown parent triples map '{parent}'")]
    UnresolvedParentTriplesMap { triples_map: String, parent: String },
}

/// Result type for mapping operations.
pub type MappingResult<T> = Result<T, MappingError>;
