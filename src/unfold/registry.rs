//! Alias registries.
//!
//! Unfolding renames every projected column and every joined row source.
//! The registry records those names so a row consumer can find the cells
//! belonging to each term map. All maps are append-only: recording never
//! removes an entry.

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::mapping::{PredicateObjectKey, TermMapKey};

/// Aliases produced while unfolding one or more triples maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AliasRegistry {
    /// Term map -> output column aliases, in projection order.
    term_map_aliases: HashMap<TermMapKey, Vec<String>>,

    /// Referencing object map -> alias of its joined parent source.
    ref_object_map_aliases: HashMap<TermMapKey, String>,

    /// Predicate-object map -> alias of the parent source it joins.
    predicate_object_aliases: HashMap<PredicateObjectKey, String>,

    /// Triples map id -> alias of its own logical table.
    logical_table_aliases: HashMap<String, String>,
}

impl AliasRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an output column alias for a term map.
    ///
    /// Returns `false` if the alias was already recorded for that term map.
    pub fn record_term_alias(&mut self, key: TermMapKey, alias: &str) -> bool {
        let aliases = self.term_map_aliases.entry(key).or_default();
        if aliases.iter().any(|a| a == alias) {
            return false;
        }
        aliases.push(alias.to_string());
        true
    }

    pub fn record_ref_object_alias(&mut self, key: TermMapKey, alias: &str) {
        self.ref_object_map_aliases.insert(key, alias.to_string());
    }

    pub fn record_predicate_object_alias(&mut self, key: PredicateObjectKey, alias: &str) {
        self.predicate_object_aliases.insert(key, alias.to_string());
    }

    pub fn record_logical_table_alias(&mut self, triples_map: &str, alias: &str) {
        self.logical_table_aliases
            .insert(triples_map.to_string(), alias.to_string());
    }

    /// Output column aliases of a term map, if it was projected.
    pub fn aliases(&self, key: &TermMapKey) -> Option<&[String]> {
        self.term_map_aliases.get(key).map(Vec::as_slice)
    }

    pub fn ref_object_alias(&self, key: &TermMapKey) -> Option<&str> {
        self.ref_object_map_aliases.get(key).map(String::as_str)
    }

    pub fn predicate_object_alias(&self, key: &PredicateObjectKey) -> Option<&str> {
        self.predicate_object_aliases.get(key).map(String::as_str)
    }

    pub fn logical_table_alias(&self, triples_map: &str) -> Option<&str> {
        self.logical_table_aliases.get(triples_map).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.term_map_aliases.is_empty()
            && self.ref_object_map_aliases.is_empty()
            && self.predicate_object_aliases.is_empty()
            && self.logical_table_aliases.is_empty()
    }

    /// Append every entry of `other`.
    ///
    /// Term map alias lists are extended with aliases not already present.
    /// Single-valued entries take the value from `other`.
    pub fn merge(&mut self, other: AliasRegistry) {
        for (key, aliases) in other.term_map_aliases {
            for alias in aliases {
                self.record_term_alias(key.clone(), &alias);
            }
        }
        self.ref_object_map_aliases
            .extend(other.ref_object_map_aliases);
        self.predicate_object_aliases
            .extend(other.predicate_object_aliases);
        self.logical_table_aliases
            .extend(other.logical_table_aliases);
    }

    /// A sorted, serializable view keyed by display names.
    pub fn summary(&self) -> RegistrySummary {
        RegistrySummary {
            term_maps: self
                .term_map_aliases
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            ref_object_maps: self
                .ref_object_map_aliases
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            predicate_object_maps: self
                .predicate_object_aliases
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            logical_tables: self
                .logical_table_aliases
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

/// Serializable snapshot of an [`AliasRegistry`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistrySummary {
    pub term_maps: BTreeMap<String, Vec<String>>,
    pub ref_object_maps: BTreeMap<String, String>,
    pub predicate_object_maps: BTreeMap<String, String>,
    pub logical_tables: BTreeMap<String, String>,
}
