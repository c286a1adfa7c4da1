//! Unfolding - compiles triples maps into SQL queries.
//!
//! One triples map becomes one [`Query`]:
//!
//! 1. The logical table is resolved to the base from-item (`T1`).
//! 2. The subject map's columns are projected from it.
//! 3. For each predicate-object map, the first predicate map and first
//!    object map are projected, then the first referencing object map (if
//!    any) adds a `LEFT JOIN` of its parent source (`T2`, `T3`, ...).
//! 4. An optional subject value is pushed down as a WHERE condition.
//!
//! Every output alias is recorded in an [`AliasRegistry`]. Each rule is
//! unfolded against a local registry that is merged into the unfolder's
//! registry only when the rule succeeds.

pub mod join;
pub mod projection;
pub mod registry;
pub mod resolver;

pub use registry::{AliasRegistry, RegistrySummary};
pub use resolver::resolve_logical_table;

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{error, info};

use crate::config::{Settings, UnfoldSettings};
use crate::mapping::{MappingDocument, TermMap, TermMapKey, TriplesMap};
use crate::sql::dialect::Dialect;
use crate::sql::query::{FromItem, JoinTable, Query};

/// Errors that abort the unfolding of one triples map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UnfoldError {
    #[error("logical table of triples map '{triples_map}' has no usable source")]
    UnsupportedLogicalTable { triples_map: String },

    #[error("parent logical table not found for {predicate}")]
    MissingParentLogicalTable { predicate: String },
}

pub type UnfoldResult<T> = Result<T, UnfoldError>;

// =============================================================================
// Alias generation
// =============================================================================

/// Generates from-item aliases `<prefix>1`, `<prefix>2`, ... for one query.
#[derive(Debug, Clone)]
pub struct AliasGenerator {
    prefix: String,
    next: usize,
}

impl AliasGenerator {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
            next: 1,
        }
    }

    pub fn next_alias(&mut self) -> String {
        let alias = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        alias
    }
}

// =============================================================================
// Per-rule state
// =============================================================================

/// State of one triples map being unfolded.
pub(crate) struct UnfoldContext<'a> {
    settings: &'a UnfoldSettings,
    triples_map: &'a str,
    query: Query,
    registry: AliasRegistry,
    aliases: AliasGenerator,
}

impl<'a> UnfoldContext<'a> {
    fn new(settings: &'a UnfoldSettings, triples_map: &'a str) -> Self {
        Self {
            settings,
            triples_map,
            query: Query::new().with_dialect(settings.dialect),
            registry: AliasRegistry::new(),
            aliases: AliasGenerator::new(&settings.alias_prefix),
        }
    }

    /// Add the rule's own logical table as the first from-item and project
    /// the subject columns from it. Returns the base alias.
    fn unfold_base(&mut self, tm: &TriplesMap) -> UnfoldResult<String> {
        let base: FromItem = resolve_logical_table(&tm.logical_table, self.settings.dialect)
            .ok_or_else(|| UnfoldError::UnsupportedLogicalTable {
                triples_map: tm.id.clone(),
            })?;

        let alias = self.aliases.next_alias();
        self.registry.record_logical_table_alias(&tm.id, &alias);
        self.query.add_from(JoinTable::base(base, &alias));

        self.project(
            &TermMapKey::Subject(tm.id.clone()),
            &tm.subject_map.columns(),
            &alias,
        );

        Ok(alias)
    }

    fn unfold_predicate_object_maps(&mut self, tm: &TriplesMap, base_alias: &str) -> UnfoldResult<()> {
        for (index, pom) in tm.predicate_object_maps.iter().enumerate() {
            if let Some(predicate_map) = pom.predicate_map() {
                self.project(
                    &TermMapKey::Predicate(tm.id.clone(), index),
                    &predicate_map.columns(),
                    base_alias,
                );
            }

            if let Some(object_map) = pom.object_map() {
                self.project(
                    &TermMapKey::Object(tm.id.clone(), index),
                    &object_map.columns(),
                    base_alias,
                );
            }

            if let Some(ref_object_map) = pom.ref_object_map() {
                self.join_parent(index, pom, ref_object_map, base_alias)?;
            }
        }
        Ok(())
    }
}

/// A successfully unfolded triples map together with the aliases it produced.
#[derive(Debug, Clone)]
pub struct UnfoldedRule {
    pub query: Query,
    pub registry: AliasRegistry,
}

// =============================================================================
// Unfolder
// =============================================================================

/// Unfolds triples maps, accumulating an alias registry across calls.
///
/// The registry lives as long as the unfolder; start a new unfolder for a
/// fresh pass.
#[derive(Debug, Clone, Default)]
pub struct Unfolder {
    settings: UnfoldSettings,
    registry: AliasRegistry,
}

impl Unfolder {
    pub fn new(settings: &Settings) -> Self {
        Self {
            settings: settings.unfold.clone(),
            registry: AliasRegistry::new(),
        }
    }

    /// An unfolder with default settings for `dialect`.
    pub fn with_dialect(dialect: Dialect) -> Self {
        let mut settings = Settings::default();
        settings.unfold.dialect = dialect;
        Self::new(&settings)
    }

    pub fn dialect(&self) -> Dialect {
        self.settings.dialect
    }

    pub fn settings(&self) -> &UnfoldSettings {
        &self.settings
    }

    /// Resolve a logical table with this unfolder's dialect.
    pub fn resolve_logical_table(&self, table: &crate::mapping::LogicalTable) -> Option<FromItem> {
        resolve_logical_table(table, self.settings.dialect)
    }

    /// Unfold one triples map without touching the shared registry.
    ///
    /// Takes `&self`, so several rules can be unfolded concurrently and
    /// their registries merged afterwards with [`Unfolder::absorb`].
    /// Returns `Ok(None)` when `subject` is given and the subject map
    /// cannot produce it.
    pub fn unfold_isolated(
        &self,
        tm: &TriplesMap,
        subject: Option<&str>,
    ) -> UnfoldResult<Option<UnfoldedRule>> {
        info!(triples_map = %tm.id, "unfolding triples map");

        let mut ctx = UnfoldContext::new(&self.settings, &tm.id);
        let base_alias = ctx.unfold_base(tm)?;
        ctx.unfold_predicate_object_maps(tm, &base_alias)?;

        if let Some(value) = subject {
            match tm.subject_map.condition_for_value(value, &base_alias) {
                Some(condition) => ctx.query.filter(condition),
                None => {
                    info!(triples_map = %tm.id, subject = %value, "subject cannot match triples map");
                    return Ok(None);
                }
            }
        }

        Ok(Some(UnfoldedRule {
            query: ctx.query,
            registry: ctx.registry,
        }))
    }

    /// Unfold one triples map, optionally restricted to one subject value.
    pub fn unfold_triples_map(
        &mut self,
        tm: &TriplesMap,
        subject: Option<&str>,
    ) -> UnfoldResult<Option<Query>> {
        Ok(self.unfold_isolated(tm, subject)?.map(|rule| {
            self.registry.merge(rule.registry);
            rule.query
        }))
    }

    /// Unfold the logical table and subject map only.
    pub fn unfold_subject(&mut self, tm: &TriplesMap) -> UnfoldResult<Query> {
        let mut ctx = UnfoldContext::new(&self.settings, &tm.id);
        ctx.unfold_base(tm)?;
        self.registry.merge(ctx.registry);
        Ok(ctx.query)
    }

    /// Unfold every triples map of a document, keyed by triples map id.
    ///
    /// A rule that fails is logged and left out; the rest are unaffected.
    pub fn unfold_document(&mut self, document: &MappingDocument) -> BTreeMap<String, Query> {
        let mut queries = BTreeMap::new();
        for tm in &document.triples_maps {
            match self.unfold_triples_map(tm, None) {
                Ok(Some(query)) => {
                    queries.insert(tm.id.clone(), query);
                }
                Ok(None) => {}
                Err(e) => {
                    error!(triples_map = %tm.id, error = %e, "error while unfolding triples map");
                }
            }
        }
        queries
    }

    /// Merge a registry produced by [`Unfolder::unfold_isolated`].
    pub fn absorb(&mut self, registry: AliasRegistry) {
        self.registry.merge(registry);
    }

    pub fn registry(&self) -> &AliasRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> AliasRegistry {
        self.registry
    }
}
