//! Join synthesis for referencing object maps.

use tracing::debug;

use super::resolver::resolve_logical_table;
use super::{UnfoldContext, UnfoldError, UnfoldResult};
use crate::mapping::{JoinCondition, PredicateObjectKey, PredicateObjectMap, RefObjectMap, TermMapKey};
use crate::sql::dialect::helpers::unquote_double as unquote;
use crate::sql::expr::{lit_bool, table_col, Expr, ExprExt};
use crate::sql::query::JoinTable;

/// ON condition for a join: the conjunction of `child.c = parent.p` in
/// declaration order, or `true` when no conditions are declared.
pub fn join_condition(conditions: &[JoinCondition], child_alias: &str, parent_alias: &str) -> Expr {
    let equalities = conditions.iter().map(|jc| {
        table_col(child_alias, &unquote(&jc.child)).eq(table_col(parent_alias, &unquote(&jc.parent)))
    });
    Expr::conjunction(equalities).unwrap_or_else(|| lit_bool(true))
}

impl UnfoldContext<'_> {
    /// Append a `LEFT JOIN` of the parent source of `ref_object_map`.
    ///
    /// Fails when the parent logical table is missing or unusable.
    pub(super) fn join_parent(
        &mut self,
        pom_index: usize,
        pom: &PredicateObjectMap,
        ref_object_map: &RefObjectMap,
        child_alias: &str,
    ) -> UnfoldResult<()> {
        let missing_parent = || UnfoldError::MissingParentLogicalTable {
            predicate: pom.predicate_name().to_string(),
        };

        let parent_table = ref_object_map
            .parent_logical_table
            .as_ref()
            .ok_or_else(missing_parent)?;
        let parent_item =
            resolve_logical_table(parent_table, self.settings.dialect).ok_or_else(missing_parent)?;

        let parent_alias = self.aliases.next_alias();
        let key = TermMapKey::RefObject(self.triples_map.to_string(), pom_index);
        debug!(
            ref_object_map = %key,
            parent = %ref_object_map.parent_triples_map,
            alias = %parent_alias,
            "joining parent logical table"
        );

        self.registry.record_ref_object_alias(key.clone(), &parent_alias);
        self.registry.record_predicate_object_alias(
            PredicateObjectKey(self.triples_map.to_string(), pom_index),
            &parent_alias,
        );

        self.project(&key, &ref_object_map.parent_columns(), &parent_alias);

        let on = join_condition(&ref_object_map.join_conditions, child_alias, &parent_alias);
        self.query
            .add_from(JoinTable::left(parent_item, &parent_alias, on));

        Ok(())
    }
}
