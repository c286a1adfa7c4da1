//! Column projection and alias assignment.

use tracing::{debug, warn};

use super::UnfoldContext;
use crate::config::AliasCollisionPolicy;
use crate::mapping::TermMapKey;
use crate::sql::dialect::helpers::unquote_double as unquote;
use crate::sql::query::SelectItem;

/// Build the select item for one column reference read from `table_alias`.
///
/// Returns `None` for a reference that names no column.
pub fn select_item(column_ref: &str, table_alias: &str) -> Option<SelectItem> {
    let column = unquote(column_ref);
    if column.is_empty() {
        return None;
    }
    Some(SelectItem::new(table_alias, &column))
}

/// Synthesize the output alias of `table.column`.
///
/// Characters that are not ASCII alphanumeric become `_`, so the alias is
/// a plain identifier in every dialect.
pub fn synthesize_alias(table_alias: &str, column: &str) -> String {
    let column: String = column
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{table_alias}_{column}")
}

impl UnfoldContext<'_> {
    /// Project the given columns of `table_alias` and record their aliases
    /// under `key`.
    pub(super) fn project(&mut self, key: &TermMapKey, columns: &[String], table_alias: &str) {
        for column_ref in columns {
            let Some(item) = select_item(column_ref, table_alias) else {
                continue;
            };

            let item = match item.alias {
                Some(_) => item,
                None => {
                    let alias = self.free_alias(&item);
                    item.with_alias(&alias)
                }
            };

            if let Some(alias) = &item.alias {
                if self.registry.record_term_alias(key.clone(), alias) {
                    debug!(term_map = %key, alias = %alias, "registered column alias");
                }
            }
            self.query.add_select(item);
        }
    }

    /// Pick an alias for `item` that is not bound to a different column.
    fn free_alias(&self, item: &SelectItem) -> String {
        let alias = synthesize_alias(&item.table, &item.column);

        let taken_by_other = |candidate: &str| {
            self.query
                .item_with_alias(candidate)
                .is_some_and(|existing| !existing.same_column(item))
        };

        if !taken_by_other(&alias) {
            return alias;
        }

        match self.settings.on_alias_collision {
            AliasCollisionPolicy::Keep => {
                warn!(alias = %alias, column = %item.column, "alias already bound to another column");
                alias
            }
            AliasCollisionPolicy::Rename => {
                let mut n = 2;
                loop {
                    let candidate = format!("{alias}_{n}");
                    if !taken_by_other(&candidate) {
                        warn!(
                            alias = %alias,
                            renamed = %candidate,
                            column = %item.column,
                            "alias already bound to another column, renamed"
                        );
                        return candidate;
                    }
                    n += 1;
                }
            }
        }
    }
}
