//! Query AST - the SELECT statement an unfolded triples map becomes.
//!
//! The shape mirrors the mapping structure rather than an optimised plan:
//! one base from-item for the triples map's logical table, one `LEFT JOIN`
//! per referencing object map, a flat select list, and an optional WHERE
//! clause for subject push-down.

use sqlparser::ast::Query as ParsedQuery;

use super::dialect::Dialect;
use super::expr::Expr;
use super::parse::{ends_in_line_comment, strip_terminator};
use super::token::{Token, TokenStream};

// =============================================================================
// Select Item (qualified column with alias)
// =============================================================================

/// A SELECT list item: `qualifier.column AS alias`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[must_use = "builders have no effect until used"]
pub struct SelectItem {
    /// Table alias the column is read from.
    pub table: String,
    pub column: String,
    pub alias: Option<String>,
}

impl SelectItem {
    pub fn new(table: &str, column: &str) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Whether this item reads the same physical column as `other`.
    pub fn same_column(&self, other: &SelectItem) -> bool {
        self.table == other.table && self.column == other.column
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::Ident(self.table.clone()))
            .push(Token::Dot)
            .push(Token::Ident(self.column.clone()));
        if let Some(alias) = &self.alias {
            ts.space()
                .push(Token::As)
                .space()
                .push(Token::Ident(alias.clone()));
        }
        ts
    }
}

// =============================================================================
// Table Reference
// =============================================================================

/// A base table with optional schema.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[must_use = "builders have no effect until used"]
pub struct TableRef {
    pub schema: Option<String>,
    pub table: String,
}

impl TableRef {
    pub fn new(table: &str) -> Self {
        Self {
            schema: None,
            table: table.into(),
        }
    }

    pub fn with_schema(mut self, schema: &str) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        ts.push(Token::QualifiedIdent {
            schema: self.schema.clone(),
            name: self.table.clone(),
        });
        ts
    }
}

// =============================================================================
// From Items
// =============================================================================

/// A row source in the FROM clause.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FromItem {
    /// A named base table (`rr:tableName`).
    Table(TableRef),

    /// A structured sub-query parsed from `rr:sqlQuery` text.
    Subquery(Box<ParsedQuery>),

    /// `rr:sqlQuery` text the parser could not read, passed through as-is.
    ///
    /// The text keeps its statement terminator; rendering strips it so the
    /// query nests inside parentheses.
    RawSubquery(String),
}

impl FromItem {
    pub fn table(table: TableRef) -> Self {
        FromItem::Table(table)
    }

    /// Name of the base table, if this is one.
    pub fn table_name(&self) -> Option<&str> {
        match self {
            FromItem::Table(t) => Some(&t.table),
            FromItem::Subquery(_) | FromItem::RawSubquery(_) => None,
        }
    }

    pub fn is_subquery(&self) -> bool {
        matches!(self, FromItem::Subquery(_) | FromItem::RawSubquery(_))
    }

    pub fn to_tokens(&self) -> TokenStream {
        match self {
            FromItem::Table(table) => table.to_tokens(),
            FromItem::Subquery(query) => {
                let mut ts = TokenStream::new();
                ts.lparen().push(Token::Raw(query.to_string())).rparen();
                ts
            }
            FromItem::RawSubquery(sql) => {
                let mut ts = TokenStream::new();
                ts.lparen()
                    .push(Token::Raw(strip_terminator(sql).to_string()));
                if ends_in_line_comment(sql) {
                    ts.newline();
                }
                ts.rparen();
                ts
            }
        }
    }
}

// =============================================================================
// Joins
// =============================================================================

/// Type of join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinType {
    Left,
}

/// An entry of the FROM clause: a row source with its alias and, for
/// everything after the first entry, how it joins.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JoinTable {
    pub item: FromItem,
    pub alias: Option<String>,
    pub join_type: Option<JoinType>,
    pub on: Option<Expr>,
}

impl JoinTable {
    /// A plain table reference (the query's first from-item).
    pub fn base(item: FromItem, alias: &str) -> Self {
        Self {
            item,
            alias: Some(alias.into()),
            join_type: None,
            on: None,
        }
    }

    /// A `LEFT JOIN item AS alias ON on`.
    pub fn left(item: FromItem, alias: &str, on: Expr) -> Self {
        Self {
            item,
            alias: Some(alias.into()),
            join_type: Some(JoinType::Left),
            on: Some(on),
        }
    }

    pub fn is_join(&self) -> bool {
        self.join_type.is_some()
    }

    pub fn to_tokens(&self) -> TokenStream {
        self.to_tokens_for_dialect(Dialect::default())
    }

    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        if let Some(join_type) = self.join_type {
            match join_type {
                JoinType::Left => ts.push(Token::Left),
            };
            ts.space().push(Token::Join).space();
        }

        ts.append(&self.item.to_tokens());

        if let Some(alias) = &self.alias {
            ts.space()
                .push(Token::As)
                .space()
                .push(Token::Ident(alias.clone()));
        }

        if let Some(on) = &self.on {
            ts.space().push(Token::On).space();
            ts.append(&on.to_condition_tokens(dialect));
        }

        ts
    }
}

// =============================================================================
// Query
// =============================================================================

/// A SELECT query produced by unfolding one triples map.
///
/// The select list behaves as a set: adding an item structurally equal to
/// one already present is a no-op. Insertion order is kept so the rendered
/// SQL is deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
#[must_use = "Query has no effect until converted to SQL with to_sql() or to_tokens()"]
pub struct Query {
    select: Vec<SelectItem>,
    from: Vec<JoinTable>,
    where_clause: Option<Expr>,
    dialect: Dialect,
}

impl Query {
    /// Create a new empty query.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag the query with the dialect it will run against.
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Add a select item. Returns `false` when an equal item was already present.
    pub fn add_select(&mut self, item: SelectItem) -> bool {
        if self.select.contains(&item) {
            return false;
        }
        self.select.push(item);
        true
    }

    pub fn select_items(&self) -> &[SelectItem] {
        &self.select
    }

    /// The select item currently carrying `alias`, if any.
    pub fn item_with_alias(&self, alias: &str) -> Option<&SelectItem> {
        self.select
            .iter()
            .find(|item| item.alias.as_deref() == Some(alias))
    }

    /// Append a from-item. Order is preserved.
    pub fn add_from(&mut self, table: JoinTable) {
        self.from.push(table);
    }

    pub fn from_items(&self) -> &[JoinTable] {
        &self.from
    }

    /// The first from-item (the triples map's own logical table).
    pub fn base(&self) -> Option<&JoinTable> {
        self.from.first()
    }

    /// All joined from-items, in declaration order.
    pub fn joins(&self) -> impl Iterator<Item = &JoinTable> {
        self.from.iter().filter(|t| t.is_join())
    }

    /// Add a WHERE condition (ANDed with an existing one).
    pub fn filter(&mut self, condition: Expr) {
        use super::expr::ExprExt;

        self.where_clause = Some(match self.where_clause.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
    }

    pub fn where_clause(&self) -> Option<&Expr> {
        self.where_clause.as_ref()
    }

    /// Convert to token stream using the query's own dialect.
    pub fn to_tokens(&self) -> TokenStream {
        self.to_tokens_for_dialect(self.dialect)
    }

    /// Convert to token stream for a specific dialect.
    pub fn to_tokens_for_dialect(&self, dialect: Dialect) -> TokenStream {
        let mut ts = TokenStream::new();

        // SELECT
        ts.push(Token::Select);

        if self.select.is_empty() {
            ts.space().push(Token::Star);
        }

        for (i, item) in self.select.iter().enumerate() {
            if i == 0 {
                ts.newline().indent(1);
            } else {
                ts.comma().newline().indent(1);
            }
            ts.append(&item.to_tokens());
        }

        // FROM / JOINs
        for (i, table) in self.from.iter().enumerate() {
            ts.newline();
            if i == 0 {
                ts.push(Token::From).space();
            }
            ts.append(&table.to_tokens_for_dialect(dialect));
        }

        // WHERE
        if let Some(where_clause) = &self.where_clause {
            ts.newline().push(Token::Where).space();
            ts.append(&where_clause.to_condition_tokens(dialect));
        }

        ts
    }

    /// Generate SQL for the dialect this query was tagged with.
    pub fn to_sql(&self) -> String {
        self.to_sql_for(self.dialect)
    }

    /// Generate SQL for a specific dialect.
    pub fn to_sql_for(&self, dialect: Dialect) -> String {
        self.to_tokens_for_dialect(dialect).serialize(dialect)
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_sql())
    }
}

// =============================================================================
// Tests
// =============================================================================
