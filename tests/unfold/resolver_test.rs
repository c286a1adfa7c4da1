//! Tests for logical table resolution.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use r2rml_unfold::mapping::{LogicalTable, SubjectMap, TriplesMap};
use r2rml_unfold::query::{FromItem, TableRef};
use r2rml_unfold::sql::Dialect;
use r2rml_unfold::unfold::{UnfoldError, Unfolder};

fn employee_rule(table: LogicalTable) -> TriplesMap {
    TriplesMap::new(
        "EmployeeMap",
        table,
        SubjectMap::template("http://ex.org/emp/{id}"),
    )
}

/// In-memory log sink shared with the subscriber.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a WARN-level subscriber and return what it logged.
fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    (result, logs)
}

#[test]
fn test_table_name_resolves_to_base_table() {
    let unfolder = Unfolder::with_dialect(Dialect::Postgres);
    let item = unfolder
        .resolve_logical_table(&LogicalTable::table_name("employee"))
        .unwrap();

    assert_eq!(item, FromItem::Table(TableRef::new("employee")));
    assert_eq!(item.table_name(), Some("employee"));
}

#[test]
fn test_query_string_resolves_to_subquery() {
    let unfolder = Unfolder::with_dialect(Dialect::Postgres);
    let item = unfolder
        .resolve_logical_table(&LogicalTable::query_string(
            "SELECT id, name FROM emp WHERE active = 1",
        ))
        .unwrap();

    match item {
        FromItem::Subquery(query) => {
            assert_eq!(query.to_string(), "SELECT id, name FROM emp WHERE active = 1")
        }
        other => panic!("Expected parsed subquery, got {:?}", other),
    }
}

#[test]
fn test_unparseable_query_string_falls_back_to_text() {
    let unfolder = Unfolder::with_dialect(Dialect::Postgres);
    let item = unfolder
        .resolve_logical_table(&LogicalTable::query_string("SELEKT * FORM t"))
        .unwrap();

    assert_eq!(item, FromItem::RawSubquery("SELEKT * FORM t;".to_string()));
    assert!(item.is_subquery());
}

#[test]
fn test_terminated_query_string_is_not_terminated_twice() {
    let unfolder = Unfolder::with_dialect(Dialect::MySql);
    let item = unfolder
        .resolve_logical_table(&LogicalTable::query_string("SELEKT * FORM t;"))
        .unwrap();

    assert_eq!(item, FromItem::RawSubquery("SELEKT * FORM t;".to_string()));
}

#[test]
fn test_unsupported_logical_table_resolves_to_nothing() {
    let unfolder = Unfolder::with_dialect(Dialect::Postgres);
    assert!(unfolder
        .resolve_logical_table(&LogicalTable::Unsupported)
        .is_none());
}

#[test]
fn test_unsupported_logical_table_fails_the_rule() {
    let mut unfolder = Unfolder::with_dialect(Dialect::Postgres);
    let err = unfolder
        .unfold_triples_map(&employee_rule(LogicalTable::Unsupported), None)
        .unwrap_err();

    assert_eq!(
        err,
        UnfoldError::UnsupportedLogicalTable {
            triples_map: "EmployeeMap".to_string()
        }
    );
    assert!(unfolder.registry().is_empty());
}

#[test]
fn test_raw_fallback_flows_into_query() {
    let mut unfolder = Unfolder::with_dialect(Dialect::Postgres);
    let query = unfolder
        .unfold_triples_map(
            &employee_rule(LogicalTable::query_string("SELEKT * FORM t")),
            None,
        )
        .unwrap()
        .unwrap();

    let base = query.base().unwrap();
    assert_eq!(base.item, FromItem::RawSubquery("SELEKT * FORM t;".to_string()));
    assert_eq!(
        query.to_sql(),
        "SELECT\n  \"T1\".\"id\" AS \"T1_id\"\nFROM (SELEKT * FORM t) AS \"T1\""
    );
}

#[test]
fn test_parsed_subquery_flows_into_query() {
    let mut unfolder = Unfolder::with_dialect(Dialect::Postgres);
    let query = unfolder
        .unfold_triples_map(
            &employee_rule(LogicalTable::query_string(
                "SELECT id, name FROM emp WHERE active = 1;",
            )),
            None,
        )
        .unwrap()
        .unwrap();

    assert!(query
        .to_sql()
        .contains("FROM (SELECT id, name FROM emp WHERE active = 1) AS \"T1\""));
}

#[test]
fn test_schema_qualified_table_name() {
    let mut unfolder = Unfolder::with_dialect(Dialect::TSql);
    let query = unfolder
        .unfold_triples_map(&employee_rule(LogicalTable::table_name("hr.employee")), None)
        .unwrap()
        .unwrap();

    assert!(query.to_sql().contains("FROM [hr].[employee] AS [T1]"));
}

#[test]
fn test_fallback_logs_warning() {
    let unfolder = Unfolder::with_dialect(Dialect::Postgres);
    let (item, logs) = capture_warnings(|| {
        unfolder.resolve_logical_table(&LogicalTable::query_string("SELEKT * FORM t"))
    });

    assert!(matches!(item, Some(FromItem::RawSubquery(_))));
    assert!(logs.contains("WARN"));
    assert!(logs.contains("passing SQL text through"));
}

#[test]
fn test_unsupported_logs_warning() {
    let unfolder = Unfolder::with_dialect(Dialect::Postgres);
    let (item, logs) =
        capture_warnings(|| unfolder.resolve_logical_table(&LogicalTable::Unsupported));

    assert!(item.is_none());
    assert!(logs.contains("WARN"));
    assert!(logs.contains("invalid logical table type"));
}

#[test]
fn test_parsed_query_string_logs_nothing() {
    let unfolder = Unfolder::with_dialect(Dialect::Postgres);
    let (_, logs) = capture_warnings(|| {
        unfolder.resolve_logical_table(&LogicalTable::query_string("SELECT id FROM emp"))
    });

    assert!(logs.is_empty());
}

#[test]
fn test_fallback_with_trailing_line_comment() {
    let mut unfolder = Unfolder::with_dialect(Dialect::Postgres);
    let query = unfolder
        .unfold_triples_map(
            &employee_rule(LogicalTable::query_string("SELEKT id FROM t -- note")),
            None,
        )
        .unwrap()
        .unwrap();

    assert_eq!(
        query.to_sql(),
        "SELECT\n  \"T1\".\"id\" AS \"T1_id\"\nFROM (SELEKT id FROM t -- note\n) AS \"T1\""
    );
}
