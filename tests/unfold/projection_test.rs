//! Tests for column projection and alias assignment.

use r2rml_unfold::config::{AliasCollisionPolicy, Settings};
use r2rml_unfold::mapping::{
    LogicalTable, ObjectMap, PredicateMap, PredicateObjectMap, SubjectMap, TermMapKey,
    TermMapValue, TriplesMap,
};
use r2rml_unfold::query::SelectItem;
use r2rml_unfold::sql::Dialect;
use r2rml_unfold::unfold::Unfolder;

fn employee(objects: &[ObjectMap]) -> TriplesMap {
    let mut tm = TriplesMap::new(
        "EmployeeMap",
        LogicalTable::table_name("employee"),
        SubjectMap::template("http://ex.org/emp/{id}"),
    );
    for (i, object) in objects.iter().enumerate() {
        tm = tm.with_predicate_object_map(
            PredicateObjectMap::new(PredicateMap::constant(format!("http://ex.org/p{i}")))
                .with_object(object.clone()),
        );
    }
    tm
}

fn object_key(pom: usize) -> TermMapKey {
    TermMapKey::Object("EmployeeMap".to_string(), pom)
}

fn subject_key() -> TermMapKey {
    TermMapKey::Subject("EmployeeMap".to_string())
}

#[test]
fn test_employee_scenario() {
    let mut unfolder = Unfolder::with_dialect(Dialect::Postgres);
    let query = unfolder
        .unfold_triples_map(&employee(&[ObjectMap::column("name")]), None)
        .unwrap()
        .unwrap();

    assert_eq!(query.from_items().len(), 1);
    assert_eq!(query.base().unwrap().alias.as_deref(), Some("T1"));
    assert_eq!(query.joins().count(), 0);
    assert!(query.where_clause().is_none());
    assert_eq!(
        query.select_items(),
        &[
            SelectItem::new("T1", "id").with_alias("T1_id"),
            SelectItem::new("T1", "name").with_alias("T1_name"),
        ]
    );

    let registry = unfolder.registry();
    assert_eq!(registry.aliases(&subject_key()).unwrap(), &["T1_id".to_string()]);
    assert_eq!(registry.aliases(&object_key(0)).unwrap(), &["T1_name".to_string()]);
    assert_eq!(registry.logical_table_alias("EmployeeMap"), Some("T1"));
}

#[test]
fn test_every_select_item_has_alias() {
    let mut unfolder = Unfolder::with_dialect(Dialect::Postgres);
    let query = unfolder
        .unfold_triples_map(
            &employee(&[
                ObjectMap::column("name"),
                ObjectMap::template("http://ex.org/{dept}/{site}"),
                ObjectMap::constant("fixed"),
            ]),
            None,
        )
        .unwrap()
        .unwrap();

    assert_eq!(query.select_items().len(), 4);
    assert!(query.select_items().iter().all(|item| item.alias.is_some()));
}

#[test]
fn test_shared_column_is_projected_once() {
    let mut unfolder = Unfolder::with_dialect(Dialect::Postgres);
    let query = unfolder
        .unfold_triples_map(&employee(&[ObjectMap::column("id")]), None)
        .unwrap()
        .unwrap();

    // Subject and object both read `id`: one output column, two registry entries.
    assert_eq!(query.select_items().len(), 1);
    let registry = unfolder.registry();
    assert_eq!(registry.aliases(&subject_key()).unwrap(), &["T1_id".to_string()]);
    assert_eq!(registry.aliases(&object_key(0)).unwrap(), &["T1_id".to_string()]);
}

#[test]
fn test_repeated_column_registers_alias_once() {
    let mut unfolder = Unfolder::with_dialect(Dialect::Postgres);
    unfolder
        .unfold_triples_map(&employee(&[ObjectMap::template("{code}-{code}")]), None)
        .unwrap();

    assert_eq!(
        unfolder.registry().aliases(&object_key(0)).unwrap(),
        &["T1_code".to_string()]
    );
}

#[test]
fn test_unfolding_twice_does_not_duplicate_aliases() {
    let mut unfolder = Unfolder::with_dialect(Dialect::Postgres);
    let tm = employee(&[ObjectMap::column("name")]);
    let first = unfolder.unfold_triples_map(&tm, None).unwrap().unwrap();
    let second = unfolder.unfold_triples_map(&tm, None).unwrap().unwrap();

    assert_eq!(first, second);
    assert_eq!(unfolder.registry().aliases(&subject_key()).unwrap().len(), 1);
    assert_eq!(unfolder.registry().aliases(&object_key(0)).unwrap().len(), 1);
}

#[test]
fn test_constant_terms_project_nothing() {
    let mut unfolder = Unfolder::with_dialect(Dialect::Postgres);
    let tm = TriplesMap::new(
        "ConstantMap",
        LogicalTable::table_name("singleton"),
        SubjectMap::new(TermMapValue::Constant("http://ex.org/me".into())),
    )
    .with_predicate_object_map(
        PredicateObjectMap::new(PredicateMap::constant("http://ex.org/p"))
            .with_object(ObjectMap::constant("v")),
    );
    let query = unfolder.unfold_triples_map(&tm, None).unwrap().unwrap();

    assert!(query.select_items().is_empty());
    assert_eq!(query.to_sql(), "SELECT *\nFROM \"singleton\" AS \"T1\"");
}

#[test]
fn test_predicate_map_columns_are_projected() {
    let mut unfolder = Unfolder::with_dialect(Dialect::Postgres);
    let tm = TriplesMap::new(
        "AttributeMap",
        LogicalTable::table_name("attribute"),
        SubjectMap::column("entity"),
    )
    .with_predicate_object_map(PredicateObjectMap {
        predicate_maps: vec![PredicateMap {
            value: TermMapValue::Template("http://ex.org/attr/{attr_name}".into()),
        }],
        object_maps: vec![ObjectMap::column("attr_value")],
        ref_object_maps: vec![],
    });
    let query = unfolder.unfold_triples_map(&tm, None).unwrap().unwrap();

    let aliases: Vec<_> = query
        .select_items()
        .iter()
        .filter_map(|item| item.alias.clone())
        .collect();
    assert_eq!(aliases, vec!["T1_entity", "T1_attr_name", "T1_attr_value"]);
    assert_eq!(
        unfolder
            .registry()
            .aliases(&TermMapKey::Predicate("AttributeMap".into(), 0))
            .unwrap(),
        &["T1_attr_name".to_string()]
    );
}

#[test]
fn test_quoted_column_reference() {
    let mut unfolder = Unfolder::with_dialect(Dialect::MySql);
    let query = unfolder
        .unfold_triples_map(&employee(&[ObjectMap::column("\"Name\"")]), None)
        .unwrap()
        .unwrap();

    assert!(query.to_sql().contains("`T1`.`Name` AS `T1_Name`"));
}

#[test]
fn test_alias_collision_is_renamed() {
    let mut unfolder = Unfolder::with_dialect(Dialect::Postgres);
    let query = unfolder
        .unfold_triples_map(
            &employee(&[ObjectMap::column("first_name"), ObjectMap::column("first name")]),
            None,
        )
        .unwrap()
        .unwrap();

    assert_eq!(
        query.item_with_alias("T1_first_name").unwrap().column,
        "first_name"
    );
    assert_eq!(
        query.item_with_alias("T1_first_name_2").unwrap().column,
        "first name"
    );
    assert_eq!(
        unfolder.registry().aliases(&object_key(1)).unwrap(),
        &["T1_first_name_2".to_string()]
    );
}

#[test]
fn test_renamed_alias_is_reused_for_same_column() {
    let mut unfolder = Unfolder::with_dialect(Dialect::Postgres);
    let query = unfolder
        .unfold_triples_map(
            &employee(&[
                ObjectMap::column("first_name"),
                ObjectMap::column("first name"),
                ObjectMap::column("first name"),
            ]),
            None,
        )
        .unwrap()
        .unwrap();

    assert_eq!(query.select_items().len(), 3);
    assert_eq!(
        unfolder.registry().aliases(&object_key(2)).unwrap(),
        &["T1_first_name_2".to_string()]
    );
}

#[test]
fn test_alias_collision_kept_when_configured() {
    let mut settings = Settings::default();
    settings.unfold.on_alias_collision = AliasCollisionPolicy::Keep;
    let mut unfolder = Unfolder::new(&settings);

    let query = unfolder
        .unfold_triples_map(
            &employee(&[ObjectMap::column("first_name"), ObjectMap::column("first name")]),
            None,
        )
        .unwrap()
        .unwrap();

    let clashing: Vec<_> = query
        .select_items()
        .iter()
        .filter(|item| item.alias.as_deref() == Some("T1_first_name"))
        .map(|item| item.column.as_str())
        .collect();
    assert_eq!(clashing, vec!["first_name", "first name"]);
    assert_eq!(
        unfolder.registry().aliases(&object_key(1)).unwrap(),
        &["T1_first_name".to_string()]
    );
}
