//! Tests for loading mapping documents from JSON.

use r2rml_unfold::mapping::{
    JoinCondition, LogicalTable, MappingDocument, MappingError, ObjectMap, PredicateMap,
    SubjectMap, TermMapValue,
};

const MAPPING: &str = r#"
{
  "triples_maps": [
    {
      "id": "EmployeeMap",
      "logical_table": { "kind": "query_string", "query": "SELECT * FROM employee WHERE active = 1" },
      "subject_map": { "template": "http://ex.org/emp/{id}" },
      "predicate_object_maps": [
        {
          "predicate_maps": [{ "constant": "http://ex.org/name" }],
          "object_maps": [{ "column": "name" }]
        },
        {
          "predicate_maps": [{ "constant": "http://ex.org/dept" }],
          "ref_object_maps": [
            {
              "parent_triples_map": "DepartmentMap",
              "join_conditions": [
                { "child": "dept_id", "parent": "id" },
                { "child": "site", "parent": "site" }
              ]
            }
          ]
        }
      ]
    },
    {
      "id": "DepartmentMap",
      "logical_table": { "kind": "table_name", "name": "hr.department" },
      "subject_map": { "template": "http://ex.org/dept/{site}/{id}" }
    }
  ]
}
"#;

#[test]
fn test_load_document() {
    let doc = MappingDocument::from_json(MAPPING).unwrap();

    assert_eq!(doc.triples_maps.len(), 2);

    let employee = doc.get("EmployeeMap").unwrap();
    assert_eq!(
        employee.logical_table,
        LogicalTable::query_string("SELECT * FROM employee WHERE active = 1")
    );
    assert_eq!(
        employee.subject_map,
        SubjectMap::template("http://ex.org/emp/{id}")
    );
    assert_eq!(employee.predicate_object_maps.len(), 2);

    let name = &employee.predicate_object_maps[0];
    assert_eq!(
        name.predicate_map(),
        Some(&PredicateMap::constant("http://ex.org/name"))
    );
    assert_eq!(name.object_map(), Some(&ObjectMap::column("name")));

    let department = doc.get("DepartmentMap").unwrap();
    assert!(department.predicate_object_maps.is_empty());
}

#[test]
fn test_load_links_ref_object_maps() {
    let doc = MappingDocument::from_json(MAPPING).unwrap();
    let rom = doc.get("EmployeeMap").unwrap().predicate_object_maps[1]
        .ref_object_map()
        .unwrap();

    assert_eq!(rom.parent_triples_map, "DepartmentMap");
    assert_eq!(
        rom.join_conditions,
        vec![
            JoinCondition::new("dept_id", "id"),
            JoinCondition::new("site", "site"),
        ]
    );
    assert_eq!(
        rom.parent_logical_table,
        Some(LogicalTable::table_name("hr.department"))
    );
    assert_eq!(
        rom.parent_subject,
        Some(TermMapValue::Template("http://ex.org/dept/{site}/{id}".into()))
    );
    assert_eq!(rom.parent_columns(), vec!["site", "id"]);
    doc.check_references().unwrap();
}

#[test]
fn test_unknown_parent_is_reported_not_rejected() {
    let json = r#"
    {
      "triples_maps": [
        {
          "id": "ProjectMap",
          "logical_table": { "kind": "table_name", "name": "project" },
          "subject_map": { "column": "iri" },
          "predicate_object_maps": [
            {
              "predicate_maps": [{ "constant": "http://ex.org/owner" }],
              "ref_object_maps": [{ "parent_triples_map": "OwnerMap" }]
            }
          ]
        }
      ]
    }"#;

    let doc = MappingDocument::from_json(json).unwrap();
    let rom = doc.triples_maps[0].predicate_object_maps[0]
        .ref_object_map()
        .unwrap();
    assert!(rom.parent_logical_table.is_none());

    match doc.check_references() {
        Err(MappingError::UnresolvedParentTriplesMap {
            triples_map,
            parent,
        }) => {
            assert_eq!(triples_map, "ProjectMap");
            assert_eq!(parent, "OwnerMap");
        }
        other => panic!("Expected unresolved parent, got {:?}", other),
    }
}

#[test]
fn test_unknown_logical_table_kind() {
    let json = r#"
    {
      "triples_maps": [
        {
          "id": "RemoteMap",
          "logical_table": { "kind": "sparql_endpoint", "url": "http://ex.org/sparql" },
          "subject_map": { "column": "iri" }
        }
      ]
    }"#;

    let doc = MappingDocument::from_json(json).unwrap();
    assert_eq!(doc.triples_maps[0].logical_table, LogicalTable::Unsupported);
}

#[test]
fn test_duplicate_triples_map_id() {
    let json = r#"
    {
      "triples_maps": [
        {
          "id": "A",
          "logical_table": { "kind": "table_name", "name": "a" },
          "subject_map": { "column": "iri" }
        },
        {
          "id": "A",
          "logical_table": { "kind": "table_name", "name": "b" },
          "subject_map": { "column": "iri" }
        }
      ]
    }"#;

    let err = MappingDocument::from_json(json).unwrap_err();
    assert!(matches!(err, MappingError::DuplicateTriplesMap(ref id) if id == "A"));
    assert_eq!(err.to_string(), "Duplicate triples map id: A");
}

#[test]
fn test_malformed_template() {
    let json = r#"
    {
      "triples_maps": [
        {
          "id": "A",
          "logical_table": { "kind": "table_name", "name": "a" },
          "subject_map": { "template": "http://ex.org/{id" }
        }
      ]
    }"#;

    let err = MappingDocument::from_json(json).unwrap_err();
    assert!(matches!(err, MappingError::InvalidTemplate { .. }));
}

#[test]
fn test_invalid_json() {
    let err = MappingDocument::from_json("{ not json").unwrap_err();
    assert!(matches!(err, MappingError::Json(_)));
}

#[test]
fn test_missing_file() {
    let err = MappingDocument::from_file("/nonexistent/mapping.json").unwrap_err();
    assert!(matches!(err, MappingError::Io(_)));
}

#[test]
fn test_document_round_trips_through_json() {
    let doc = MappingDocument::from_json(MAPPING).unwrap();
    let json = serde_json::to_string(&doc).unwrap();
    let reloaded = MappingDocument::from_json(&json).unwrap();

    assert_eq!(reloaded, doc);
}
