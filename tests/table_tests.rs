//! Tests for the table protocol
//!
//! These tests verify:
//! - Identifier assignment on insert
//! - Point reads and in-place updates by id
//! - Full iteration and sorted range queries
//! - Persistence across re-binding

mod common;

use std::fs;

use blocktable::{Config, FieldCodec, Record, Schema, SchemaError, Table, TableError, Value};

use common::{person_schema, setup_temp_file};

// =============================================================================
// Helper Functions
// =============================================================================

fn person(table: &Table, name: &str, age: u32) -> Record {
    let mut record = table.new_record();
    record.set("name", name).unwrap();
    record.set("age", age).unwrap();
    record
}

fn age_of(record: &Record) -> u32 {
    record.get("age").unwrap().as_u64().unwrap() as u32
}

/// Table holding people with the given ages, inserted in order
fn table_with_ages(table: &mut Table, ages: &[u32]) {
    for (i, &age) in ages.iter().enumerate() {
        let mut record = person(table, &format!("p{}", i), age);
        table.insert(&mut record).unwrap();
    }
}

// =============================================================================
// Scenario
// =============================================================================

#[test]
fn test_person_scenario() {
    let (_temp, path) = setup_temp_file("person.tbl");
    let mut table = Table::bind(person_schema(), &path).unwrap();

    let mut alex = person(&table, "alex", 32);
    let id = table.insert(&mut alex).unwrap();
    assert_eq!(id, 1);
    assert_eq!(alex.id(), 1);
    assert_eq!(table.size().unwrap(), 1);

    for age in 30..34 {
        let mut other = person(&table, "alex", age);
        table.insert(&mut other).unwrap();
    }
    assert_eq!(table.size().unwrap(), 5);

    let mut stored = table.get(1).unwrap();
    assert_eq!(stored.get("name").unwrap(), &Value::from("alex"));
    assert_eq!(age_of(&stored), 32);

    stored.set("age", 33u32).unwrap();
    table.update(&stored).unwrap();

    let reread = table.get(1).unwrap();
    assert_eq!(age_of(&reread), 33);
    assert_eq!(reread.get("name").unwrap().as_str(), Some("alex"));
    assert_eq!(table.size().unwrap(), 5);
}

// =============================================================================
// Insert Tests
// =============================================================================

#[test]
fn test_insert_assigns_next_id() {
    let (_temp, path) = setup_temp_file("person.tbl");
    let mut table = Table::bind(person_schema(), &path).unwrap();

    for expected in 1..=10u64 {
        let before = table.size().unwrap();
        let mut record = person(&table, "n", expected as u32);
        assert_eq!(table.insert(&mut record).unwrap(), before + 1);
        assert_eq!(record.id(), expected);
        assert_eq!(table.size().unwrap(), before + 1);
    }
}

#[test]
fn test_insert_writes_id_into_block() {
    let (_temp, path) = setup_temp_file("person.tbl");
    let mut table = Table::bind(person_schema(), &path).unwrap();

    let mut first = person(&table, "a", 1);
    let mut second = person(&table, "b", 2);
    table.insert(&mut first).unwrap();
    table.insert(&mut second).unwrap();

    let raw = fs::read(&path).unwrap();
    let width = table.schema().block_width();
    assert_eq!(raw.len(), 2 * width);
    assert_eq!(&raw[width..width + 8], &2u64.to_be_bytes());
    assert_eq!(table.get(2).unwrap().id(), 2);
}

#[test]
fn test_insert_with_id_fails() {
    let (_temp, path) = setup_temp_file("person.tbl");
    let mut table = Table::bind(person_schema(), &path).unwrap();

    let mut record = person(&table, "alex", 32);
    table.insert(&mut record).unwrap();

    let err = table.insert(&mut record).unwrap_err();
    assert!(matches!(
        err,
        TableError::Schema(SchemaError::AlreadyInserted(1))
    ));
    assert_eq!(table.size().unwrap(), 1);

    let mut fetched = table.get(1).unwrap();
    assert!(table.insert(&mut fetched).is_err());
}

#[cfg(target_os = "linux")]
#[test]
fn test_failed_insert_resets_id() {
    // Writes to /dev/full fail with ENOSPC while its length stays 0
    let mut table = Table::bind(person_schema(), "/dev/full".as_ref()).unwrap();

    let mut record = person(&table, "alex", 32);
    assert!(matches!(
        table.insert(&mut record),
        Err(TableError::Io(_))
    ));
    assert_eq!(record.id(), 0);
    assert_eq!(table.size().unwrap(), 0);
}

#[test]
fn test_insert_rejects_foreign_schema() {
    let (_temp, path) = setup_temp_file("person.tbl");
    let mut table = Table::bind(person_schema(), &path).unwrap();

    let other = Schema::builder("Other")
        .id()
        .field("flag", FieldCodec::boolean())
        .build()
        .unwrap();
    let mut record = Record::new(&other);

    let err = table.insert(&mut record).unwrap_err();
    assert!(matches!(
        err,
        TableError::Schema(SchemaError::SchemaMismatch { .. })
    ));
    assert_eq!(record.id(), 0);
    assert!(table.is_empty().unwrap());
}

#[test]
fn test_equal_schema_built_twice_is_accepted() {
    let (_temp, path) = setup_temp_file("person.tbl");
    let mut table = Table::bind(person_schema(), &path).unwrap();

    let mut record = Record::with_values(&person_schema(), [("age", 5u32)]).unwrap();
    assert_eq!(table.insert(&mut record).unwrap(), 1);
}

// =============================================================================
// Get / Update Tests
// =============================================================================

#[test]
fn test_get_invalid_ids() {
    let (_temp, path) = setup_temp_file("person.tbl");
    let mut table = Table::bind(person_schema(), &path).unwrap();
    table_with_ages(&mut table, &[1, 2, 3]);

    for id in [0u64, 4, 100] {
        let err = table.get(id).unwrap_err();
        assert!(err.is_schema_error());
        assert!(matches!(
            err,
            TableError::Schema(SchemaError::InvalidId { size: 3, .. })
        ));
    }
    assert!(table.get(3).is_ok());
}

#[test]
fn test_index_of() {
    let (_temp, path) = setup_temp_file("person.tbl");
    let mut table = Table::bind(person_schema(), &path).unwrap();
    table_with_ages(&mut table, &[1, 2]);

    assert_eq!(table.index_of(1).unwrap(), 0);
    assert_eq!(table.index_of(2).unwrap(), 1);
    assert!(table.index_of(0).is_err());
    assert!(table.index_of(3).is_err());
}

#[test]
fn test_update_keeps_size_and_other_records() {
    let (_temp, path) = setup_temp_file("person.tbl");
    let mut table = Table::bind(person_schema(), &path).unwrap();
    table_with_ages(&mut table, &[10, 20, 30]);

    let mut middle = table.get(2).unwrap();
    middle.set("name", "changed").unwrap();
    table.update(&middle).unwrap();

    assert_eq!(table.size().unwrap(), 3);
    assert_eq!(table.get(2).unwrap(), middle);
    assert_eq!(table.get(1).unwrap().get("name").unwrap().as_str(), Some("p0"));
    assert_eq!(table.get(3).unwrap().get("name").unwrap().as_str(), Some("p2"));
}

#[test]
fn test_update_uninserted_record_fails() {
    let (_temp, path) = setup_temp_file("person.tbl");
    let mut table = Table::bind(person_schema(), &path).unwrap();
    table_with_ages(&mut table, &[1]);

    let record = person(&table, "ghost", 99);
    assert!(matches!(
        table.update(&record),
        Err(TableError::Schema(SchemaError::InvalidId { id: 0, .. }))
    ));
    assert_eq!(table.size().unwrap(), 1);
}

#[test]
fn test_stale_record_does_not_see_updates() {
    let (_temp, path) = setup_temp_file("person.tbl");
    let mut table = Table::bind(person_schema(), &path).unwrap();
    table_with_ages(&mut table, &[1]);

    let stale = table.get(1).unwrap();
    let mut fresh = table.get(1).unwrap();
    fresh.set("age", 2u32).unwrap();
    table.update(&fresh).unwrap();

    assert_eq!(age_of(&stale), 1);
    assert_eq!(age_of(&table.get(1).unwrap()), 2);
}

// =============================================================================
// Iteration Tests
// =============================================================================

#[test]
fn test_all_in_id_order() {
    let (_temp, path) = setup_temp_file("person.tbl");
    let mut table = Table::bind(person_schema(), &path).unwrap();
    table_with_ages(&mut table, &[7, 3, 9]);

    let records: Vec<Record> = table.all().unwrap().map(|r| r.unwrap()).collect();
    let ids: Vec<u64> = records.iter().map(|r| r.id()).collect();
    let ages: Vec<u32> = records.iter().map(age_of).collect();

    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(ages, vec![7, 3, 9]);
}

#[test]
fn test_all_is_restartable() {
    let (_temp, path) = setup_temp_file("person.tbl");
    let mut table = Table::bind(person_schema(), &path).unwrap();
    table_with_ages(&mut table, &[1, 2]);

    assert_eq!(table.all().unwrap().count(), 2);
    table_with_ages(&mut table, &[3]);
    assert_eq!(table.all().unwrap().count(), 3);
}

#[test]
fn test_all_on_empty_table() {
    let (_temp, path) = setup_temp_file("person.tbl");
    let table = Table::bind(person_schema(), &path).unwrap();

    assert_eq!(table.all().unwrap().count(), 0);
}

#[test]
fn test_between_sorted_ages() {
    let (_temp, path) = setup_temp_file("person.tbl");
    let mut table = Table::bind(person_schema(), &path).unwrap();
    table_with_ages(&mut table, &[10, 20, 20, 30, 40, 50]);

    let ages: Vec<u32> = table
        .between(&20, &40, age_of)
        .unwrap()
        .map(|r| age_of(&r.unwrap()))
        .collect();
    assert_eq!(ages, vec![20, 20, 30]);

    let ages: Vec<u32> = table
        .between(&0, &15, age_of)
        .unwrap()
        .map(|r| age_of(&r.unwrap()))
        .collect();
    assert_eq!(ages, vec![10]);

    assert_eq!(table.between(&51, &100, age_of).unwrap().count(), 0);
    assert_eq!(table.between(&0, &1000, age_of).unwrap().count(), 6);
    assert_eq!(table.between(&25, &25, age_of).unwrap().count(), 0);
}

#[test]
fn test_between_inverted_range_is_empty() {
    let (_temp, path) = setup_temp_file("person.tbl");
    let mut table = Table::bind(person_schema(), &path).unwrap();
    table_with_ages(&mut table, &[10, 20, 30, 40]);

    assert_eq!(table.between(&35, &15, age_of).unwrap().count(), 0);
    assert_eq!(table.between(&1000, &0, age_of).unwrap().count(), 0);
}

#[test]
fn test_between_by_id() {
    let (_temp, path) = setup_temp_file("person.tbl");
    let mut table = Table::bind(person_schema(), &path).unwrap();
    table_with_ages(&mut table, &[5, 4, 3, 2, 1]);

    let ids: Vec<u64> = table
        .between(&2u64, &4u64, Record::id)
        .unwrap()
        .map(|r| r.unwrap().id())
        .collect();
    assert_eq!(ids, vec![2, 3]);
}

#[test]
fn test_between_by_value() {
    let (_temp, path) = setup_temp_file("person.tbl");
    let mut table = Table::bind(person_schema(), &path).unwrap();
    for name in ["ann", "bob", "cat", "dan"] {
        let mut record = person(&table, name, 0);
        table.insert(&mut record).unwrap();
    }

    let names: Vec<String> = table
        .between(&Value::from("b"), &Value::from("d"), |r| {
            r.get("name").unwrap().clone()
        })
        .unwrap()
        .map(|r| r.unwrap().get("name").unwrap().as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["bob", "cat"]);
}

#[test]
fn test_between_verifies_order_when_configured() {
    let (_temp, path) = setup_temp_file("person.tbl");
    {
        let mut table = Table::bind(person_schema(), &path).unwrap();
        table_with_ages(&mut table, &[1, 3, 2]);
    }

    let config = Config::builder().verify_sorted(true).build();
    let table = Table::open(person_schema(), &path, &config).unwrap();

    assert!(matches!(
        table.between(&0, &10, age_of),
        Err(TableError::Unsorted { index: 2 })
    ));
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_rebind_sees_previous_records() {
    let (_temp, path) = setup_temp_file("person.tbl");
    {
        let mut table = Table::bind(person_schema(), &path).unwrap();
        table_with_ages(&mut table, &[21, 22]);
    }

    let mut table = Table::bind(person_schema(), &path).unwrap();
    assert_eq!(table.size().unwrap(), 2);
    assert_eq!(age_of(&table.get(2).unwrap()), 22);

    let mut record = person(&table, "late", 23);
    assert_eq!(table.insert(&mut record).unwrap(), 3);
}

#[test]
fn test_display_after_insert() {
    let (_temp, path) = setup_temp_file("person.tbl");
    let mut table = Table::bind(person_schema(), &path).unwrap();

    let mut alex = person(&table, "alex", 32);
    table.insert(&mut alex).unwrap();

    assert_eq!(
        table.get(1).unwrap().to_string(),
        "Person(id=1, name=\"alex\", age=32)"
    );
}
