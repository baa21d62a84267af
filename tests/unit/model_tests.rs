//! Unit tests for the schema entity model

use db_schema_diff::model::{
    Catalog, Column, DbObjectType, Function, Parameter, SchemaObject, SchemaQualified, SqlType,
    Table, TableValuedFunction, View, DUMMY_STRING,
};
use db_schema_diff::util::eq_ignore_case;
use pretty_assertions::assert_eq;

use crate::common::{int_type, sample_catalog, table_with_columns};

// ============================================================================
// Ordering
// ============================================================================

#[test]
fn test_add_column_keeps_sorted_dense_order() {
    let table = table_with_columns("T", &[("c", 70), ("a", 3), ("b", 9)]);

    let names: Vec<&str> = table.columns().iter().map(|c| c.name()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    for (index, column) in table.columns().iter().enumerate() {
        assert_eq!(column.fake_order_id(), index as i32);
    }
    assert_eq!(table.columns()[2].order_id(), 70);
}

#[test]
fn test_equal_order_ids_keep_insertion_order() {
    let table = table_with_columns("T", &[("first", 1), ("second", 1)]);
    assert_eq!(table.columns()[0].name(), "first");
    assert_eq!(table.columns()[1].name(), "second");
    assert_eq!(table.columns()[1].fake_order_id(), 1);
}

#[test]
fn test_return_values_reindexed() {
    let mut function = Function::new("fn", 1, "dbo");
    function.add_return_value(Parameter::new("b", int_type(), 4));
    function.add_return_value(Parameter::new("a", int_type(), 2));
    let fake: Vec<(&str, i32)> = function
        .return_values()
        .iter()
        .map(|r| (r.name(), r.parameter().fake_order_id()))
        .collect();
    assert_eq!(fake, vec![("a", 0), ("b", 1)]);
}

// ============================================================================
// Naming and kinds
// ============================================================================

#[test]
fn test_catalog_full_name_and_kind() {
    let catalog = Catalog::new("Sales", "sql01");
    assert_eq!(catalog.full_name(), "[sql01] Sales");
    assert_eq!(catalog.object_type(), DbObjectType::DatabaseCatalog);
    assert_eq!(catalog.server(), "sql01");
}

#[test]
fn test_default_entities_carry_placeholders() {
    assert_eq!(Catalog::default().name(), DUMMY_STRING);
    assert_eq!(Table::default().name(), DUMMY_STRING);
    assert_eq!(View::default().schema_name(), DUMMY_STRING);
}

#[test]
fn test_embedded_kinds_share_identity() {
    let tvf = TableValuedFunction::new("fn_t", 12, "etl");
    assert_eq!(tvf.full_name(), "[etl].[fn_t]");
    assert_eq!(tvf.function().procedure().trigger().object_id(), 12);
    assert_eq!(tvf.object_type(), DbObjectType::Function);

    let column = Column::new("id", int_type(), 1, "");
    assert_eq!(column.parameter().name(), "id");
    assert_eq!(column.object_type(), DbObjectType::Parameter);
}

#[test]
fn test_data_type_name_is_derived() {
    let mut data_type = int_type();
    assert_eq!(data_type.name(), "Int");
    data_type.sql_type = SqlType::Xml;
    assert_eq!(data_type.name(), "Xml");
    assert_eq!(data_type.object_type(), DbObjectType::DatabaseType);
}

#[test]
fn test_identity_is_ascii_case_insensitive() {
    assert!(Table::new("Users", "DBO").is_same_db_name(&Table::new("USERS", "dbo")));
    assert!(!Table::new("Users", "dbo").is_same_db_name(&Table::new("Users", "etl")));
    assert!(eq_ignore_case("ABC", "abc"));
    assert!(!eq_ignore_case("Ä", "ä"));
}

#[test]
fn test_sample_catalog_object_count() {
    assert_eq!(sample_catalog().object_count(), 6);
}
