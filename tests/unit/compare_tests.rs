//! Unit tests for the comparison engine

use db_schema_diff::compare::{
    compare_catalogs, compare_stored_procedure, compare_table, CompareResult, CompareResultType,
};
use db_schema_diff::model::{
    Catalog, Column, DbObjectType, Parameter, StoredProcedure, Table, View,
};
use pretty_assertions::assert_eq;

use crate::common::{int_type, nvarchar, sample_catalog, table_with_columns};

fn all_nodes<'r, 'a>(result: &'r CompareResult<'a>, out: &mut Vec<&'r CompareResult<'a>>) {
    out.push(result);
    for inner in result.inner_results() {
        all_nodes(inner, out);
    }
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_reflexive() {
    let catalog = sample_catalog();
    let copy = catalog.clone();
    let result = compare_catalogs(&catalog, &copy).unwrap();

    let mut nodes = Vec::new();
    all_nodes(&result, &mut nodes);
    assert!(nodes.len() > 10);
    assert!(nodes.iter().all(|n| n.own_result_type().is_equal()));
    assert_eq!(result.compare_result_type(), CompareResultType::EQUAL);
}

/// Same schema as `sample_catalog` up to identifier case and absolute order ids
fn renamed_and_renumbered_catalog() -> (Catalog, Catalog) {
    let mut master = Catalog::new("Sales", "sql01");
    let mut checked = Catalog::new("SALES", "sql02");

    let mut users = Table::new("Users", "dbo");
    users.add_column(Column::new("id", int_type(), 1, ""));
    users.add_column(Column::new("name", nvarchar(50), 2, ""));
    master.tables.push(users);
    let mut users = Table::new("USERS", "DBO");
    users.add_column(Column::new("name", nvarchar(50), 20, ""));
    users.add_column(Column::new("id", int_type(), 10, ""));
    checked.tables.push(users);

    let text = "CREATE PROCEDURE dbo.sp_touch @id int, @flag int AS SELECT 1";
    let mut sp = StoredProcedure::new("sp_touch", 10, "dbo");
    sp.set_script_text(text);
    sp.add_parameter(Parameter::new("@id", int_type(), 1));
    sp.add_parameter(Parameter::new("@flag", int_type(), 2));
    master.stored_procedures.push(sp);
    let mut sp = StoredProcedure::new("SP_TOUCH", 99, "Dbo");
    sp.set_script_text(text);
    sp.add_parameter(Parameter::new("@flag", int_type(), 7));
    sp.add_parameter(Parameter::new("@id", int_type(), 3));
    checked.stored_procedures.push(sp);

    master.views.push(View::new("v_a", "rpt", "SELECT 1"));
    checked.views.push(View::new("V_A", "RPT", "SELECT 1"));

    (master, checked)
}

#[test]
fn test_equal_is_symmetric_for_distinct_catalogs() {
    let (master, checked) = renamed_and_renumbered_catalog();

    let forward = compare_catalogs(&master, &checked).unwrap();
    let backward = compare_catalogs(&checked, &master).unwrap();

    for result in [&forward, &backward] {
        let mut nodes = Vec::new();
        all_nodes(result, &mut nodes);
        assert!(nodes.iter().all(|n| n.own_result_type().is_equal()));
        assert_eq!(result.compare_result_type(), CompareResultType::EQUAL);
    }
}

#[test]
fn test_missing_and_redundant_swap_on_reversal() {
    let master = sample_catalog();
    let mut checked = sample_catalog();
    checked.views.clear();
    checked.tables.push(table_with_columns("Audit", &[("id", 1)]));

    let forward = compare_catalogs(&master, &checked).unwrap();
    let backward = compare_catalogs(&checked, &master).unwrap();

    let expected = CompareResultType::MISSING | CompareResultType::REDUNDANT;
    assert_eq!(forward.compare_result_type(), expected);
    assert_eq!(backward.compare_result_type(), expected);

    let find = |result: &CompareResult<'_>, name: &str| {
        result
            .inner_results()
            .iter()
            .find(|r| r.object_full_name() == name)
            .map(|r| r.own_result_type())
    };
    assert_eq!(find(&forward, "[rpt].[v_active_users]"), Some(CompareResultType::MISSING));
    assert_eq!(find(&backward, "[rpt].[v_active_users]"), Some(CompareResultType::REDUNDANT));
    assert_eq!(find(&forward, "[dbo].[Audit]"), Some(CompareResultType::REDUNDANT));
    assert_eq!(find(&backward, "[dbo].[Audit]"), Some(CompareResultType::MISSING));
}

#[test]
fn test_one_sided_nodes_have_no_children() {
    let master = sample_catalog();
    let checked = Catalog::new("Sales", "sql02");
    let result = compare_catalogs(&master, &checked).unwrap();

    assert_eq!(result.inner_results().len(), master.object_count());
    for inner in result.inner_results() {
        assert_eq!(inner.own_result_type(), CompareResultType::MISSING);
        assert!(inner.inner_results().is_empty());
        assert!(inner.checked().is_none());
    }
}

#[test]
fn test_root_name_and_kind() {
    let catalog = sample_catalog();
    let result = compare_catalogs(&catalog, &catalog).unwrap();
    assert_eq!(result.object_full_name(), "[sql01] Sales");
    assert_eq!(result.db_object_type(), DbObjectType::DatabaseCatalog);
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_extra_column_is_redundant_and_shifted_column_equal() {
    let master = table_with_columns("T", &[("id", 0), ("name", 1)]);
    let checked = table_with_columns("T", &[("id", 0), ("age", 1), ("name", 2)]);

    let result = compare_table(&master, &checked).unwrap();
    let verdicts: Vec<(String, CompareResultType)> = result
        .inner_results()
        .iter()
        .map(|r| (r.object_full_name(), r.compare_result_type()))
        .collect();

    assert_eq!(
        verdicts,
        vec![
            ("id".to_string(), CompareResultType::EQUAL),
            ("name".to_string(), CompareResultType::EQUAL),
            ("age".to_string(), CompareResultType::REDUNDANT),
        ]
    );
    assert_eq!(result.compare_result_type(), CompareResultType::REDUNDANT);
}

#[test]
fn test_reordered_columns_are_different() {
    let master = table_with_columns("T", &[("a", 1), ("b", 2)]);
    let checked = table_with_columns("T", &[("b", 1), ("a", 2)]);
    let result = compare_table(&master, &checked).unwrap();
    assert!(result
        .inner_results()
        .iter()
        .all(|r| r.own_result_type() == CompareResultType::DIFFERENT));
}

#[test]
fn test_column_type_change_is_different() {
    let mut master = table_with_columns("T", &[("id", 1)]);
    master.add_column(Column::new("name", nvarchar(50), 2, ""));
    let mut checked = table_with_columns("T", &[("id", 1)]);
    checked.add_column(Column::new("name", nvarchar(80), 2, ""));

    let result = compare_table(&master, &checked).unwrap();
    let name = &result.inner_results()[1];
    assert_eq!(name.own_result_type(), CompareResultType::EQUAL);
    assert_eq!(name.compare_result_type(), CompareResultType::DIFFERENT);
    assert_eq!(name.inner_results()[0].db_object_type(), DbObjectType::DatabaseType);
}

#[test]
fn test_procedure_text_change_keeps_parameters_equal() {
    let mut master = StoredProcedure::new("sp", 1, "dbo");
    master.set_script_text("SELECT 1");
    master.add_parameter(Parameter::new("@a", int_type(), 1));
    let mut checked = master.clone();
    checked.set_script_text("SELECT 2");

    let result = compare_stored_procedure(&master, &checked).unwrap();
    assert_eq!(result.own_result_type(), CompareResultType::DIFFERENT);
    assert_eq!(result.inner_results().len(), 1);
    assert_eq!(
        result.inner_results()[0].compare_result_type(),
        CompareResultType::EQUAL
    );
}

#[test]
fn test_parameter_names_match_exactly() {
    let mut master = StoredProcedure::new("sp", 1, "dbo");
    master.add_parameter(Parameter::new("@Id", int_type(), 1));
    let mut checked = StoredProcedure::new("sp", 1, "dbo");
    checked.add_parameter(Parameter::new("@id", int_type(), 1));

    let result = compare_stored_procedure(&master, &checked).unwrap();
    assert_eq!(
        result.compare_result_type(),
        CompareResultType::MISSING | CompareResultType::REDUNDANT
    );
}

#[test]
fn test_view_only_in_master() {
    let mut master = Catalog::new("db", "srv");
    master.views.push(View::new("v1", "dbo", "SELECT 1"));
    let checked = Catalog::new("db", "srv");

    let result = compare_catalogs(&master, &checked).unwrap();
    assert_eq!(result.inner_results().len(), 1);
    let view = &result.inner_results()[0];
    assert_eq!(view.own_result_type(), CompareResultType::MISSING);
    assert_eq!(view.master().map(|m| m.full_name()), Some("[dbo].[v1]".to_string()));
    assert!(result.compare_result_type().contains(CompareResultType::MISSING));
}

#[test]
fn test_view_text_change_is_different() {
    let mut master = Catalog::new("db", "srv");
    master.views.push(View::new("v1", "dbo", "SELECT 1"));
    let mut checked = Catalog::new("db", "srv");
    checked.views.push(View::new("V1", "DBO", "SELECT 2"));

    let result = compare_catalogs(&master, &checked).unwrap();
    assert_eq!(result.inner_results().len(), 1);
    assert_eq!(result.compare_result_type(), CompareResultType::DIFFERENT);
}

#[test]
fn test_inputs_are_not_mutated() {
    let master = sample_catalog();
    let mut checked = sample_catalog();
    checked.tables[0].triggers.clear();
    let (master_before, checked_before) = (master.clone(), checked.clone());

    let _ = compare_catalogs(&master, &checked).unwrap();
    assert_eq!(master, master_before);
    assert_eq!(checked, checked_before);
}
