//! Unit tests for building catalogs from introspection rows

use db_schema_diff::builder::{CatalogBuilder, ObjectTypeCode, ParamRow, TextRow};
use db_schema_diff::compare::compare_catalogs;
use db_schema_diff::model::{RoutineParameter, SchemaObject, SqlType};
use db_schema_diff::SchemaError;
use pretty_assertions::assert_eq;

fn row(object: &str, code: &str, param: &str, type_name: &str, order_id: i32) -> ParamRow {
    ParamRow::new("dbo", object, code.parse().unwrap(), param, type_name, order_id)
}

/// Rows as a catalog query would return them, sorted by parameter name
fn sample_rows() -> (Vec<ParamRow>, Vec<TextRow>) {
    let mut name = row("Users", "U ", "name", "nvarchar", 2);
    name.length = 100;
    name.collation = Some("Latin1_General_CI_AS".to_string());
    let mut id = row("Users", "U ", "id", "int", 1);
    id.is_nullable = false;

    let params = vec![
        id,
        name,
        row("sp_get", "P ", "@id", "int", 1),
        row("fn_total", "FN", "", "money", 0),
        row("fn_total", "FN", "@order", "int", 1),
        row("fn_lines", "IF", "@order", "int", 1),
        row("fn_lines", "IF", "line_no", "smallint", 1),
        row("v_users", "V ", "id", "int", 1),
    ];
    let texts = vec![
        TextRow::new("dbo", "sp_get", ObjectTypeCode::P, 2, " SELECT 1"),
        TextRow::new("dbo", "sp_get", ObjectTypeCode::P, 1, "CREATE PROCEDURE sp_get @id int AS"),
        TextRow::new("dbo", "v_users", ObjectTypeCode::V, 1, "CREATE VIEW v_users AS SELECT id FROM Users"),
        TextRow::new("dbo", "trg_users", ObjectTypeCode::TR, 1, "CREATE TRIGGER trg_users ON Users")
            .with_parent("Users"),
        TextRow::new("dbo", "fn_lines", ObjectTypeCode::IF, 1, "CREATE FUNCTION fn_lines"),
    ];
    (params, texts)
}

fn build(params: Vec<ParamRow>, texts: Vec<TextRow>) -> Result<db_schema_diff::model::Catalog, SchemaError> {
    let mut builder = CatalogBuilder::new("sql01", "Sales");
    for param in params {
        builder.add_param_row(param)?;
    }
    for text in texts {
        builder.add_text_row(text)?;
    }
    builder.build()
}

#[test]
fn test_builds_every_kind() {
    let (params, texts) = sample_rows();
    let catalog = build(params, texts).unwrap();

    assert_eq!(catalog.full_name(), "[sql01] Sales");
    assert_eq!(catalog.tables.len(), 1);
    assert_eq!(catalog.stored_procedures.len(), 1);
    assert_eq!(catalog.functions.len(), 1);
    assert_eq!(catalog.table_valued_functions.len(), 1);
    assert_eq!(catalog.views.len(), 1);

    let users = &catalog.tables[0];
    assert_eq!(users.columns()[0].name(), "id");
    assert!(!users.columns()[0].data_type().allow_null);
    assert_eq!(users.columns()[1].collation, "Latin1_General_CI_AS");
    assert_eq!(users.triggers.len(), 1);
    assert_eq!(users.triggers[0].script_text(), "CREATE TRIGGER trg_users ON Users");

    assert_eq!(
        catalog.stored_procedures[0].script_text(),
        "CREATE PROCEDURE sp_get @id int AS SELECT 1"
    );
    assert_eq!(
        catalog.functions[0].return_values()[0].parameter().data_type().sql_type,
        SqlType::Money
    );

    let lines = catalog.table_valued_functions[0].function();
    assert_eq!(lines.script_text(), "CREATE FUNCTION fn_lines");
    assert_eq!(lines.parameters()[0].name(), "@order");
    assert!(matches!(lines.return_values()[0], RoutineParameter::Column(_)));

    assert_eq!(catalog.views[0].text, "CREATE VIEW v_users AS SELECT id FROM Users");
}

#[test]
fn test_row_order_does_not_matter() {
    let (params, texts) = sample_rows();
    let forward = build(params.clone(), texts.clone()).unwrap();
    let reversed = build(
        params.into_iter().rev().collect(),
        texts.into_iter().rev().collect(),
    )
    .unwrap();

    let result = compare_catalogs(&forward, &reversed).unwrap();
    assert!(result.compare_result_type().is_equal());
}

#[test]
fn test_duplicate_fragment_kept_once() {
    let texts = vec![
        TextRow::new("dbo", "v", ObjectTypeCode::V, 1, "SELECT 1"),
        TextRow::new("dbo", "V", ObjectTypeCode::V, 1, "SELECT 1"),
    ];
    let catalog = build(Vec::new(), texts).unwrap();
    assert_eq!(catalog.views.len(), 1);
    assert_eq!(catalog.views[0].text, "SELECT 1");
}

#[test]
fn test_trigger_without_parent_name_fails() {
    let texts = vec![TextRow::new("dbo", "trg", ObjectTypeCode::TR, 1, "CREATE TRIGGER")];
    assert!(matches!(
        build(Vec::new(), texts),
        Err(SchemaError::MissingParentObject { .. })
    ));
}

#[test]
fn test_unknown_code_fails_to_parse() {
    assert!(matches!(
        "Q".parse::<ObjectTypeCode>(),
        Err(SchemaError::UnknownObjectTypeCode { .. })
    ));
}

#[test]
fn test_constraint_rows_not_implemented() {
    let params = vec![row("PK_Users", "PK", "id", "int", 1)];
    let err = build(params, Vec::new()).unwrap_err();
    assert!(
        matches!(err, SchemaError::VariantNotImplemented { ref code, .. } if code == "PK"),
        "unexpected error: {err}"
    );
}
