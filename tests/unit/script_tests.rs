//! Unit tests for creation script generation

use db_schema_diff::model::{Catalog, Column, DataType, SqlType, Table};
use db_schema_diff::script::generate_create_script;
use pretty_assertions::assert_eq;

use crate::common::sample_catalog;

#[test]
fn test_empty_catalog_has_all_sections() {
    let script = generate_create_script(&Catalog::new("db", "srv"));
    assert_eq!(
        script,
        "--TABLES\n--STORED PROCEDURES\n--FUNCTIONS\n--TABLE VALUED FUNCTIONS\n--VIEWS\n"
    );
}

#[test]
fn test_tables_sorted_by_full_name() {
    let script = generate_create_script(&sample_catalog());
    let orders = script.find("CREATE TABLE [dbo].[Orders](").unwrap();
    let users = script.find("CREATE TABLE [dbo].[Users](").unwrap();
    assert!(orders < users);
}

#[test]
fn test_column_details() {
    let mut table = Table::new("Prices", "sales");
    table.add_column(Column::new(
        "amount",
        DataType::new(SqlType::Decimal, 9, 18, 4, false),
        1,
        "",
    ));
    table.add_column(
        Column::new(
            "note",
            DataType::new(SqlType::NVarChar, -1, 0, 0, true),
            2,
            "",
        )
        .with_default("(N'')"),
    );
    let mut catalog = Catalog::new("db", "srv");
    catalog.tables.push(table);

    let script = generate_create_script(&catalog);
    assert!(script.contains("    [amount] [Decimal](18, 4) NOT NULL,\n"));
    assert!(script.contains("    [note] [NVarChar](max) DEFAULT (N'') NULL\n) ON [PRIMARY]\n"));
}

#[test]
fn test_column_lines_separated_by_commas() {
    let script = generate_create_script(&sample_catalog());
    assert!(script.contains(
        "CREATE TABLE [dbo].[Orders](\n    [id] [Int] NOT NULL,\n    [user_id] [Int] NOT NULL,\n    [total] [Int] NOT NULL\n) ON [PRIMARY]\nGO\n"
    ));
    assert!(!script.contains(",\n)"));
}

#[test]
fn test_routine_bodies_emitted_with_batch_separator() {
    let script = generate_create_script(&sample_catalog());
    assert!(script.contains(
        "CREATE PROCEDURE dbo.sp_get_user @id int AS SELECT * FROM dbo.Users WHERE id = @id\nGO\n"
    ));
    assert!(script.contains("RETURNS nvarchar(100)\nGO\n"));
    assert!(script.contains("CREATE VIEW rpt.v_active_users AS SELECT id FROM dbo.Users\nGO\n"));
}
