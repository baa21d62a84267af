//! Common test utilities for db-schema-diff tests
#![allow(dead_code)]

use std::path::PathBuf;

use db_schema_diff::model::{
    Catalog, Column, DataType, Function, Parameter, SqlType, StoredProcedure, Table,
    TableValuedFunction, Trigger, View,
};
use db_schema_diff::serialize::{save_snapshot, SnapshotFormat};
use tempfile::TempDir;

pub fn int_type() -> DataType {
    DataType::new(SqlType::Int, 4, 10, 0, false)
}

pub fn nvarchar(length: i32) -> DataType {
    DataType::new(SqlType::NVarChar, length, 0, 0, true)
}

/// Table whose columns are `(name, order_id)` pairs, all `int`
pub fn table_with_columns(name: &str, columns: &[(&str, i32)]) -> Table {
    let mut table = Table::new(name, "dbo");
    for (column, order_id) in columns {
        table.add_column(Column::new(*column, int_type(), *order_id, ""));
    }
    table
}

/// Catalog exercising every entity kind
pub fn sample_catalog() -> Catalog {
    let mut catalog = Catalog::new("Sales", "sql01");

    let mut users = Table::new("Users", "dbo");
    users.add_column(Column::new("id", int_type(), 1, ""));
    users.add_column(
        Column::new("name", nvarchar(100), 2, "Latin1_General_CI_AS").with_default("(N'')"),
    );
    users.add_trigger(
        Trigger::new("trg_users_audit", 501, "dbo")
            .with_script_text("CREATE TRIGGER trg_users_audit ON dbo.Users AFTER UPDATE AS\r\nSELECT 1"),
    );
    catalog.tables.push(users);
    catalog
        .tables
        .push(table_with_columns("Orders", &[("id", 1), ("user_id", 2), ("total", 3)]));

    let mut sp = StoredProcedure::new("sp_get_user", 601, "dbo");
    sp.set_script_text("CREATE PROCEDURE dbo.sp_get_user @id int AS SELECT * FROM dbo.Users WHERE id = @id");
    sp.add_parameter(Parameter::new("@id", int_type(), 1));
    catalog.stored_procedures.push(sp);

    let mut function = Function::new("fn_user_name", 701, "dbo");
    function.set_script_text("CREATE FUNCTION dbo.fn_user_name(@id int) RETURNS nvarchar(100)");
    function.add_parameter(Parameter::new("@id", int_type(), 1));
    function.add_return_value(Parameter::new("", nvarchar(100), 0));
    catalog.functions.push(function);

    let mut tvf = TableValuedFunction::new("fn_orders_of", 801, "dbo");
    tvf.function_mut()
        .set_script_text("CREATE FUNCTION dbo.fn_orders_of(@user int) RETURNS TABLE AS RETURN SELECT id FROM dbo.Orders");
    tvf.function_mut().add_parameter(Parameter::new("@user", int_type(), 1));
    tvf.function_mut()
        .add_return_value(Column::new("id", int_type(), 1, ""));
    catalog.table_valued_functions.push(tvf);

    catalog.views.push(View::new(
        "v_active_users",
        "rpt",
        "CREATE VIEW rpt.v_active_users AS SELECT id FROM dbo.Users",
    ));

    catalog
}

/// Temporary directory holding snapshot files for one test
pub struct TestContext {
    /// Kept to prevent temp directory cleanup until TestContext is dropped
    _temp_dir: TempDir,
    pub dir: PathBuf,
}

impl TestContext {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let dir = temp_dir.path().to_path_buf();
        Self {
            _temp_dir: temp_dir,
            dir,
        }
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Save `catalog` under `file_name`, format inferred from the extension
    pub fn save(&self, file_name: &str, catalog: &Catalog) -> PathBuf {
        let path = self.path(file_name);
        save_snapshot(&path, catalog, SnapshotFormat::from_path(&path))
            .expect("Failed to save snapshot");
        path
    }
}
