//! DDL creation script for a catalog

use tracing::debug;

use crate::model::{Catalog, Column, DataType, SchemaObject, SqlType, Table};
use crate::util;

/// Type suffix for types declared with a size
fn type_suffix(data_type: &DataType) -> String {
    match data_type.sql_type {
        SqlType::Char
        | SqlType::VarChar
        | SqlType::NChar
        | SqlType::NVarChar
        | SqlType::Binary
        | SqlType::VarBinary => {
            if data_type.length < 0 {
                "(max)".to_string()
            } else {
                format!("({})", data_type.length)
            }
        }
        SqlType::Decimal => format!("({}, {})", data_type.precision, data_type.scale),
        _ => String::new(),
    }
}

fn column_line(column: &Column) -> String {
    let data_type = column.data_type();
    let mut line = format!(
        "    [{}] [{}]{}",
        column.name(),
        data_type.sql_type,
        type_suffix(data_type)
    );
    if !column.collation.is_empty() {
        line.push_str(&format!(" COLLATE {}", column.collation));
    }
    if let Some(default_value) = &column.default_value {
        line.push_str(&format!(" DEFAULT {}", default_value));
    }
    line.push_str(if data_type.allow_null { " NULL" } else { " NOT NULL" });
    line
}

fn table_script(out: &mut String, table: &Table) {
    out.push_str(&format!("CREATE TABLE {}(\n", table.full_name()));
    // columns are kept in fake order by add_column
    let lines: Vec<String> = table.columns().iter().map(column_line).collect();
    if !lines.is_empty() {
        out.push_str(&lines.join(",\n"));
        out.push('\n');
    }
    out.push_str(") ON [PRIMARY]\nGO\n\n");

    for trigger in &table.triggers {
        batch(out, trigger.script_text());
    }
}

/// Append a script body terminated by a `GO` batch separator
fn batch(out: &mut String, text: &str) {
    let text = text.trim_end();
    if text.is_empty() {
        return;
    }
    out.push_str(text);
    out.push_str("\nGO\n\n");
}

fn sorted<T: SchemaObject>(items: &[T]) -> Vec<&T> {
    let mut refs: Vec<&T> = items.iter().collect();
    refs.sort_by_key(|item| item.full_name());
    refs
}

/// Generate a creation script for every object in the catalog, grouped by
/// kind and sorted by full name within each group
pub fn generate_create_script(catalog: &Catalog) -> String {
    debug!(catalog = %catalog.full_name(), "generating create script");
    let mut out = String::new();

    out.push_str("--TABLES\n");
    for table in sorted(&catalog.tables) {
        table_script(&mut out, table);
    }

    out.push_str("--STORED PROCEDURES\n");
    for procedure in sorted(&catalog.stored_procedures) {
        batch(&mut out, procedure.script_text());
    }

    out.push_str("--FUNCTIONS\n");
    for function in sorted(&catalog.functions) {
        batch(&mut out, function.script_text());
    }

    out.push_str("--TABLE VALUED FUNCTIONS\n");
    for tvf in sorted(&catalog.table_valued_functions) {
        batch(&mut out, tvf.function().script_text());
    }

    out.push_str("--VIEWS\n");
    for view in sorted(&catalog.views) {
        let text = view.text.trim_start();
        if text.is_empty() || util::starts_with_ci(text, "CREATE") {
            batch(&mut out, text);
        } else {
            batch(
                &mut out,
                &format!("CREATE VIEW {} AS\n{}", view.full_name(), text),
            );
        }
    }

    out
}
