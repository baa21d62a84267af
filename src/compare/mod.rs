//! Structural comparison of two catalogs
//!
//! Collections are partitioned into master-only (MISSING), checked-only
//! (REDUNDANT) and matched pairs; matched pairs are compared by the
//! type-specific function, which recurses into nested collections.

pub mod report;
pub mod types;

use std::collections::HashMap;

use tracing::debug;

use crate::error::SchemaError;
use crate::model::{
    Catalog, Column, DataType, Function, Parameter, RoutineParameter, SchemaObject,
    SchemaQualified, StoredProcedure, Table, TableValuedFunction, Trigger, View,
};

pub use types::{CompareResult, CompareResultType, DbObjectRef};

/// Compare every matched pair, append MISSING children for master-only
/// items and REDUNDANT children for checked-only items.
///
/// `same` decides identity; each checked item matches at most one master item.
pub fn compare_collection<'a, T, S, C>(
    result: &mut CompareResult<'a>,
    master: &'a [T],
    checked: &'a [T],
    same: S,
    mut compare: C,
) -> Result<(), SchemaError>
where
    &'a T: Into<DbObjectRef<'a>>,
    S: Fn(&T, &T) -> bool,
    C: FnMut(&'a T, &'a T) -> Result<CompareResult<'a>, SchemaError>,
{
    let mut matched = vec![false; checked.len()];

    for left in master {
        let hit = checked
            .iter()
            .enumerate()
            .find(|(i, right)| !matched[*i] && same(left, *right));
        match hit {
            Some((i, right)) => {
                matched[i] = true;
                result.add_inner(compare(left, right)?);
            }
            None => result.add_inner(CompareResult::missing(left.into())),
        }
    }

    for (right, _) in checked.iter().zip(&matched).filter(|(_, m)| !**m) {
        result.add_inner(CompareResult::redundant(right.into()));
    }

    Ok(())
}

fn verdict(equal: bool) -> CompareResultType {
    if equal {
        CompareResultType::EQUAL
    } else {
        CompareResultType::DIFFERENT
    }
}

/// Compare two data types field by field
pub fn compare_data_type<'a>(
    master: &'a DataType,
    checked: &'a DataType,
) -> Result<CompareResult<'a>, SchemaError> {
    let mut result = CompareResult::new(Some(master.into()), Some(checked.into()));
    result.set_own_result_type(verdict(master == checked));
    Ok(result)
}

/// Compare two parameters: type child plus position
pub fn compare_parameter<'a>(
    master: &'a Parameter,
    checked: &'a Parameter,
) -> Result<CompareResult<'a>, SchemaError> {
    let mut result = CompareResult::new(Some(master.into()), Some(checked.into()));
    result.add_inner(compare_data_type(&master.data_type, &checked.data_type)?);
    result.set_own_result_type(verdict(master.fake_order_id == checked.fake_order_id));
    Ok(result)
}

/// Compare routine parameters where either side may be absent.
///
/// A one-sided comparison is DIFFERENT without inspecting fields. Passing
/// two absent sides is a caller bug.
pub fn compare_routine_parameter<'a>(
    master: Option<&'a RoutineParameter>,
    checked: Option<&'a RoutineParameter>,
) -> Result<CompareResult<'a>, SchemaError> {
    match (master, checked) {
        (Some(m), Some(c)) => match (m, c) {
            (RoutineParameter::Column(mc), RoutineParameter::Column(cc)) => {
                compare_column(mc, cc)
            }
            _ => {
                let mut result = compare_parameter(m.parameter(), c.parameter())?;
                // a parameter compared against a column is a kind change
                if std::mem::discriminant(m) != std::mem::discriminant(c) {
                    result.set_own_result_type(CompareResultType::DIFFERENT);
                }
                Ok(result)
            }
        },
        (None, None) => Err(SchemaError::InvalidArgument {
            message: "both master and checked parameter are absent".to_string(),
        }),
        (m, c) => {
            let mut result = CompareResult::new(m.map(Into::into), c.map(Into::into));
            result.set_own_result_type(CompareResultType::DIFFERENT);
            Ok(result)
        }
    }
}

/// Compare two columns by their fake order id
pub fn compare_column<'a>(
    master: &'a Column,
    checked: &'a Column,
) -> Result<CompareResult<'a>, SchemaError> {
    compare_column_at(master, checked, master.fake_order_id(), checked.fake_order_id())
}

fn compare_column_at<'a>(
    master: &'a Column,
    checked: &'a Column,
    master_position: i32,
    checked_position: i32,
) -> Result<CompareResult<'a>, SchemaError> {
    let mut result = CompareResult::new(Some(master.into()), Some(checked.into()));
    result.add_inner(compare_data_type(master.data_type(), checked.data_type())?);
    let equal = master_position == checked_position
        && master.default_value == checked.default_value
        && master.collation == checked.collation;
    result.set_own_result_type(verdict(equal));
    Ok(result)
}

/// Position of each column among the columns whose name also exists on the
/// other side. Columns are kept sorted, so slice order is fake order.
fn shared_positions<'a>(columns: &'a [Column], other: &[Column]) -> HashMap<&'a str, i32> {
    columns
        .iter()
        .filter(|c| other.iter().any(|o| o.name() == c.name()))
        .enumerate()
        .map(|(i, c)| (c.name(), i as i32))
        .collect()
}

fn shared_position(positions: &HashMap<&str, i32>, column: &Column) -> i32 {
    positions
        .get(column.name())
        .copied()
        .unwrap_or(column.fake_order_id())
}

/// Compare script bodies by exact text
pub fn compare_trigger<'a>(
    master: &'a Trigger,
    checked: &'a Trigger,
) -> Result<CompareResult<'a>, SchemaError> {
    let mut result = CompareResult::new(Some(master.into()), Some(checked.into()));
    result.set_own_result_type(verdict(master.script_text == checked.script_text));
    Ok(result)
}

fn compare_procedure_into<'a>(
    result: &mut CompareResult<'a>,
    master: &'a StoredProcedure,
    checked: &'a StoredProcedure,
) -> Result<(), SchemaError> {
    result.set_own_result_type(verdict(master.script_text() == checked.script_text()));
    compare_collection(
        result,
        &master.parameters,
        &checked.parameters,
        |l, r| l.name() == r.name(),
        |l, r| compare_routine_parameter(Some(l), Some(r)),
    )
}

/// Script text plus parameters matched by exact name
pub fn compare_stored_procedure<'a>(
    master: &'a StoredProcedure,
    checked: &'a StoredProcedure,
) -> Result<CompareResult<'a>, SchemaError> {
    let mut result = CompareResult::new(Some(master.into()), Some(checked.into()));
    compare_procedure_into(&mut result, master, checked)?;
    Ok(result)
}

fn compare_function_into<'a>(
    result: &mut CompareResult<'a>,
    master: &'a Function,
    checked: &'a Function,
) -> Result<(), SchemaError> {
    compare_procedure_into(result, &master.procedure, &checked.procedure)?;

    for master_value in &master.return_values {
        let checked_value = checked
            .return_values
            .iter()
            .find(|c| c.name() == master_value.name());
        result.add_inner(compare_routine_parameter(Some(master_value), checked_value)?);
    }
    for checked_value in &checked.return_values {
        if !master
            .return_values
            .iter()
            .any(|m| m.name() == checked_value.name())
        {
            result.add_inner(compare_routine_parameter(None, Some(checked_value))?);
        }
    }
    Ok(())
}

/// Procedure rules plus return values matched by exact name
pub fn compare_function<'a>(
    master: &'a Function,
    checked: &'a Function,
) -> Result<CompareResult<'a>, SchemaError> {
    let mut result = CompareResult::new(Some(master.into()), Some(checked.into()));
    compare_function_into(&mut result, master, checked)?;
    Ok(result)
}

pub fn compare_table_valued_function<'a>(
    master: &'a TableValuedFunction,
    checked: &'a TableValuedFunction,
) -> Result<CompareResult<'a>, SchemaError> {
    let mut result = CompareResult::new(Some(master.into()), Some(checked.into()));
    compare_function_into(&mut result, &master.function, &checked.function)?;
    Ok(result)
}

/// Compare view definitions by exact text
pub fn compare_view<'a>(
    master: &'a View,
    checked: &'a View,
) -> Result<CompareResult<'a>, SchemaError> {
    let mut result = CompareResult::new(Some(master.into()), Some(checked.into()));
    result.set_own_result_type(verdict(master.text == checked.text));
    Ok(result)
}

/// Columns by exact name, then triggers by schema-qualified name.
///
/// Column position is judged among the columns both tables share, so an
/// extra column on one side does not flag every column after it.
pub fn compare_table<'a>(
    master: &'a Table,
    checked: &'a Table,
) -> Result<CompareResult<'a>, SchemaError> {
    let mut result = CompareResult::new(Some(master.into()), Some(checked.into()));

    let master_positions = shared_positions(&master.columns, &checked.columns);
    let checked_positions = shared_positions(&checked.columns, &master.columns);
    compare_collection(
        &mut result,
        &master.columns,
        &checked.columns,
        |l, r| l.name() == r.name(),
        |l, r| {
            compare_column_at(
                l,
                r,
                shared_position(&master_positions, l),
                shared_position(&checked_positions, r),
            )
        },
    )?;

    compare_collection(
        &mut result,
        &master.triggers,
        &checked.triggers,
        |l, r| l.is_same_db_name(r),
        compare_trigger,
    )?;

    Ok(result)
}

/// Compare two catalogs. The five collections are compared independently
/// under one root result.
pub fn compare_catalogs<'a>(
    master: &'a Catalog,
    checked: &'a Catalog,
) -> Result<CompareResult<'a>, SchemaError> {
    debug!(
        master = %master.full_name(),
        checked = %checked.full_name(),
        "comparing catalogs"
    );
    let mut result = CompareResult::new(Some(master.into()), Some(checked.into()));

    compare_collection(
        &mut result,
        &master.stored_procedures,
        &checked.stored_procedures,
        |l, r| l.is_same_db_name(r),
        compare_stored_procedure,
    )?;
    compare_collection(
        &mut result,
        &master.functions,
        &checked.functions,
        |l, r| l.is_same_db_name(r),
        compare_function,
    )?;
    compare_collection(
        &mut result,
        &master.table_valued_functions,
        &checked.table_valued_functions,
        |l, r| l.is_same_db_name(r),
        compare_table_valued_function,
    )?;
    compare_collection(
        &mut result,
        &master.tables,
        &checked.tables,
        |l, r| l.is_same_db_name(r),
        compare_table,
    )?;
    compare_collection(
        &mut result,
        &master.views,
        &checked.views,
        |l, r| l.is_same_db_name(r),
        compare_view,
    )?;

    debug!(verdict = %result.compare_result_type(), "catalog comparison finished");
    Ok(result)
}
