//! Field lists of every schema entity
//!
//! Each entity writes its own version byte first, then its fields in a fixed
//! order. Embedded kinds (a column's parameter, a procedure's trigger body)
//! are written inline, each with their own version byte.

use super::{DeSerialize, ObjectReadWriter};
use crate::error::SchemaError;
use crate::model::{
    Catalog, Column, DataType, Function, Parameter, RoutineParameter, SqlType, StoredProcedure,
    Table, TableValuedFunction, Trigger, View,
};

const CATALOG_VERSION: u8 = 0;
const TABLE_VERSION: u8 = 0;
const COLUMN_VERSION: u8 = 0;
const PARAMETER_VERSION: u8 = 0;
const DATA_TYPE_VERSION: u8 = 0;
const TRIGGER_VERSION: u8 = 0;
const PROCEDURE_VERSION: u8 = 0;
const FUNCTION_VERSION: u8 = 0;
const TABLE_VALUED_FUNCTION_VERSION: u8 = 0;
const VIEW_VERSION: u8 = 0;

/// Resolver for parameter and return value lists
pub fn resolve_routine_parameter(discriminator: &str) -> Option<RoutineParameter> {
    match discriminator {
        "Parameter" => Some(RoutineParameter::Parameter(Parameter::default())),
        "Column" => Some(RoutineParameter::Column(Column::default())),
        _ => None,
    }
}

impl DeSerialize for Catalog {
    fn de_serialize<RW: ObjectReadWriter>(&mut self, rw: &mut RW) -> Result<(), SchemaError> {
        rw.read_write_version(CATALOG_VERSION)?;
        rw.read_write_string("Name", &mut self.name)?;
        rw.read_write_string("Server", &mut self.server)?;
        rw.read_write_list("StoredProcedures", &mut self.stored_procedures)?;
        rw.read_write_list("Functions", &mut self.functions)?;
        rw.read_write_list("TableValuedFunctions", &mut self.table_valued_functions)?;
        rw.read_write_list("Tables", &mut self.tables)?;
        rw.read_write_list("Views", &mut self.views)?;
        Ok(())
    }
}

impl DeSerialize for Table {
    fn de_serialize<RW: ObjectReadWriter>(&mut self, rw: &mut RW) -> Result<(), SchemaError> {
        rw.read_write_version(TABLE_VERSION)?;
        rw.read_write_string("Name", &mut self.name)?;
        rw.read_write_string("SchemaName", &mut self.schema_name)?;
        rw.read_write_list("Columns", &mut self.columns)?;
        rw.read_write_list("Triggers", &mut self.triggers)?;
        Ok(())
    }
}

impl DeSerialize for Parameter {
    fn de_serialize<RW: ObjectReadWriter>(&mut self, rw: &mut RW) -> Result<(), SchemaError> {
        rw.read_write_version(PARAMETER_VERSION)?;
        rw.read_write_string("Name", &mut self.name)?;
        rw.read_write_object("DataType", &mut self.data_type)?;
        rw.read_write_i32("OrderId", &mut self.order_id)?;
        rw.read_write_i32("FakeOrderId", &mut self.fake_order_id)?;
        Ok(())
    }
}

impl DeSerialize for Column {
    fn de_serialize<RW: ObjectReadWriter>(&mut self, rw: &mut RW) -> Result<(), SchemaError> {
        rw.read_write_version(COLUMN_VERSION)?;
        self.parameter.de_serialize(rw)?;
        rw.read_write_string_opt("DefaultValue", &mut self.default_value)?;
        rw.read_write_string("Collation", &mut self.collation)?;
        Ok(())
    }
}

impl DeSerialize for RoutineParameter {
    fn de_serialize<RW: ObjectReadWriter>(&mut self, rw: &mut RW) -> Result<(), SchemaError> {
        match self {
            RoutineParameter::Parameter(p) => p.de_serialize(rw),
            RoutineParameter::Column(c) => c.de_serialize(rw),
        }
    }
}

impl DeSerialize for DataType {
    fn de_serialize<RW: ObjectReadWriter>(&mut self, rw: &mut RW) -> Result<(), SchemaError> {
        rw.read_write_version(DATA_TYPE_VERSION)?;
        let mut code = self.sql_type.code();
        rw.read_write_i32("SqlType", &mut code)?;
        if rw.is_reading() {
            self.sql_type = SqlType::from_code(code).ok_or_else(|| {
                SchemaError::serialization(format!("unknown SqlType code {}", code))
            })?;
        }
        rw.read_write_i32("Length", &mut self.length)?;
        rw.read_write_i32("Precision", &mut self.precision)?;
        rw.read_write_i32("Scale", &mut self.scale)?;
        rw.read_write_bool("AllowNull", &mut self.allow_null)?;
        Ok(())
    }
}

impl DeSerialize for Trigger {
    fn de_serialize<RW: ObjectReadWriter>(&mut self, rw: &mut RW) -> Result<(), SchemaError> {
        rw.read_write_version(TRIGGER_VERSION)?;
        rw.read_write_string("Name", &mut self.name)?;
        rw.read_write_i64("ObjectId", &mut self.object_id)?;
        rw.read_write_string("SchemaName", &mut self.schema_name)?;
        rw.read_write_string("ScriptText", &mut self.script_text)?;
        Ok(())
    }
}

impl DeSerialize for StoredProcedure {
    fn de_serialize<RW: ObjectReadWriter>(&mut self, rw: &mut RW) -> Result<(), SchemaError> {
        rw.read_write_version(PROCEDURE_VERSION)?;
        self.body.de_serialize(rw)?;
        rw.read_write_poly_list(
            "Parameters",
            &mut self.parameters,
            RoutineParameter::discriminator,
            resolve_routine_parameter,
        )?;
        Ok(())
    }
}

impl DeSerialize for Function {
    fn de_serialize<RW: ObjectReadWriter>(&mut self, rw: &mut RW) -> Result<(), SchemaError> {
        rw.read_write_version(FUNCTION_VERSION)?;
        self.procedure.de_serialize(rw)?;
        rw.read_write_poly_list(
            "ReturnValues",
            &mut self.return_values,
            RoutineParameter::discriminator,
            resolve_routine_parameter,
        )?;
        Ok(())
    }
}

impl DeSerialize for TableValuedFunction {
    fn de_serialize<RW: ObjectReadWriter>(&mut self, rw: &mut RW) -> Result<(), SchemaError> {
        rw.read_write_version(TABLE_VALUED_FUNCTION_VERSION)?;
        self.function.de_serialize(rw)
    }
}

impl DeSerialize for View {
    fn de_serialize<RW: ObjectReadWriter>(&mut self, rw: &mut RW) -> Result<(), SchemaError> {
        rw.read_write_version(VIEW_VERSION)?;
        rw.read_write_string("Name", &mut self.name)?;
        rw.read_write_string("SchemaName", &mut self.schema_name)?;
        rw.read_write_string("Text", &mut self.text)?;
        Ok(())
    }
}
