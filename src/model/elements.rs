//! Schema entity types
//!
//! Richer routine kinds embed the simpler kind by value: a stored procedure
//! owns a [`Trigger`] body, a function owns a [`StoredProcedure`] and a
//! table-valued function wraps a [`Function`]. Columns embed a [`Parameter`].

use super::{DbObjectType, SchemaObject, SchemaQualified, SqlType};

/// Placeholder written into string fields of entities created for
/// deserialization. Always overwritten by the reader.
pub const DUMMY_STRING: &str = "#DUMMY#";

/// Data type of a column or parameter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DataType {
    pub sql_type: SqlType,
    pub length: i32,
    pub precision: i32,
    pub scale: i32,
    pub allow_null: bool,
}

impl DataType {
    pub fn new(sql_type: SqlType, length: i32, precision: i32, scale: i32, allow_null: bool) -> Self {
        Self {
            sql_type,
            length,
            precision,
            scale,
            allow_null,
        }
    }
}

impl SchemaObject for DataType {
    /// Derived from the SQL type, there is nothing to set
    fn name(&self) -> &str {
        self.sql_type.as_str()
    }

    fn object_type(&self) -> DbObjectType {
        DbObjectType::DatabaseType
    }

    fn full_name(&self) -> String {
        self.sql_type.as_str().to_string()
    }
}

/// Routine parameter, return value or (embedded in [`Column`]) table column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub(crate) name: String,
    pub(crate) data_type: DataType,
    pub(crate) order_id: i32,
    pub(crate) fake_order_id: i32,
}

impl Default for Parameter {
    fn default() -> Self {
        Self {
            name: DUMMY_STRING.to_string(),
            data_type: DataType::default(),
            order_id: 0,
            fake_order_id: 0,
        }
    }
}

impl Parameter {
    pub fn new(name: impl Into<String>, data_type: DataType, order_id: i32) -> Self {
        Self {
            name: name.into(),
            data_type,
            order_id,
            fake_order_id: 0,
        }
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Raw storage order reported by the catalog
    pub fn order_id(&self) -> i32 {
        self.order_id
    }

    /// Dense 0-based position derived from `order_id`
    pub fn fake_order_id(&self) -> i32 {
        self.fake_order_id
    }
}

impl SchemaObject for Parameter {
    fn name(&self) -> &str {
        &self.name
    }

    fn object_type(&self) -> DbObjectType {
        DbObjectType::Parameter
    }

    fn full_name(&self) -> String {
        self.name.clone()
    }
}

/// Table column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub(crate) parameter: Parameter,
    pub default_value: Option<String>,
    pub collation: String,
}

impl Default for Column {
    fn default() -> Self {
        Self {
            parameter: Parameter::default(),
            default_value: None,
            collation: DUMMY_STRING.to_string(),
        }
    }
}

impl Column {
    pub fn new(
        name: impl Into<String>,
        data_type: DataType,
        order_id: i32,
        collation: impl Into<String>,
    ) -> Self {
        Self {
            parameter: Parameter::new(name, data_type, order_id),
            default_value: None,
            collation: collation.into(),
        }
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Parameter part of the column (name, type, ordering)
    pub fn parameter(&self) -> &Parameter {
        &self.parameter
    }

    pub fn data_type(&self) -> &DataType {
        &self.parameter.data_type
    }

    pub fn order_id(&self) -> i32 {
        self.parameter.order_id
    }

    pub fn fake_order_id(&self) -> i32 {
        self.parameter.fake_order_id
    }
}

impl SchemaObject for Column {
    fn name(&self) -> &str {
        &self.parameter.name
    }

    fn object_type(&self) -> DbObjectType {
        DbObjectType::Parameter
    }

    fn full_name(&self) -> String {
        self.parameter.name.clone()
    }
}

/// Element of a routine parameter or return value list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutineParameter {
    Parameter(Parameter),
    /// Result column of a table-valued function
    Column(Column),
}

impl RoutineParameter {
    pub fn parameter(&self) -> &Parameter {
        match self {
            RoutineParameter::Parameter(p) => p,
            RoutineParameter::Column(c) => &c.parameter,
        }
    }

    fn parameter_mut(&mut self) -> &mut Parameter {
        match self {
            RoutineParameter::Parameter(p) => p,
            RoutineParameter::Column(c) => &mut c.parameter,
        }
    }

    pub fn name(&self) -> &str {
        &self.parameter().name
    }

    /// Type discriminator recorded in front of each serialized list element
    pub fn discriminator(&self) -> &'static str {
        match self {
            RoutineParameter::Parameter(_) => "Parameter",
            RoutineParameter::Column(_) => "Column",
        }
    }
}

impl From<Parameter> for RoutineParameter {
    fn from(p: Parameter) -> Self {
        RoutineParameter::Parameter(p)
    }
}

impl From<Column> for RoutineParameter {
    fn from(c: Column) -> Self {
        RoutineParameter::Column(c)
    }
}

/// Anything positioned by a raw order id
pub(crate) trait Ordered {
    fn order_key(&self) -> i32;
    fn set_fake_order_id(&mut self, fake_order_id: i32);
}

impl Ordered for Column {
    fn order_key(&self) -> i32 {
        self.parameter.order_id
    }

    fn set_fake_order_id(&mut self, fake_order_id: i32) {
        self.parameter.fake_order_id = fake_order_id;
    }
}

impl Ordered for RoutineParameter {
    fn order_key(&self) -> i32 {
        self.parameter().order_id
    }

    fn set_fake_order_id(&mut self, fake_order_id: i32) {
        self.parameter_mut().fake_order_id = fake_order_id;
    }
}

/// Stable sort by order id, then assign a dense 0-based fake order id
pub(crate) fn reindex<T: Ordered>(items: &mut [T]) {
    items.sort_by_key(|item| item.order_key());
    for (fake_order_id, item) in items.iter_mut().enumerate() {
        item.set_fake_order_id(fake_order_id as i32);
    }
}

/// DML trigger; also the body shared by every routine kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trigger {
    pub(crate) name: String,
    pub(crate) schema_name: String,
    pub(crate) object_id: i64,
    pub(crate) script_text: String,
}

impl Default for Trigger {
    fn default() -> Self {
        Self {
            name: DUMMY_STRING.to_string(),
            schema_name: DUMMY_STRING.to_string(),
            object_id: 0,
            script_text: String::new(),
        }
    }
}

impl Trigger {
    pub fn new(name: impl Into<String>, object_id: i64, schema_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema_name: schema_name.into(),
            object_id,
            script_text: String::new(),
        }
    }

    pub fn object_id(&self) -> i64 {
        self.object_id
    }

    pub fn script_text(&self) -> &str {
        &self.script_text
    }

    pub fn set_script_text(&mut self, script_text: impl Into<String>) {
        self.script_text = script_text.into();
    }

    pub fn with_script_text(mut self, script_text: impl Into<String>) -> Self {
        self.script_text = script_text.into();
        self
    }
}

impl SchemaObject for Trigger {
    fn name(&self) -> &str {
        &self.name
    }

    fn object_type(&self) -> DbObjectType {
        DbObjectType::Trigger
    }

    fn full_name(&self) -> String {
        format!("[{}].[{}]", self.schema_name, self.name)
    }
}

impl SchemaQualified for Trigger {
    fn schema_name(&self) -> &str {
        &self.schema_name
    }
}

/// Stored procedure: script body plus parameters
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoredProcedure {
    pub(crate) body: Trigger,
    pub(crate) parameters: Vec<RoutineParameter>,
}

impl StoredProcedure {
    pub fn new(name: impl Into<String>, object_id: i64, schema_name: impl Into<String>) -> Self {
        Self {
            body: Trigger::new(name, object_id, schema_name),
            parameters: Vec::new(),
        }
    }

    /// Name, object id and script text
    pub fn trigger(&self) -> &Trigger {
        &self.body
    }

    pub fn object_id(&self) -> i64 {
        self.body.object_id
    }

    pub fn script_text(&self) -> &str {
        &self.body.script_text
    }

    pub fn set_script_text(&mut self, script_text: impl Into<String>) {
        self.body.set_script_text(script_text);
    }

    pub fn parameters(&self) -> &[RoutineParameter] {
        &self.parameters
    }

    /// Append a parameter and re-index the list by order id
    pub fn add_parameter(&mut self, parameter: impl Into<RoutineParameter>) {
        self.parameters.push(parameter.into());
        reindex(&mut self.parameters);
    }
}

impl SchemaObject for StoredProcedure {
    fn name(&self) -> &str {
        &self.body.name
    }

    fn object_type(&self) -> DbObjectType {
        DbObjectType::StoredProcedure
    }

    fn full_name(&self) -> String {
        self.body.full_name()
    }
}

impl SchemaQualified for StoredProcedure {
    fn schema_name(&self) -> &str {
        &self.body.schema_name
    }
}

/// Scalar function: a procedure with return values
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Function {
    pub(crate) procedure: StoredProcedure,
    pub(crate) return_values: Vec<RoutineParameter>,
}

impl Function {
    pub fn new(name: impl Into<String>, object_id: i64, schema_name: impl Into<String>) -> Self {
        Self {
            procedure: StoredProcedure::new(name, object_id, schema_name),
            return_values: Vec::new(),
        }
    }

    /// Procedure part (body and parameters)
    pub fn procedure(&self) -> &StoredProcedure {
        &self.procedure
    }

    pub fn script_text(&self) -> &str {
        self.procedure.script_text()
    }

    pub fn set_script_text(&mut self, script_text: impl Into<String>) {
        self.procedure.set_script_text(script_text);
    }

    pub fn parameters(&self) -> &[RoutineParameter] {
        &self.procedure.parameters
    }

    pub fn add_parameter(&mut self, parameter: impl Into<RoutineParameter>) {
        self.procedure.add_parameter(parameter);
    }

    pub fn return_values(&self) -> &[RoutineParameter] {
        &self.return_values
    }

    /// Append a return value and re-index the list by order id
    pub fn add_return_value(&mut self, return_value: impl Into<RoutineParameter>) {
        self.return_values.push(return_value.into());
        reindex(&mut self.return_values);
    }
}

impl SchemaObject for Function {
    fn name(&self) -> &str {
        self.procedure.name()
    }

    fn object_type(&self) -> DbObjectType {
        DbObjectType::Function
    }

    fn full_name(&self) -> String {
        self.procedure.full_name()
    }
}

impl SchemaQualified for Function {
    fn schema_name(&self) -> &str {
        self.procedure.schema_name()
    }
}

/// Function returning a table
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableValuedFunction {
    pub(crate) function: Function,
}

impl TableValuedFunction {
    pub fn new(name: impl Into<String>, object_id: i64, schema_name: impl Into<String>) -> Self {
        Self {
            function: Function::new(name, object_id, schema_name),
        }
    }

    pub fn function(&self) -> &Function {
        &self.function
    }

    pub fn function_mut(&mut self) -> &mut Function {
        &mut self.function
    }
}

impl SchemaObject for TableValuedFunction {
    fn name(&self) -> &str {
        self.function.name()
    }

    fn object_type(&self) -> DbObjectType {
        DbObjectType::Function
    }

    fn full_name(&self) -> String {
        self.function.full_name()
    }
}

impl SchemaQualified for TableValuedFunction {
    fn schema_name(&self) -> &str {
        self.function.schema_name()
    }
}

/// View
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub(crate) name: String,
    pub(crate) schema_name: String,
    pub text: String,
}

impl Default for View {
    fn default() -> Self {
        Self {
            name: DUMMY_STRING.to_string(),
            schema_name: DUMMY_STRING.to_string(),
            text: DUMMY_STRING.to_string(),
        }
    }
}

impl View {
    pub fn new(
        name: impl Into<String>,
        schema_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            schema_name: schema_name.into(),
            text: text.into(),
        }
    }
}

impl SchemaObject for View {
    fn name(&self) -> &str {
        &self.name
    }

    fn object_type(&self) -> DbObjectType {
        DbObjectType::View
    }

    fn full_name(&self) -> String {
        format!("[{}].[{}]", self.schema_name, self.name)
    }
}

impl SchemaQualified for View {
    fn schema_name(&self) -> &str {
        &self.schema_name
    }
}

/// Table with ordered columns and its triggers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub(crate) name: String,
    pub(crate) schema_name: String,
    pub(crate) columns: Vec<Column>,
    pub triggers: Vec<Trigger>,
}

impl Default for Table {
    fn default() -> Self {
        Self {
            name: DUMMY_STRING.to_string(),
            schema_name: DUMMY_STRING.to_string(),
            columns: Vec::new(),
            triggers: Vec::new(),
        }
    }
}

impl Table {
    pub fn new(name: impl Into<String>, schema_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema_name: schema_name.into(),
            columns: Vec::new(),
            triggers: Vec::new(),
        }
    }

    /// Columns sorted by order id
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Append a column, re-sort by order id and recompute every fake order id
    pub fn add_column(&mut self, column: Column) {
        self.columns.push(column);
        reindex(&mut self.columns);
    }

    pub fn add_trigger(&mut self, trigger: Trigger) {
        self.triggers.push(trigger);
    }
}

impl SchemaObject for Table {
    fn name(&self) -> &str {
        &self.name
    }

    fn object_type(&self) -> DbObjectType {
        DbObjectType::Table
    }

    fn full_name(&self) -> String {
        format!("[{}].[{}]", self.schema_name, self.name)
    }
}

impl SchemaQualified for Table {
    fn schema_name(&self) -> &str {
        &self.schema_name
    }
}
