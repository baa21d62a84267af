//! Populate a [`Catalog`] from raw introspection rows
//!
//! Two row shapes feed the builder: [`ParamRow`] (one per column, parameter
//! or return value, as found in `syscolumns`) and [`TextRow`] (one script
//! fragment, as found in `syscomments`). Rows may arrive in any order;
//! text fragments are buffered and attached in [`CatalogBuilder::build`].

mod object_type_code;

pub use object_type_code::ObjectTypeCode;

use tracing::{debug, warn};

use crate::error::SchemaError;
use crate::model::{
    Catalog, Column, DataType, Function, Parameter, RoutineParameter, SchemaObject,
    SchemaQualified, SqlType, StoredProcedure, Table, TableValuedFunction, Trigger, View,
};
use crate::util;

/// One column, parameter or return value of a database object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamRow {
    pub schema_name: String,
    pub object_name: String,
    pub object_type: ObjectTypeCode,
    pub object_id: i64,
    pub param_name: String,
    /// Vendor type name, e.g. `nvarchar`
    pub type_name: String,
    pub length: i32,
    pub precision: i32,
    pub scale: i32,
    pub is_nullable: bool,
    pub order_id: i32,
    pub collation: Option<String>,
    pub default_value: Option<String>,
}

impl ParamRow {
    pub fn new(
        schema_name: impl Into<String>,
        object_name: impl Into<String>,
        object_type: ObjectTypeCode,
        param_name: impl Into<String>,
        type_name: impl Into<String>,
        order_id: i32,
    ) -> Self {
        Self {
            schema_name: schema_name.into(),
            object_name: object_name.into(),
            object_type,
            object_id: 0,
            param_name: param_name.into(),
            type_name: type_name.into(),
            length: 0,
            precision: 0,
            scale: 0,
            is_nullable: true,
            order_id,
            collation: None,
            default_value: None,
        }
    }

    fn data_type(&self) -> Result<DataType, SchemaError> {
        Ok(DataType::new(
            SqlType::from_type_name(&self.type_name)?,
            self.length,
            self.precision,
            self.scale,
            self.is_nullable,
        ))
    }

    fn parameter(&self) -> Result<Parameter, SchemaError> {
        Ok(Parameter::new(
            self.param_name.clone(),
            self.data_type()?,
            self.order_id,
        ))
    }

    fn column(&self) -> Result<Column, SchemaError> {
        let column = Column::new(
            self.param_name.clone(),
            self.data_type()?,
            self.order_id,
            self.collation.clone().unwrap_or_default(),
        );
        Ok(match &self.default_value {
            Some(default_value) => column.with_default(default_value.clone()),
            None => column,
        })
    }
}

/// One script fragment of a database object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRow {
    pub schema_name: String,
    pub object_name: String,
    pub object_type: ObjectTypeCode,
    pub object_id: i64,
    /// Owning table of a trigger
    pub parent_name: Option<String>,
    pub order_id: i32,
    pub text: String,
}

impl TextRow {
    pub fn new(
        schema_name: impl Into<String>,
        object_name: impl Into<String>,
        object_type: ObjectTypeCode,
        order_id: i32,
        text: impl Into<String>,
    ) -> Self {
        Self {
            schema_name: schema_name.into(),
            object_name: object_name.into(),
            object_type,
            object_id: 0,
            parent_name: None,
            order_id,
            text: text.into(),
        }
    }

    pub fn with_parent(mut self, parent_name: impl Into<String>) -> Self {
        self.parent_name = Some(parent_name.into());
        self
    }

    fn full_name(&self) -> String {
        format!("[{}].[{}]", self.schema_name, self.object_name)
    }
}

/// Text fragments of one object, in arrival order
struct TextGroup {
    first: TextRow,
    fragments: Vec<(i32, String)>,
}

impl TextGroup {
    fn accepts(&self, row: &TextRow) -> bool {
        self.first.object_type == row.object_type
            && util::is_same_db_name(
                &self.first.schema_name,
                &self.first.object_name,
                &row.schema_name,
                &row.object_name,
            )
    }

    /// Fragments joined in order id order; a repeated order id keeps the
    /// first fragment
    fn concatenate(&mut self) -> String {
        self.fragments.sort_by_key(|(order_id, _)| *order_id);
        let mut text = String::new();
        let mut last = None;
        for (order_id, fragment) in &self.fragments {
            if last == Some(*order_id) {
                warn!(
                    object = %self.first.full_name(),
                    order_id,
                    "duplicate text fragment ignored"
                );
                continue;
            }
            last = Some(*order_id);
            text.push_str(fragment);
        }
        text
    }
}

/// Find the entity with the given schema-qualified name, creating it first
/// if absent
fn find_or_insert<'v, T: SchemaQualified>(
    items: &'v mut Vec<T>,
    schema_name: &str,
    name: &str,
    make: impl FnOnce() -> T,
) -> &'v mut T {
    let index = items
        .iter()
        .position(|i| util::is_same_db_name(i.schema_name(), i.name(), schema_name, name));
    let index = match index {
        Some(index) => index,
        None => {
            items.push(make());
            items.len() - 1
        }
    };
    &mut items[index]
}

/// Incrementally assembles a catalog from introspection rows
pub struct CatalogBuilder {
    catalog: Catalog,
    texts: Vec<TextGroup>,
}

impl CatalogBuilder {
    pub fn new(server: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            catalog: Catalog::new(database, server),
            texts: Vec::new(),
        }
    }

    /// Attach a column, parameter or return value to its owning object,
    /// creating the object on first sight
    pub fn add_param_row(&mut self, row: ParamRow) -> Result<(), SchemaError> {
        let schema = row.schema_name.as_str();
        let name = row.object_name.as_str();

        match row.object_type {
            ObjectTypeCode::U => {
                let column = row.column()?;
                find_or_insert(&mut self.catalog.tables, schema, name, || {
                    Table::new(name, schema)
                })
                .add_column(column);
            }
            ObjectTypeCode::P => {
                let parameter = row.parameter()?;
                find_or_insert(&mut self.catalog.stored_procedures, schema, name, || {
                    StoredProcedure::new(name, row.object_id, schema)
                })
                .add_parameter(parameter);
            }
            ObjectTypeCode::FN => {
                let parameter = row.parameter()?;
                let function = find_or_insert(&mut self.catalog.functions, schema, name, || {
                    Function::new(name, row.object_id, schema)
                });
                // scalar results come back unnamed at position 0
                if row.param_name.is_empty() || row.order_id == 0 {
                    function.add_return_value(parameter);
                } else {
                    function.add_parameter(parameter);
                }
            }
            ObjectTypeCode::IF | ObjectTypeCode::TF => {
                let is_parameter = row.param_name.starts_with('@');
                let entry = if is_parameter {
                    RoutineParameter::Parameter(row.parameter()?)
                } else {
                    RoutineParameter::Column(row.column()?)
                };
                let tvf = find_or_insert(
                    &mut self.catalog.table_valued_functions,
                    schema,
                    name,
                    || TableValuedFunction::new(name, row.object_id, schema),
                );
                if is_parameter {
                    tvf.function_mut().add_parameter(entry);
                } else {
                    tvf.function_mut().add_return_value(entry);
                }
            }
            ObjectTypeCode::V => {
                find_or_insert(&mut self.catalog.views, schema, name, || {
                    View::new(name, schema, "")
                });
            }
            other => {
                return Err(SchemaError::VariantNotImplemented {
                    code: other.to_string(),
                    context: "parameter rows".to_string(),
                })
            }
        }
        Ok(())
    }

    /// Buffer a script fragment; fragments are joined when building
    pub fn add_text_row(&mut self, row: TextRow) -> Result<(), SchemaError> {
        match row.object_type {
            ObjectTypeCode::P
            | ObjectTypeCode::FN
            | ObjectTypeCode::IF
            | ObjectTypeCode::TF
            | ObjectTypeCode::V
            | ObjectTypeCode::TR => {}
            other => {
                return Err(SchemaError::VariantNotImplemented {
                    code: other.to_string(),
                    context: "text rows".to_string(),
                })
            }
        }

        let fragment = (row.order_id, row.text.clone());
        match self.texts.iter_mut().find(|g| g.accepts(&row)) {
            Some(group) => group.fragments.push(fragment),
            None => self.texts.push(TextGroup {
                first: row,
                fragments: vec![fragment],
            }),
        }
        Ok(())
    }

    /// Attach buffered script text and return the finished catalog
    pub fn build(mut self) -> Result<Catalog, SchemaError> {
        debug!(
            catalog = %self.catalog.full_name(),
            text_objects = self.texts.len(),
            "building catalog"
        );

        for mut group in std::mem::take(&mut self.texts) {
            let text = group.concatenate();
            self.attach_text(&group.first, text)?;
        }

        debug!(objects = self.catalog.object_count(), "catalog built");
        Ok(self.catalog)
    }

    fn attach_text(&mut self, row: &TextRow, text: String) -> Result<(), SchemaError> {
        let schema = row.schema_name.as_str();
        let name = row.object_name.as_str();

        match row.object_type {
            ObjectTypeCode::P => {
                find_or_insert(&mut self.catalog.stored_procedures, schema, name, || {
                    StoredProcedure::new(name, row.object_id, schema)
                })
                .set_script_text(text);
            }
            ObjectTypeCode::FN => {
                find_or_insert(&mut self.catalog.functions, schema, name, || {
                    Function::new(name, row.object_id, schema)
                })
                .set_script_text(text);
            }
            ObjectTypeCode::IF | ObjectTypeCode::TF => {
                find_or_insert(
                    &mut self.catalog.table_valued_functions,
                    schema,
                    name,
                    || TableValuedFunction::new(name, row.object_id, schema),
                )
                .function_mut()
                .set_script_text(text);
            }
            ObjectTypeCode::V => {
                find_or_insert(&mut self.catalog.views, schema, name, || {
                    View::new(name, schema, "")
                })
                .text = text;
            }
            ObjectTypeCode::TR => {
                let missing_parent = |parent: &str| SchemaError::MissingParentObject {
                    object: row.full_name(),
                    parent: parent.to_string(),
                };
                let parent = row
                    .parent_name
                    .as_deref()
                    .ok_or_else(|| missing_parent("(none)"))?;
                let table = self
                    .catalog
                    .tables
                    .iter_mut()
                    .find(|t| util::is_same_db_name(t.schema_name(), t.name(), schema, parent))
                    .ok_or_else(|| missing_parent(&format!("[{}].[{}]", schema, parent)))?;

                match table
                    .triggers
                    .iter_mut()
                    .find(|t| util::eq_ignore_case(t.name(), name))
                {
                    Some(trigger) => trigger.set_script_text(text),
                    None => table
                        .add_trigger(Trigger::new(name, row.object_id, schema).with_script_text(text)),
                }
            }
            other => {
                return Err(SchemaError::VariantNotImplemented {
                    code: other.to_string(),
                    context: "text rows".to_string(),
                })
            }
        }
        Ok(())
    }
}
