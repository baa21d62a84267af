//! Catalog: full schema snapshot of one database

use super::{
    DbObjectType, Function, SchemaObject, StoredProcedure, Table, TableValuedFunction, View,
    DUMMY_STRING,
};

/// Complete, vendor-neutral snapshot of one database
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub(crate) name: String,
    pub(crate) server: String,
    pub stored_procedures: Vec<StoredProcedure>,
    pub functions: Vec<Function>,
    pub table_valued_functions: Vec<TableValuedFunction>,
    pub tables: Vec<Table>,
    pub views: Vec<View>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(DUMMY_STRING, DUMMY_STRING)
    }
}

impl Catalog {
    pub fn new(name: impl Into<String>, server: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            server: server.into(),
            stored_procedures: Vec::new(),
            functions: Vec::new(),
            table_valued_functions: Vec::new(),
            tables: Vec::new(),
            views: Vec::new(),
        }
    }

    /// Server hosting the database
    pub fn server(&self) -> &str {
        &self.server
    }

    /// Number of top-level objects across all collections
    pub fn object_count(&self) -> usize {
        self.stored_procedures.len()
            + self.functions.len()
            + self.table_valued_functions.len()
            + self.tables.len()
            + self.views.len()
    }
}

impl SchemaObject for Catalog {
    fn name(&self) -> &str {
        &self.name
    }

    fn object_type(&self) -> DbObjectType {
        DbObjectType::DatabaseCatalog
    }

    fn full_name(&self) -> String {
        format!("[{}] {}", self.server, self.name)
    }
}
