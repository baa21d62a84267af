//! Object kind tags shared by every schema entity

use std::fmt;

/// Kind of a database object. Fixed by the concrete entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DbObjectType {
    #[default]
    Error = 0,
    DatabaseCatalog = 1,
    Table = 2,
    Function = 3,
    StoredProcedure = 4,
    Parameter = 5,
    Trigger = 6,
    DatabaseType = 7,
    View = 8,
}

impl DbObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DbObjectType::Error => "Error",
            DbObjectType::DatabaseCatalog => "DatabaseCatalog",
            DbObjectType::Table => "Table",
            DbObjectType::Function => "Function",
            DbObjectType::StoredProcedure => "StoredProcedure",
            DbObjectType::Parameter => "Parameter",
            DbObjectType::Trigger => "Trigger",
            DbObjectType::DatabaseType => "DatabaseType",
            DbObjectType::View => "View",
        }
    }
}

impl fmt::Display for DbObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common surface of every schema entity
pub trait SchemaObject {
    /// Object name, unqualified
    fn name(&self) -> &str;

    /// Kind tag of the concrete entity
    fn object_type(&self) -> DbObjectType;

    /// Identifier used in reports, e.g. `[dbo].[Users]`
    fn full_name(&self) -> String;
}

/// Entities identified by a (schema, name) pair
pub trait SchemaQualified: SchemaObject {
    fn schema_name(&self) -> &str;

    /// Case-insensitive match on schema and object name
    fn is_same_db_name(&self, other: &Self) -> bool
    where
        Self: Sized,
    {
        crate::util::is_same_db_name(
            self.schema_name(),
            self.name(),
            other.schema_name(),
            other.name(),
        )
    }
}
