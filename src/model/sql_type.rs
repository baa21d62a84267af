//! Vendor-neutral SQL data types

use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::error::SchemaError;

/// SQL data type. Discriminants are the stable codes written by the serializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SqlType {
    #[default]
    BigInt = 0,
    Binary = 1,
    Bit = 2,
    Char = 3,
    DateTime = 4,
    Decimal = 5,
    Float = 6,
    Image = 7,
    Int = 8,
    Money = 9,
    NChar = 10,
    NText = 11,
    NVarChar = 12,
    Real = 13,
    UniqueIdentifier = 14,
    SmallDateTime = 15,
    SmallInt = 16,
    SmallMoney = 17,
    Text = 18,
    Timestamp = 19,
    TinyInt = 20,
    VarBinary = 21,
    VarChar = 22,
    Variant = 23,
    Xml = 25,
    Udt = 29,
    Structured = 30,
    Date = 31,
    Time = 32,
    DateTime2 = 33,
    DateTimeOffset = 34,
}

const ALL_TYPES: &[SqlType] = &[
    SqlType::BigInt,
    SqlType::Binary,
    SqlType::Bit,
    SqlType::Char,
    SqlType::DateTime,
    SqlType::Decimal,
    SqlType::Float,
    SqlType::Image,
    SqlType::Int,
    SqlType::Money,
    SqlType::NChar,
    SqlType::NText,
    SqlType::NVarChar,
    SqlType::Real,
    SqlType::UniqueIdentifier,
    SqlType::SmallDateTime,
    SqlType::SmallInt,
    SqlType::SmallMoney,
    SqlType::Text,
    SqlType::Timestamp,
    SqlType::TinyInt,
    SqlType::VarBinary,
    SqlType::VarChar,
    SqlType::Variant,
    SqlType::Xml,
    SqlType::Udt,
    SqlType::Structured,
    SqlType::Date,
    SqlType::Time,
    SqlType::DateTime2,
    SqlType::DateTimeOffset,
];

/// Catalog type names (lowercase) reported by SQL Server and PostgreSQL
static TYPE_NAMES: Lazy<HashMap<&'static str, SqlType>> = Lazy::new(|| {
    HashMap::from([
        ("bigint", SqlType::BigInt),
        ("int8", SqlType::BigInt),
        ("binary", SqlType::Binary),
        ("bytea", SqlType::VarBinary),
        ("bit", SqlType::Bit),
        ("boolean", SqlType::Bit),
        ("bool", SqlType::Bit),
        ("char", SqlType::Char),
        ("bpchar", SqlType::Char),
        ("datetime", SqlType::DateTime),
        ("decimal", SqlType::Decimal),
        ("numeric", SqlType::Decimal),
        ("float", SqlType::Float),
        ("float8", SqlType::Float),
        ("double precision", SqlType::Float),
        ("image", SqlType::Image),
        ("int", SqlType::Int),
        ("int4", SqlType::Int),
        ("integer", SqlType::Int),
        ("money", SqlType::Money),
        ("nchar", SqlType::NChar),
        ("ntext", SqlType::NText),
        ("nvarchar", SqlType::NVarChar),
        ("sysname", SqlType::NVarChar),
        ("real", SqlType::Real),
        ("float4", SqlType::Real),
        ("uniqueidentifier", SqlType::UniqueIdentifier),
        ("uuid", SqlType::UniqueIdentifier),
        ("smalldatetime", SqlType::SmallDateTime),
        ("smallint", SqlType::SmallInt),
        ("int2", SqlType::SmallInt),
        ("smallmoney", SqlType::SmallMoney),
        ("text", SqlType::Text),
        ("timestamp", SqlType::Timestamp),
        ("rowversion", SqlType::Timestamp),
        ("tinyint", SqlType::TinyInt),
        ("varbinary", SqlType::VarBinary),
        ("varchar", SqlType::VarChar),
        ("character varying", SqlType::VarChar),
        ("sql_variant", SqlType::Variant),
        ("xml", SqlType::Xml),
        ("geography", SqlType::Udt),
        ("geometry", SqlType::Udt),
        ("hierarchyid", SqlType::Udt),
        ("date", SqlType::Date),
        ("time", SqlType::Time),
        ("datetime2", SqlType::DateTime2),
        ("datetimeoffset", SqlType::DateTimeOffset),
        ("timestamptz", SqlType::DateTimeOffset),
    ])
});

impl SqlType {
    /// Stable numeric code used by the serializer
    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn from_code(code: i32) -> Option<SqlType> {
        ALL_TYPES.iter().copied().find(|t| t.code() == code)
    }

    /// Resolve a catalog type name (`nvarchar`, `int4`, ...), case-insensitive
    pub fn from_type_name(type_name: &str) -> Result<SqlType, SchemaError> {
        let key = type_name.trim().to_ascii_lowercase();
        TYPE_NAMES
            .get(key.as_str())
            .copied()
            .ok_or_else(|| SchemaError::UnknownSqlType {
                type_name: type_name.to_string(),
            })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SqlType::BigInt => "BigInt",
            SqlType::Binary => "Binary",
            SqlType::Bit => "Bit",
            SqlType::Char => "Char",
            SqlType::DateTime => "DateTime",
            SqlType::Decimal => "Decimal",
            SqlType::Float => "Float",
            SqlType::Image => "Image",
            SqlType::Int => "Int",
            SqlType::Money => "Money",
            SqlType::NChar => "NChar",
            SqlType::NText => "NText",
            SqlType::NVarChar => "NVarChar",
            SqlType::Real => "Real",
            SqlType::UniqueIdentifier => "UniqueIdentifier",
            SqlType::SmallDateTime => "SmallDateTime",
            SqlType::SmallInt => "SmallInt",
            SqlType::SmallMoney => "SmallMoney",
            SqlType::Text => "Text",
            SqlType::Timestamp => "Timestamp",
            SqlType::TinyInt => "TinyInt",
            SqlType::VarBinary => "VarBinary",
            SqlType::VarChar => "VarChar",
            SqlType::Variant => "Variant",
            SqlType::Xml => "Xml",
            SqlType::Udt => "Udt",
            SqlType::Structured => "Structured",
            SqlType::Date => "Date",
            SqlType::Time => "Time",
            SqlType::DateTime2 => "DateTime2",
            SqlType::DateTimeOffset => "DateTimeOffset",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
