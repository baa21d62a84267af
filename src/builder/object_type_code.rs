//! SQL Server `sysobjects.type` codes

use std::fmt;
use std::str::FromStr;

use crate::error::SchemaError;

/// Object type code as reported by `sysobjects.type`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectTypeCode {
    /// Aggregate function (CLR)
    AF,
    /// CHECK constraint
    C,
    /// DEFAULT constraint
    D,
    /// FOREIGN KEY constraint
    F,
    /// Scalar function
    FN,
    /// Assembly (CLR) scalar function
    FS,
    /// Assembly (CLR) table-valued function
    FT,
    /// Inline table-valued function
    IF,
    /// Internal table
    IT,
    /// Stored procedure
    P,
    /// Assembly (CLR) stored procedure
    PC,
    /// Plan guide
    PG,
    /// PRIMARY KEY constraint
    PK,
    /// Rule
    R,
    /// Replication filter procedure
    RF,
    /// System base table
    S,
    /// Synonym
    SN,
    /// Service queue
    SQ,
    /// Assembly (CLR) DML trigger
    TA,
    /// Table-valued function
    TF,
    /// SQL DML trigger
    TR,
    /// Table type
    TT,
    /// User table
    U,
    /// UNIQUE constraint
    UQ,
    /// View
    V,
    /// Extended stored procedure
    X,
}

const ALL_CODES: [ObjectTypeCode; 26] = [
    ObjectTypeCode::AF,
    ObjectTypeCode::C,
    ObjectTypeCode::D,
    ObjectTypeCode::F,
    ObjectTypeCode::FN,
    ObjectTypeCode::FS,
    ObjectTypeCode::FT,
    ObjectTypeCode::IF,
    ObjectTypeCode::IT,
    ObjectTypeCode::P,
    ObjectTypeCode::PC,
    ObjectTypeCode::PG,
    ObjectTypeCode::PK,
    ObjectTypeCode::R,
    ObjectTypeCode::RF,
    ObjectTypeCode::S,
    ObjectTypeCode::SN,
    ObjectTypeCode::SQ,
    ObjectTypeCode::TA,
    ObjectTypeCode::TF,
    ObjectTypeCode::TR,
    ObjectTypeCode::TT,
    ObjectTypeCode::U,
    ObjectTypeCode::UQ,
    ObjectTypeCode::V,
    ObjectTypeCode::X,
];

impl ObjectTypeCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectTypeCode::AF => "AF",
            ObjectTypeCode::C => "C",
            ObjectTypeCode::D => "D",
            ObjectTypeCode::F => "F",
            ObjectTypeCode::FN => "FN",
            ObjectTypeCode::FS => "FS",
            ObjectTypeCode::FT => "FT",
            ObjectTypeCode::IF => "IF",
            ObjectTypeCode::IT => "IT",
            ObjectTypeCode::P => "P",
            ObjectTypeCode::PC => "PC",
            ObjectTypeCode::PG => "PG",
            ObjectTypeCode::PK => "PK",
            ObjectTypeCode::R => "R",
            ObjectTypeCode::RF => "RF",
            ObjectTypeCode::S => "S",
            ObjectTypeCode::SN => "SN",
            ObjectTypeCode::SQ => "SQ",
            ObjectTypeCode::TA => "TA",
            ObjectTypeCode::TF => "TF",
            ObjectTypeCode::TR => "TR",
            ObjectTypeCode::TT => "TT",
            ObjectTypeCode::U => "U",
            ObjectTypeCode::UQ => "UQ",
            ObjectTypeCode::V => "V",
            ObjectTypeCode::X => "X",
        }
    }
}

impl FromStr for ObjectTypeCode {
    type Err = SchemaError;

    /// `sysobjects.type` is `char(2)`, so single-letter codes arrive padded
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        ALL_CODES
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(code))
            .ok_or_else(|| SchemaError::UnknownObjectTypeCode {
                code: code.to_string(),
            })
    }
}

impl fmt::Display for ObjectTypeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
