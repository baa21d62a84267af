//! Core types for schema comparison

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::model::{
    Catalog, Column, DataType, DbObjectType, Function, Parameter, RoutineParameter, SchemaObject,
    StoredProcedure, Table, TableValuedFunction, Trigger, View,
};

/// Comparison verdict bitmask. `EQUAL` is the empty set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CompareResultType(u8);

impl CompareResultType {
    pub const EQUAL: CompareResultType = CompareResultType(0);
    /// Present in master, absent in checked
    pub const MISSING: CompareResultType = CompareResultType(1);
    pub const DIFFERENT: CompareResultType = CompareResultType(2);
    /// Present in checked, absent in master
    pub const REDUNDANT: CompareResultType = CompareResultType(4);

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn is_equal(&self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set
    pub fn contains(&self, other: CompareResultType) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for CompareResultType {
    type Output = CompareResultType;

    fn bitor(self, rhs: CompareResultType) -> CompareResultType {
        CompareResultType(self.0 | rhs.0)
    }
}

impl BitOrAssign for CompareResultType {
    fn bitor_assign(&mut self, rhs: CompareResultType) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for CompareResultType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_equal() {
            return f.write_str("EQUAL");
        }
        let labels: Vec<&str> = [
            (CompareResultType::MISSING, "MISSING"),
            (CompareResultType::DIFFERENT, "DIFFERENT"),
            (CompareResultType::REDUNDANT, "REDUNDANT"),
        ]
        .iter()
        .filter(|(flag, _)| self.contains(*flag))
        .map(|(_, label)| *label)
        .collect();
        f.write_str(&labels.join("|"))
    }
}

/// Borrowed reference to any schema entity taking part in a comparison
#[derive(Debug, Clone, Copy)]
pub enum DbObjectRef<'a> {
    Catalog(&'a Catalog),
    Table(&'a Table),
    Column(&'a Column),
    Parameter(&'a Parameter),
    DataType(&'a DataType),
    Trigger(&'a Trigger),
    StoredProcedure(&'a StoredProcedure),
    Function(&'a Function),
    TableValuedFunction(&'a TableValuedFunction),
    View(&'a View),
}

impl<'a> DbObjectRef<'a> {
    fn object(&self) -> &'a dyn SchemaObject {
        match *self {
            DbObjectRef::Catalog(o) => o,
            DbObjectRef::Table(o) => o,
            DbObjectRef::Column(o) => o,
            DbObjectRef::Parameter(o) => o,
            DbObjectRef::DataType(o) => o,
            DbObjectRef::Trigger(o) => o,
            DbObjectRef::StoredProcedure(o) => o,
            DbObjectRef::Function(o) => o,
            DbObjectRef::TableValuedFunction(o) => o,
            DbObjectRef::View(o) => o,
        }
    }

    pub fn name(&self) -> &'a str {
        self.object().name()
    }

    pub fn object_type(&self) -> DbObjectType {
        self.object().object_type()
    }

    pub fn full_name(&self) -> String {
        self.object().full_name()
    }
}

macro_rules! impl_from_ref {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl<'a> From<&'a $ty> for DbObjectRef<'a> {
                fn from(value: &'a $ty) -> Self {
                    DbObjectRef::$variant(value)
                }
            }
        )*
    };
}

impl_from_ref! {
    Catalog => Catalog,
    Table => Table,
    Column => Column,
    Parameter => Parameter,
    DataType => DataType,
    Trigger => Trigger,
    StoredProcedure => StoredProcedure,
    Function => Function,
    TableValuedFunction => TableValuedFunction,
    View => View,
}

impl<'a> From<&'a RoutineParameter> for DbObjectRef<'a> {
    fn from(value: &'a RoutineParameter) -> Self {
        match value {
            RoutineParameter::Parameter(p) => DbObjectRef::Parameter(p),
            RoutineParameter::Column(c) => DbObjectRef::Column(c),
        }
    }
}

/// One node of the comparison tree
#[derive(Debug, Clone)]
pub struct CompareResult<'a> {
    master: Option<DbObjectRef<'a>>,
    checked: Option<DbObjectRef<'a>>,
    own_result_type: CompareResultType,
    inner_results: Vec<CompareResult<'a>>,
}

impl<'a> CompareResult<'a> {
    pub fn new(master: Option<DbObjectRef<'a>>, checked: Option<DbObjectRef<'a>>) -> Self {
        Self {
            master,
            checked,
            own_result_type: CompareResultType::EQUAL,
            inner_results: Vec::new(),
        }
    }

    /// Node for an object present only in master
    pub fn missing(master: DbObjectRef<'a>) -> Self {
        let mut result = Self::new(Some(master), None);
        result.own_result_type = CompareResultType::MISSING;
        result
    }

    /// Node for an object present only in checked
    pub fn redundant(checked: DbObjectRef<'a>) -> Self {
        let mut result = Self::new(None, Some(checked));
        result.own_result_type = CompareResultType::REDUNDANT;
        result
    }

    pub fn master(&self) -> Option<DbObjectRef<'a>> {
        self.master
    }

    pub fn checked(&self) -> Option<DbObjectRef<'a>> {
        self.checked
    }

    /// Verdict of this node alone, ignoring children
    pub fn own_result_type(&self) -> CompareResultType {
        self.own_result_type
    }

    pub fn set_own_result_type(&mut self, result_type: CompareResultType) {
        self.own_result_type = result_type;
    }

    /// Effective verdict: this node's own bits unioned with every
    /// descendant's. Adding children can only add bits.
    pub fn compare_result_type(&self) -> CompareResultType {
        self.inner_results
            .iter()
            .fold(self.own_result_type, |acc, inner| {
                acc | inner.compare_result_type()
            })
    }

    pub fn inner_results(&self) -> &[CompareResult<'a>] {
        &self.inner_results
    }

    pub fn add_inner(&mut self, inner: CompareResult<'a>) {
        self.inner_results.push(inner);
    }

    pub fn has_differences(&self) -> bool {
        !self.compare_result_type().is_equal()
    }

    /// Full name of master, else checked, else `"Unknown"`
    pub fn object_full_name(&self) -> String {
        self.master
            .or(self.checked)
            .map(|o| o.full_name())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    /// Kind of the compared objects; `Error` only if both sides are absent
    pub fn db_object_type(&self) -> DbObjectType {
        self.master
            .or(self.checked)
            .map(|o| o.object_type())
            .unwrap_or(DbObjectType::Error)
    }
}
