//! Value types flowing in and out of dynamically built statements.
//!
//! Two closed enums cover the two directions:
//!
//! - [`TypedValue`]: user input after coercion, bound as a statement parameter.
//! - [`CellValue`]: a value read back from an arbitrary result set, resolved
//!   from the driver's column metadata.

use std::fmt;

/// A coerced input value, ready to be bound as a parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    /// Base-10 integer input (`integer` columns).
    Integer(i64),

    /// Floating point input (`numeric` and `double precision` columns).
    Float(f64),

    /// Everything else, passed through unmodified.
    Text(String),
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypedValue::Integer(v) => write!(f, "{}", v),
            TypedValue::Float(v) => write!(f, "{}", v),
            TypedValue::Text(v) => f.write_str(v),
        }
    }
}

impl From<i64> for TypedValue {
    fn from(v: i64) -> Self {
        TypedValue::Integer(v)
    }
}

impl From<i32> for TypedValue {
    fn from(v: i32) -> Self {
        TypedValue::Integer(i64::from(v))
    }
}

impl From<f64> for TypedValue {
    fn from(v: f64) -> Self {
        TypedValue::Float(v)
    }
}

impl From<String> for TypedValue {
    fn from(v: String) -> Self {
        TypedValue::Text(v)
    }
}

impl From<&str> for TypedValue {
    fn from(v: &str) -> Self {
        TypedValue::Text(v.to_string())
    }
}

/// A single value read from a result set.
///
/// Column types outside this set (numeric, date/time, uuid, json, enums, ...)
/// are carried as [`CellValue::Text`] holding PostgreSQL's textual form.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// SQL NULL.
    Null,

    /// smallint, integer, bigint.
    Integer(i64),

    /// real, double precision.
    Float(f64),

    /// Character data and anything rendered to text by the driver.
    Text(String),

    /// bytea.
    Bytes(Vec<u8>),

    /// boolean.
    Boolean(bool),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => f.write_str("NULL"),
            CellValue::Integer(v) => write!(f, "{}", v),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Text(v) => f.write_str(v),
            // Same form psql uses for bytea output
            CellValue::Bytes(v) => write!(f, "\\x{}", hex::encode(v)),
            CellValue::Boolean(v) => write!(f, "{}", v),
        }
    }
}

impl From<TypedValue> for CellValue {
    fn from(v: TypedValue) -> Self {
        match v {
            TypedValue::Integer(n) => CellValue::Integer(n),
            TypedValue::Float(n) => CellValue::Float(n),
            TypedValue::Text(s) => CellValue::Text(s),
        }
    }
}
