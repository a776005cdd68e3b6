//! Conversion of raw console input into typed parameter values.
//!
//! The policy is keyed on the column's declared type as reported by
//! `information_schema.columns.data_type`:
//!
//! | declared type                   | result                  |
//! |---------------------------------|-------------------------|
//! | `integer`                       | [`TypedValue::Integer`] |
//! | `numeric`, `double precision`   | [`TypedValue::Float`]   |
//! | anything else                   | [`TypedValue::Text`]    |
//!
//! In [`CoercionMode::Lenient`] (the default) unparsable numeric input becomes
//! zero. [`CoercionMode::Strict`] reports a [`CrudError::Coercion`] instead.

use tracing::warn;

use crate::core::value::TypedValue;
use crate::error::{CrudError, Result};

/// How to handle numeric input that does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoercionMode {
    /// Substitute zero and log a warning.
    #[default]
    Lenient,
    /// Reject the input.
    Strict,
}

/// Numeric family a declared type falls into, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumericKind {
    Integer,
    Float,
}

fn numeric_kind(declared_type: &str) -> Option<NumericKind> {
    match declared_type {
        "integer" => Some(NumericKind::Integer),
        "numeric" | "double precision" => Some(NumericKind::Float),
        _ => None,
    }
}

/// Coerce `raw` leniently: unparsable numbers become zero.
pub fn coerce(raw: &str, declared_type: &str) -> TypedValue {
    match numeric_kind(declared_type) {
        Some(NumericKind::Integer) => match raw.parse::<i64>() {
            Ok(v) => TypedValue::Integer(v),
            Err(_) => {
                warn!(
                    "Could not parse {:?} as {}; using 0",
                    raw, declared_type
                );
                TypedValue::Integer(0)
            }
        },
        Some(NumericKind::Float) => match raw.parse::<f64>() {
            Ok(v) => TypedValue::Float(v),
            Err(_) => {
                warn!(
                    "Could not parse {:?} as {}; using 0",
                    raw, declared_type
                );
                TypedValue::Float(0.0)
            }
        },
        None => TypedValue::Text(raw.to_string()),
    }
}

/// Coerce `raw` strictly: unparsable numbers are an error.
pub fn coerce_strict(raw: &str, declared_type: &str) -> Result<TypedValue> {
    match numeric_kind(declared_type) {
        Some(NumericKind::Integer) => raw
            .parse::<i64>()
            .map(TypedValue::Integer)
            .map_err(|_| CrudError::coercion(raw, declared_type)),
        Some(NumericKind::Float) => raw
            .parse::<f64>()
            .map(TypedValue::Float)
            .map_err(|_| CrudError::coercion(raw, declared_type)),
        None => Ok(TypedValue::Text(raw.to_string())),
    }
}

/// Applies the configured [`CoercionMode`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Coercer {
    mode: CoercionMode,
}

impl Coercer {
    pub fn new(mode: CoercionMode) -> Self {
        Self { mode }
    }

    pub fn mode(&self) -> CoercionMode {
        self.mode
    }

    /// Coerce `raw` for a column of `declared_type`.
    ///
    /// Never fails in lenient mode.
    pub fn coerce(&self, raw: &str, declared_type: &str) -> Result<TypedValue> {
        match self.mode {
            CoercionMode::Lenient => Ok(coerce(raw, declared_type)),
            CoercionMode::Strict => coerce_strict(raw, declared_type),
        }
    }
}
