//! Dynamic statement builder.
//!
//! Turns table/column names and coerced values into PostgreSQL statements with
//! positional placeholders (`$1`, `$2`, ...). Identifiers are quoted into the
//! statement text; values only ever travel in [`Statement::params`].
//!
//! The only non-identifier text interpolated into a statement is an ORDER BY
//! direction and a LIMIT count, both of which are closed types
//! ([`SortDirection`], [`RowLimit`]) that cannot carry arbitrary input.

mod query;

pub use query::{Operation, QuerySpec};

use std::fmt;
use std::str::FromStr;

use crate::core::identifier::{quote_pg, quote_pg_list};
use crate::core::value::TypedValue;
use crate::error::{CrudError, Result};

/// A statement ready to run: SQL text plus its bound parameters in
/// placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<TypedValue>,
}

impl Statement {
    fn new(sql: String, params: Vec<TypedValue>) -> Self {
        Self { sql, params }
    }
}

/// ORDER BY direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

impl FromStr for SortDirection {
    type Err = CrudError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            other => Err(CrudError::Validation(format!(
                "Invalid sort direction '{}'. Valid values: ASC, DESC",
                other
            ))),
        }
    }
}

/// A LIMIT count. Parsing accepts only ASCII digits, so no sign, whitespace
/// or expression can reach the statement text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RowLimit(u64);

impl RowLimit {
    pub fn new(limit: u64) -> Self {
        Self(limit)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RowLimit {
    type Err = CrudError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || {
            CrudError::Validation(format!(
                "Invalid limit '{}'. Expected a non-negative integer",
                s
            ))
        };

        if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        s.parse::<u64>().map(RowLimit).map_err(|_| invalid())
    }
}

impl From<u64> for RowLimit {
    fn from(v: u64) -> Self {
        RowLimit(v)
    }
}

/// ORDER BY clause for [`build_list`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub column: String,
    pub direction: SortDirection,
}

impl OrderBy {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

/// `INSERT INTO "t" ("c1", "c2", ...) VALUES ($1, $2, ...)`.
///
/// `columns` must be in catalog order and `values` must line up with them.
pub fn build_insert<S: AsRef<str>>(
    table: &str,
    columns: &[S],
    values: Vec<TypedValue>,
) -> Result<Statement> {
    if columns.is_empty() {
        return Err(CrudError::Validation(format!(
            "Table '{}' has no columns to insert into",
            table
        )));
    }
    if columns.len() != values.len() {
        return Err(CrudError::Validation(format!(
            "Got {} values for {} columns of table '{}'",
            values.len(),
            columns.len(),
            table
        )));
    }

    let placeholders = (1..=values.len())
        .map(|i| format!("${}", i))
        .collect::<Vec<_>>()
        .join(", ");

    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_pg(table)?,
        quote_pg_list(columns)?,
        placeholders
    );

    Ok(Statement::new(sql, values))
}

/// `SELECT * FROM "t" WHERE "c" = $1`.
pub fn build_filter_select(
    table: &str,
    filter_column: &str,
    filter_value: TypedValue,
) -> Result<Statement> {
    let sql = format!(
        "SELECT * FROM {} WHERE {} = $1",
        quote_pg(table)?,
        quote_pg(filter_column)?
    );
    Ok(Statement::new(sql, vec![filter_value]))
}

/// `UPDATE "t" SET "u" = $1 WHERE "f" = $2`.
pub fn build_update(
    table: &str,
    update_column: &str,
    update_value: TypedValue,
    filter_column: &str,
    filter_value: TypedValue,
) -> Result<Statement> {
    let sql = format!(
        "UPDATE {} SET {} = $1 WHERE {} = $2",
        quote_pg(table)?,
        quote_pg(update_column)?,
        quote_pg(filter_column)?
    );
    Ok(Statement::new(sql, vec![update_value, filter_value]))
}

/// `DELETE FROM "t" WHERE "c" = $1`.
pub fn build_delete(
    table: &str,
    filter_column: &str,
    filter_value: TypedValue,
) -> Result<Statement> {
    let sql = format!(
        "DELETE FROM {} WHERE {} = $1",
        quote_pg(table)?,
        quote_pg(filter_column)?
    );
    Ok(Statement::new(sql, vec![filter_value]))
}

/// `SELECT * FROM "t" [ORDER BY "c" ASC|DESC] [LIMIT n]`.
pub fn build_list(
    table: &str,
    order: Option<&OrderBy>,
    limit: Option<RowLimit>,
) -> Result<Statement> {
    let mut sql = format!("SELECT * FROM {}", quote_pg(table)?);

    if let Some(order) = order {
        sql.push_str(&format!(
            " ORDER BY {} {}",
            quote_pg(&order.column)?,
            order.direction
        ));
    }

    if let Some(limit) = limit {
        sql.push_str(&format!(" LIMIT {}", limit));
    }

    Ok(Statement::new(sql, Vec::new()))
}
