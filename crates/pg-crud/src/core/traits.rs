//! The database seam.
//!
//! Everything above the driver (catalog inspection, the session shell) talks to
//! the database through [`Database`], so it can run against the PostgreSQL
//! driver in production and an in-memory double in tests.

use async_trait::async_trait;

use crate::error::Result;

use super::value::{CellValue, TypedValue};

/// Result of a query: column names plus rows in server order.
///
/// A row that failed to decode is kept as `Err`, and nothing after it is
/// read, so consumers stop at the first bad row instead of skipping it.
#[derive(Debug, Default)]
pub struct RowSet {
    /// Column names from the statement's result description.
    pub columns: Vec<String>,

    /// Decoded rows, ending early at the first decode error.
    pub rows: Vec<Result<Vec<CellValue>>>,
}

impl RowSet {
    /// Create a row set from fully decoded rows.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            columns,
            rows: rows.into_iter().map(Ok).collect(),
        }
    }
}

/// A connection that can run parameterized statements.
///
/// Implementations run one statement at a time; callers await each call
/// before issuing the next.
#[async_trait]
pub trait Database: Send + Sync {
    /// Run a statement that returns rows.
    async fn query(&self, sql: &str, params: &[TypedValue]) -> Result<RowSet>;

    /// Run a statement and return the number of affected rows.
    async fn execute(&self, sql: &str, params: &[TypedValue]) -> Result<u64>;
}
