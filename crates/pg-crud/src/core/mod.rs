//! Core types shared by the catalog inspector, statement builder, renderer
//! and session shell.
//!
//! - [`identifier`]: identifier validation and quoting
//! - [`schema`]: table and column metadata
//! - [`value`]: input values and result cells
//! - [`traits`]: the [`Database`] seam

pub mod identifier;
pub mod schema;
pub mod traits;
pub mod value;

pub use schema::{ColumnDescriptor, TableName};
pub use traits::{Database, RowSet};
pub use value::{CellValue, TypedValue};
