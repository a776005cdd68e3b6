//! # pg-crud
//!
//! Catalog-driven CRUD against an arbitrary PostgreSQL schema.
//!
//! Nothing about the tables is known at compile time. Every operation:
//!
//! - **Inspects the catalog** (`information_schema`) for the tables of a
//!   schema and the columns of the chosen table
//! - **Validates** user-typed table and column names against that catalog
//! - **Coerces** raw console input by the column's declared type
//! - **Builds** a parameterized statement with quoted identifiers
//! - **Renders** whatever rows come back, without knowing their shape
//!
//! The [`session`] module ties these together into an interactive menu.
//!
//! ## Example
//!
//! ```rust,no_run
//! use pg_crud::{ConnectionConfig, LineConsole, PgDatabase, Session, SessionConfig};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> pg_crud::Result<()> {
//!     let config = ConnectionConfig {
//!         database: "shop".into(),
//!         user: "app".into(),
//!         password: "secret".into(),
//!         ..Default::default()
//!     };
//!     let db = PgDatabase::connect(&config).await?;
//!     let mut session = Session::new(&db, LineConsole::stdio(), SessionConfig::default());
//!     session.run().await
//! }
//! ```

pub mod catalog;
pub mod coerce;
pub mod config;
pub mod core;
pub mod drivers;
pub mod error;
pub mod render;
pub mod session;
pub mod statement;

#[cfg(test)]
mod testing;

// Re-exports for convenient access
pub use catalog::{Catalog, CatalogInspector};
pub use coerce::{coerce, CoercionMode, Coercer};
pub use config::{ConnectionConfig, SessionConfig};
pub use crate::core::{CellValue, ColumnDescriptor, Database, RowSet, TableName, TypedValue};
pub use drivers::{PgDatabase, SslMode};
pub use error::{CrudError, Result};
pub use render::{render, RenderStyle};
pub use session::{Console, LineConsole, MenuChoice, Session};
pub use statement::{QuerySpec, RowLimit, SortDirection, Statement};
