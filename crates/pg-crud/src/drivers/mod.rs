//! Database driver implementations.
//!
//! - [`postgres`]: [`Database`](crate::core::traits::Database) over a single
//!   `tokio-postgres` connection
//! - [`common`]: Shared utilities (TLS)

pub mod common;
pub mod postgres;

pub use common::{SslMode, TlsBuilder};
pub use postgres::PgDatabase;
