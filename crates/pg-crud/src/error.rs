//! Error types for the CRUD client.

use thiserror::Error;

/// Exit code for configuration errors (bad flags, invalid connection settings).
pub const EXIT_CONFIG_ERROR: u8 = 1;
/// Exit code when the initial database connection cannot be established.
pub const EXIT_CONNECTION_ERROR: u8 = 3;
/// Exit code for errors that escape an interactive session.
pub const EXIT_SESSION_ERROR: u8 = 4;
/// Exit code for console or file IO failures.
pub const EXIT_IO_ERROR: u8 = 7;

/// Main error type for catalog, statement, and session operations.
#[derive(Error, Debug)]
pub enum CrudError {
    /// Configuration error (invalid flag values, missing credentials, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The initial connection to the database failed
    #[error("Connection failed: {0}")]
    Connection(String),

    /// Catalog introspection query failed
    #[error("Catalog query failed: {0}")]
    Catalog(String),

    /// Statement execution failed (constraint violation, type mismatch, ...)
    #[error("Statement failed: {0}")]
    Statement(String),

    /// A table or column name is not in the catalog, or user input is malformed
    #[error("{0}")]
    Validation(String),

    /// Raw input could not be converted to the column's declared type (strict mode)
    #[error("Cannot convert {raw:?} to {declared_type}")]
    Coercion { raw: String, declared_type: String },

    /// IO error (console read/write)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CrudError {
    /// Create a Coercion error
    pub fn coercion(raw: impl Into<String>, declared_type: impl Into<String>) -> Self {
        CrudError::Coercion {
            raw: raw.into(),
            declared_type: declared_type.into(),
        }
    }

    /// Re-tag a failure from the database layer as a catalog failure.
    ///
    /// Only statement errors change kind; everything else passes through.
    pub fn into_catalog(self) -> Self {
        match self {
            CrudError::Statement(msg) => CrudError::Catalog(msg),
            other => other,
        }
    }

    /// Whether the session can report this error and return to the menu.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CrudError::Catalog(_)
                | CrudError::Statement(_)
                | CrudError::Validation(_)
                | CrudError::Coercion { .. }
        )
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            CrudError::Config(_) => EXIT_CONFIG_ERROR,
            CrudError::Connection(_) => EXIT_CONNECTION_ERROR,
            CrudError::Io(_) => EXIT_IO_ERROR,
            _ => EXIT_SESSION_ERROR,
        }
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

impl From<tokio_postgres::Error> for CrudError {
    fn from(e: tokio_postgres::Error) -> Self {
        // Report the server's severity and message without the "db error" prefix.
        match e.as_db_error() {
            Some(db) => CrudError::Statement(format!("{}: {}", db.severity(), db.message())),
            None => CrudError::Statement(e.to_string()),
        }
    }
}

/// Result type alias for CRUD operations.
pub type Result<T> = std::result::Result<T, CrudError>;
