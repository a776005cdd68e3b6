//! Configuration type definitions.

use std::fmt;

use crate::catalog::DEFAULT_SCHEMA;
use crate::coerce::CoercionMode;
use crate::drivers::SslMode;

/// Default PostgreSQL host.
pub const DEFAULT_HOST: &str = "localhost";

/// Default PostgreSQL port.
pub const DEFAULT_PORT: u16 = 5432;

/// PostgreSQL connection settings.
#[derive(Clone)]
pub struct ConnectionConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    pub ssl_mode: SslMode,

    /// Schema the session inspects and writes to.
    pub schema: String,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            database: String::new(),
            user: String::new(),
            password: String::new(),
            ssl_mode: SslMode::default(),
            schema: DEFAULT_SCHEMA.to_string(),
        }
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("ssl_mode", &self.ssl_mode)
            .field("schema", &self.schema)
            .finish()
    }
}

/// Settings for one interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Schema whose tables are offered in the menu operations.
    pub schema: String,

    /// What to do with numeric input that does not parse.
    pub coercion: CoercionMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            schema: DEFAULT_SCHEMA.to_string(),
            coercion: CoercionMode::default(),
        }
    }
}
