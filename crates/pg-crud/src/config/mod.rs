//! Connection and session configuration.

mod types;
mod validation;

pub use types::*;

use std::fmt;

use tokio_postgres::config::SslMode as PgSslMode;
use tokio_postgres::Config as PgConfig;

use crate::error::Result;

impl ConnectionConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }

    /// libpq-style `key=value` connection string.
    pub fn connection_string(&self) -> String {
        self.format_connection_string(&self.password)
    }

    fn format_connection_string(&self, password: &str) -> String {
        format!(
            "host={} port={} dbname={} user={} password={} sslmode={}",
            quote_conn_value(&self.host),
            self.port,
            quote_conn_value(&self.database),
            quote_conn_value(&self.user),
            quote_conn_value(password),
            self.ssl_mode
        )
    }

    /// Driver configuration. TLS modes never fall back to plaintext.
    pub fn pg_config(&self) -> PgConfig {
        let mut pg_config = PgConfig::new();
        pg_config.host(&self.host);
        pg_config.port(self.port);
        pg_config.dbname(&self.database);
        pg_config.user(&self.user);
        pg_config.password(&self.password);
        pg_config.application_name("pg-crud");
        pg_config.ssl_mode(if self.ssl_mode.requires_tls() {
            PgSslMode::Require
        } else {
            PgSslMode::Disable
        });
        pg_config
    }
}

/// Connection string with the password masked, for logs.
impl fmt::Display for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_connection_string("********"))
    }
}

/// Quote a connection-string value when it is empty or contains spaces,
/// quotes or backslashes.
fn quote_conn_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '\'' || c == '\\');
    if !needs_quotes {
        return value.to_string();
    }
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}
