//! PostgreSQL driver.
//!
//! [`PgDatabase`] owns one `tokio-postgres` client. Statements run one at a
//! time, so no pool is needed.

mod cells;
mod numeric;
mod params;

use std::future::Future;

use async_trait::async_trait;
use futures::StreamExt;
use tokio_postgres::types::ToSql;
use tokio_postgres::{Client, NoTls};
use tracing::{debug, error, info, warn};

use crate::config::ConnectionConfig;
use crate::core::identifier::quote_pg;
use crate::core::traits::{Database, RowSet};
use crate::core::value::TypedValue;
use crate::drivers::common::TlsBuilder;
use crate::error::{CrudError, Result};

use cells::decode_row;

/// A live PostgreSQL connection.
pub struct PgDatabase {
    client: Client,
}

impl PgDatabase {
    /// Connect, verify the connection and point `search_path` at the
    /// configured schema.
    pub async fn connect(config: &ConnectionConfig) -> Result<Self> {
        config.validate()?;
        debug!("Connecting with {}", config);

        let pg_config = config.pg_config();
        let client = match TlsBuilder::new(config.ssl_mode).build()? {
            None => {
                warn!("PostgreSQL TLS is disabled. Credentials will be transmitted in plaintext.");
                let (client, connection) = pg_config
                    .connect(NoTls)
                    .await
                    .map_err(|e| CrudError::Connection(e.to_string()))?;
                spawn_connection(connection);
                client
            }
            Some(tls) => {
                let (client, connection) = pg_config
                    .connect(tls)
                    .await
                    .map_err(|e| CrudError::Connection(e.to_string()))?;
                spawn_connection(connection);
                client
            }
        };

        // Test connection
        client
            .simple_query("SELECT 1")
            .await
            .map_err(|e| CrudError::Connection(e.to_string()))?;

        let set_path = format!("SET search_path TO {}", quote_pg(&config.schema)?);
        client
            .batch_execute(&set_path)
            .await
            .map_err(|e| CrudError::Connection(e.to_string()))?;

        info!(
            "Connected to PostgreSQL: {}:{}/{} (schema {})",
            config.host, config.port, config.database, config.schema
        );

        Ok(Self { client })
    }
}

/// Drive the connection on its own task until the client is dropped.
fn spawn_connection<F>(connection: F)
where
    F: Future<Output = std::result::Result<(), tokio_postgres::Error>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            error!("PostgreSQL connection error: {}", e);
        }
    });
}

fn param_refs(params: &[TypedValue]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
}

#[async_trait]
impl Database for PgDatabase {
    async fn query(&self, sql: &str, params: &[TypedValue]) -> Result<RowSet> {
        debug!("query: {} ({} params)", sql, params.len());

        let statement = self.client.prepare(sql).await?;
        let columns = statement
            .columns()
            .iter()
            .map(|c| c.name().to_string())
            .collect::<Vec<_>>();

        let stream = self
            .client
            .query_raw(&statement, param_refs(params))
            .await?;
        tokio::pin!(stream);

        let mut rows = Vec::new();
        while let Some(next) = stream.next().await {
            match next.map_err(CrudError::from).and_then(|row| decode_row(&row)) {
                Ok(cells) => rows.push(Ok(cells)),
                Err(e) => {
                    warn!("Stopped reading rows: {}", e);
                    rows.push(Err(e));
                    break;
                }
            }
        }

        Ok(RowSet { columns, rows })
    }

    async fn execute(&self, sql: &str, params: &[TypedValue]) -> Result<u64> {
        debug!("execute: {} ({} params)", sql, params.len());
        let affected = self.client.execute(sql, &param_refs(params)).await?;
        Ok(affected)
    }
}
