//! Configuration validation.

use super::ConnectionConfig;
use crate::core::identifier::validate_identifier;
use crate::error::{CrudError, Result};

/// Validate connection settings before any network traffic.
pub fn validate(config: &ConnectionConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(CrudError::Config("host is required".into()));
    }
    if config.port == 0 {
        return Err(CrudError::Config("port must be between 1 and 65535".into()));
    }
    if config.database.is_empty() {
        return Err(CrudError::Config("database is required".into()));
    }
    if config.user.is_empty() {
        return Err(CrudError::Config("user is required".into()));
    }

    validate_identifier(&config.schema)
        .map_err(|e| CrudError::Config(format!("schema: {}", e)))?;

    Ok(())
}
