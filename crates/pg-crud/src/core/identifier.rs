//! Identifier validation and quoting for dynamically built statements.
//!
//! SQL identifiers (table names, column names) cannot be passed as bound
//! parameters; only values can. Statements that name a user-selected table or
//! column therefore embed the identifier in the statement text, which is only
//! safe once it has been:
//!
//! 1. matched against the catalog fetched just before (see [`crate::catalog`]),
//! 2. checked for suspicious content (null bytes, excessive length),
//! 3. wrapped in double quotes with embedded quotes doubled.
//!
//! Steps 2 and 3 live here.

use crate::error::{CrudError, Result};

/// PostgreSQL truncates identifiers at 63 bytes (NAMEDATALEN - 1); anything
/// much longer cannot have come from the catalog.
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate an identifier for security issues.
///
/// Rejects:
/// - Empty identifiers
/// - Identifiers containing null bytes
/// - Identifiers exceeding maximum length
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(CrudError::Validation(
            "Identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(CrudError::Validation(format!(
            "SECURITY: Identifier contains null byte (possible injection attempt): {:?}",
            name
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(CrudError::Validation(format!(
            "SECURITY: Identifier exceeds maximum length of {} bytes (got {} bytes): {:?}",
            MAX_IDENTIFIER_LENGTH,
            name.len(),
            name
        )));
    }

    Ok(())
}

/// Quote a PostgreSQL identifier.
///
/// Escapes double quotes by doubling them and wraps in double quotes.
/// Validates the identifier before quoting.
///
/// # Examples
///
/// ```
/// use pg_crud::core::identifier::quote_pg;
///
/// assert_eq!(quote_pg("users").unwrap(), "\"users\"");
/// assert_eq!(quote_pg("table\"name").unwrap(), "\"table\"\"name\"");
/// ```
pub fn quote_pg(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

/// Quote each identifier and join them with `", "`.
pub fn quote_pg_list<S: AsRef<str>>(names: &[S]) -> Result<String> {
    let quoted = names
        .iter()
        .map(|n| quote_pg(n.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    Ok(quoted.join(", "))
}
