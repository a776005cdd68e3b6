//! Catalog introspection.
//!
//! Lists the tables of a schema and the columns of a table from
//! `information_schema`, and keeps a per-operation [`Catalog`] snapshot used to
//! validate user-selected identifiers before they are embedded in a statement.

use tracing::debug;

use crate::core::schema::{ColumnDescriptor, TableName};
use crate::core::traits::{Database, RowSet};
use crate::core::value::{CellValue, TypedValue};
use crate::error::{CrudError, Result};

/// Default schema inspected when none is configured.
pub const DEFAULT_SCHEMA: &str = "public";

const LIST_TABLES_SQL: &str = r#"
    SELECT table_name::text
    FROM information_schema.tables
    WHERE table_schema = $1::text
    ORDER BY table_name
"#;

const LIST_COLUMNS_SQL: &str = r#"
    SELECT column_name::text, data_type::text
    FROM information_schema.columns
    WHERE table_schema = $1::text AND table_name = $2::text
    ORDER BY ordinal_position
"#;

/// Reads table and column metadata for one schema.
pub struct CatalogInspector<'a, D: Database + ?Sized> {
    db: &'a D,
    schema: String,
}

impl<'a, D: Database + ?Sized> CatalogInspector<'a, D> {
    pub fn new(db: &'a D, schema: impl Into<String>) -> Self {
        Self {
            db,
            schema: schema.into(),
        }
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// List the tables (and views) in the schema, ordered by name.
    pub async fn list_tables(&self) -> Result<Vec<TableName>> {
        let rows = self
            .db
            .query(LIST_TABLES_SQL, &[TypedValue::Text(self.schema.clone())])
            .await
            .map_err(CrudError::into_catalog)?;

        let tables = collect_text_rows(rows, 1)?
            .into_iter()
            .map(|mut row| row.swap_remove(0))
            .collect::<Vec<_>>();

        debug!("Found {} tables in schema '{}'", tables.len(), self.schema);
        Ok(tables)
    }

    /// List the columns of `table` in ordinal order.
    ///
    /// An unknown table yields an empty list, not an error.
    pub async fn list_columns(&self, table: &str) -> Result<Vec<ColumnDescriptor>> {
        let rows = self
            .db
            .query(
                LIST_COLUMNS_SQL,
                &[
                    TypedValue::Text(self.schema.clone()),
                    TypedValue::Text(table.to_string()),
                ],
            )
            .await
            .map_err(CrudError::into_catalog)?;

        let columns = collect_text_rows(rows, 2)?
            .into_iter()
            .map(|mut row| {
                let declared_type = row.swap_remove(1);
                let name = row.swap_remove(0);
                ColumnDescriptor {
                    name,
                    declared_type,
                }
            })
            .collect::<Vec<_>>();

        debug!(
            "Loaded {} columns for {}.{}",
            columns.len(),
            self.schema,
            table
        );
        Ok(columns)
    }

    /// Load a [`Catalog`] snapshot for `table`.
    ///
    /// A table with no columns is reported as not existing.
    pub async fn load_catalog(&self, table: &str) -> Result<Catalog> {
        let columns = self.list_columns(table).await?;
        if columns.is_empty() {
            return Err(CrudError::Validation(format!(
                "Table '{}' does not exist in schema '{}'",
                table, self.schema
            )));
        }
        Ok(Catalog {
            table: table.to_string(),
            columns,
        })
    }
}

/// Pull `width` text cells out of each catalog row.
///
/// The first row-level error ends the scan and is reported as a catalog error.
fn collect_text_rows(rows: RowSet, width: usize) -> Result<Vec<Vec<String>>> {
    let mut out = Vec::with_capacity(rows.rows.len());

    for row in rows.rows {
        let row = row.map_err(CrudError::into_catalog)?;
        if row.len() < width {
            return Err(CrudError::Catalog(format!(
                "expected {} columns in catalog row, got {}",
                width,
                row.len()
            )));
        }

        let texts = row
            .into_iter()
            .take(width)
            .map(|cell| match cell {
                CellValue::Text(s) => Ok(s),
                other => Err(CrudError::Catalog(format!(
                    "unexpected non-text catalog value: {}",
                    other
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        out.push(texts);
    }

    Ok(out)
}

/// Column metadata for one table, fetched just before it is used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    pub table: TableName,
    pub columns: Vec<ColumnDescriptor>,
}

impl Catalog {
    /// Look up a column, failing with a validation error if it is not in the snapshot.
    pub fn require_column(&self, name: &str) -> Result<&ColumnDescriptor> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| {
                CrudError::Validation(format!(
                    "Column '{}' does not exist in table '{}'",
                    name, self.table
                ))
            })
    }

    /// Column names in catalog order.
    pub fn column_names(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.name.clone()).collect()
    }
}

/// Check that `table` is one of the freshly listed `tables`.
pub fn require_table<'t>(tables: &'t [TableName], table: &str) -> Result<&'t str> {
    tables
        .iter()
        .find(|t| t.as_str() == table)
        .map(|t| t.as_str())
        .ok_or_else(|| CrudError::Validation(format!("Table '{}' does not exist", table)))
}
