//! Catalog metadata types.

/// Name of a table as reported by the catalog.
pub type TableName = String;

/// A column and its declared data type, as listed by `information_schema.columns`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    /// Column name.
    pub name: String,

    /// Declared type (`information_schema.columns.data_type`), e.g. `integer`,
    /// `numeric`, `double precision`, `character varying`.
    pub declared_type: String,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
        }
    }
}
