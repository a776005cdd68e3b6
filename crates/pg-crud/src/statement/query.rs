//! Per-operation statement description.

use crate::core::schema::TableName;
use crate::core::value::TypedValue;
use crate::error::{CrudError, Result};

use super::{
    build_delete, build_filter_select, build_insert, build_list, build_update, OrderBy,
    RowLimit, SortDirection, Statement,
};

/// Which statement a [`QuerySpec`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Insert,
    SelectByFilter,
    UpdateByFilter,
    DeleteByFilter,
    ListOrdered,
}

/// Everything needed to build one statement, collected from user input.
///
/// Built fresh for each menu operation and consumed by [`QuerySpec::build`].
/// For [`Operation::UpdateByFilter`] the first entry of `columns`/`values` is
/// the column being set and its new value.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub operation: Operation,
    pub table: TableName,
    pub columns: Vec<String>,
    pub values: Vec<TypedValue>,
    pub filter_column: Option<String>,
    pub filter_value: Option<TypedValue>,
    pub order_column: Option<String>,
    pub order_direction: Option<SortDirection>,
    pub limit: Option<RowLimit>,
}

impl QuerySpec {
    fn empty(operation: Operation, table: impl Into<TableName>) -> Self {
        Self {
            operation,
            table: table.into(),
            columns: Vec::new(),
            values: Vec::new(),
            filter_column: None,
            filter_value: None,
            order_column: None,
            order_direction: None,
            limit: None,
        }
    }

    pub fn insert(
        table: impl Into<TableName>,
        columns: Vec<String>,
        values: Vec<TypedValue>,
    ) -> Self {
        Self {
            columns,
            values,
            ..Self::empty(Operation::Insert, table)
        }
    }

    pub fn select(
        table: impl Into<TableName>,
        filter_column: impl Into<String>,
        filter_value: TypedValue,
    ) -> Self {
        Self::empty(Operation::SelectByFilter, table).with_filter(filter_column, filter_value)
    }

    pub fn update(
        table: impl Into<TableName>,
        update_column: impl Into<String>,
        update_value: TypedValue,
        filter_column: impl Into<String>,
        filter_value: TypedValue,
    ) -> Self {
        Self {
            columns: vec![update_column.into()],
            values: vec![update_value],
            ..Self::empty(Operation::UpdateByFilter, table)
        }
        .with_filter(filter_column, filter_value)
    }

    pub fn delete(
        table: impl Into<TableName>,
        filter_column: impl Into<String>,
        filter_value: TypedValue,
    ) -> Self {
        Self::empty(Operation::DeleteByFilter, table).with_filter(filter_column, filter_value)
    }

    pub fn list(table: impl Into<TableName>) -> Self {
        Self::empty(Operation::ListOrdered, table)
    }

    pub fn with_filter(mut self, column: impl Into<String>, value: TypedValue) -> Self {
        self.filter_column = Some(column.into());
        self.filter_value = Some(value);
        self
    }

    pub fn with_order(mut self, column: impl Into<String>, direction: SortDirection) -> Self {
        self.order_column = Some(column.into());
        self.order_direction = Some(direction);
        self
    }

    pub fn with_limit(mut self, limit: RowLimit) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Build the statement for this operation.
    pub fn build(self) -> Result<Statement> {
        match self.operation {
            Operation::Insert => build_insert(&self.table, &self.columns, self.values),
            Operation::SelectByFilter => {
                let (column, value) = require_filter(self.filter_column, self.filter_value)?;
                build_filter_select(&self.table, &column, value)
            }
            Operation::UpdateByFilter => {
                let (filter_column, filter_value) =
                    require_filter(self.filter_column, self.filter_value)?;
                let update_column = self.columns.into_iter().next();
                let update_value = self.values.into_iter().next();
                match (update_column, update_value) {
                    (Some(column), Some(value)) => build_update(
                        &self.table,
                        &column,
                        value,
                        &filter_column,
                        filter_value,
                    ),
                    _ => Err(CrudError::Validation(
                        "UPDATE requires a column and a new value".to_string(),
                    )),
                }
            }
            Operation::DeleteByFilter => {
                let (column, value) = require_filter(self.filter_column, self.filter_value)?;
                build_delete(&self.table, &column, value)
            }
            Operation::ListOrdered => {
                let order = self
                    .order_column
                    .map(|c| OrderBy::new(c, self.order_direction.unwrap_or_default()));
                build_list(&self.table, order.as_ref(), self.limit)
            }
        }
    }
}

fn require_filter(
    column: Option<String>,
    value: Option<TypedValue>,
) -> Result<(String, TypedValue)> {
    match (column, value) {
        (Some(c), Some(v)) => Ok((c, v)),
        _ => Err(CrudError::Validation(
            "A filter column and value are required".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_dispatches_by_operation() {
        let stmt = QuerySpec::select("users", "id", TypedValue::Integer(5))
            .build()
            .unwrap();
        assert_eq!(stmt.sql, "SELECT * FROM \"users\" WHERE \"id\" = $1");

        let stmt = QuerySpec::delete("users", "id", TypedValue::Integer(5))
            .build()
            .unwrap();
        assert_eq!(stmt.sql, "DELETE FROM \"users\" WHERE \"id\" = $1");

        let stmt = QuerySpec::insert(
            "users",
            vec!["id".into(), "name".into()],
            vec![TypedValue::Integer(1), TypedValue::Text("ann".into())],
        )
        .build()
        .unwrap();
        assert_eq!(
            stmt.sql,
            "INSERT INTO \"users\" (\"id\", \"name\") VALUES ($1, $2)"
        );
    }

    #[test]
    fn test_update_query() {
        let stmt = QuerySpec::update(
            "users",
            "name",
            TypedValue::Text("bob".into()),
            "id",
            TypedValue::Integer(2),
        )
        .build()
        .unwrap();
        assert_eq!(stmt.sql, "UPDATE \"users\" SET \"name\" = $1 WHERE \"id\" = $2");
        assert_eq!(
            stmt.params,
            vec![TypedValue::Text("bob".into()), TypedValue::Integer(2)]
        );
    }

    #[test]
    fn test_list_query() {
        let stmt = QuerySpec::list("orders")
            .with_order("created_at", SortDirection::Desc)
            .with_limit(RowLimit::new(10))
            .build()
            .unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT * FROM \"orders\" ORDER BY \"created_at\" DESC LIMIT 10"
        );
    }

    #[test]
    fn test_missing_filter_is_validation_error() {
        let mut spec = QuerySpec::delete("users", "id", TypedValue::Integer(1));
        spec.filter_value = None;
        assert!(matches!(spec.build(), Err(CrudError::Validation(_))));

        let mut spec = QuerySpec::update(
            "users",
            "name",
            TypedValue::Text("x".into()),
            "id",
            TypedValue::Integer(1),
        );
        spec.values.clear();
        assert!(spec.build().is_err());
    }
}
