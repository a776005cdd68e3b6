//! The five menu operations.
//!
//! Each operation re-reads the catalog, validates every name the user types
//! against it, and only then builds and runs a statement.

use tracing::{debug, info};

use crate::catalog::{require_table, Catalog, CatalogInspector};
use crate::core::schema::{ColumnDescriptor, TableName};
use crate::core::traits::Database;
use crate::core::value::TypedValue;
use crate::error::Result;
use crate::render::{render, RenderStyle};
use crate::statement::{QuerySpec, RowLimit, SortDirection, Statement};

use super::{Console, Session, RULE};

/// A filter chosen during READ, UPDATE or DELETE.
struct Filter {
    column: String,
    value: TypedValue,
}

impl<'a, D: Database + ?Sized, C: Console> Session<'a, D, C> {
    pub(super) async fn create(&mut self) -> Result<()> {
        let catalog = self.choose_catalog().await?;
        self.print_columns(&catalog, true)?;

        let mut values = Vec::with_capacity(catalog.columns.len());
        for column in &catalog.columns {
            let label = format!("Value for {} ({}): ", column.name, column.declared_type);
            values.push(self.ask_value(column, &label)?);
        }

        let statement = QuerySpec::insert(catalog.table.clone(), catalog.column_names(), values)
            .build()?;
        let inserted = self.execute(&statement).await?;

        info!("Inserted {} row(s) into '{}'", inserted, catalog.table);
        let out = self.console.writer();
        writeln!(out, "\n{}", RULE)?;
        writeln!(out, "Rows inserted: {}", inserted)?;
        Ok(())
    }

    pub(super) async fn read(&mut self) -> Result<()> {
        let catalog = self.choose_catalog().await?;
        let filter = self.ask_filter(&catalog)?;
        let matches = self.show_matches(&catalog.table, &filter).await?;
        self.print_total(matches)
    }

    pub(super) async fn update(&mut self) -> Result<()> {
        let catalog = self.choose_catalog().await?;
        let filter = self.ask_filter(&catalog)?;
        let matches = self.show_matches(&catalog.table, &filter).await?;
        if matches == 0 {
            return self.print_total(matches);
        }

        let target = self.ask_column(&catalog, "\nColumn to update: ")?;
        let label = format!("New value for {} ({}): ", target.name, target.declared_type);
        let new_value = self.ask_value(&target, &label)?;

        let statement = QuerySpec::update(
            catalog.table.clone(),
            target.name,
            new_value,
            filter.column,
            filter.value,
        )
        .build()?;
        let updated = self.execute(&statement).await?;

        info!("Updated {} row(s) in '{}'", updated, catalog.table);
        writeln!(self.console.writer(), "\nRows updated: {}", updated)?;
        Ok(())
    }

    pub(super) async fn delete(&mut self) -> Result<()> {
        let catalog = self.choose_catalog().await?;
        let filter = self.ask_filter(&catalog)?;
        let matches = self.show_matches(&catalog.table, &filter).await?;
        if matches == 0 {
            return self.print_total(matches);
        }

        let statement = QuerySpec::delete(catalog.table.clone(), filter.column, filter.value)
            .build()?;
        let deleted = self.execute(&statement).await?;

        info!("Deleted {} row(s) from '{}'", deleted, catalog.table);
        writeln!(self.console.writer(), "\nRows deleted: {}", deleted)?;
        Ok(())
    }

    pub(super) async fn list(&mut self) -> Result<()> {
        let catalog = self.choose_catalog().await?;
        let mut spec = QuerySpec::list(catalog.table.clone());

        if self.ask_yes_no("Limit the number of rows? (y/n): ")? {
            let raw = self.ask("Number of rows: ")?;
            spec = spec.with_limit(raw.trim().parse::<RowLimit>()?);
        }

        if self.ask_yes_no("Sort the rows? (y/n): ")? {
            self.print_columns(&catalog, false)?;
            let column = self.ask_column(&catalog, "Sort by column: ")?;
            let direction = self
                .ask("Direction (ASC/DESC): ")?
                .parse::<SortDirection>()?;
            spec = spec.with_order(column.name, direction);
        }

        let statement = spec.build()?;
        debug!("list: {}", statement.sql);
        let rows = self.db.query(&statement.sql, &statement.params).await?;

        let out = self.console.writer();
        writeln!(out, "\nRows in {}:", catalog.table)?;
        let count = render(out, &rows.columns, rows.rows, RenderStyle::Line)?;
        writeln!(out, "\nTotal rows: {}", count)?;
        Ok(())
    }

    /// List the schema's tables, read a name and load its catalog.
    async fn choose_catalog(&mut self) -> Result<Catalog> {
        let inspector = CatalogInspector::new(self.db, self.config.schema.clone());
        let tables: Vec<TableName> = inspector.list_tables().await?;

        let out = self.console.writer();
        writeln!(out, "\nTables in schema '{}':", inspector.schema())?;
        for (i, table) in tables.iter().enumerate() {
            writeln!(out, "{}. {}", i + 1, table)?;
        }
        writeln!(out)?;

        let name = self.ask("Table: ")?;
        let table = require_table(&tables, name.trim())?;
        inspector.load_catalog(table).await
    }

    fn print_columns(&mut self, catalog: &Catalog, with_types: bool) -> Result<()> {
        let out = self.console.writer();
        writeln!(out, "\nColumns of {}:", catalog.table)?;
        for column in &catalog.columns {
            if with_types {
                writeln!(out, "- {} ({})", column.name, column.declared_type)?;
            } else {
                writeln!(out, "- {}", column.name)?;
            }
        }
        writeln!(out)?;
        Ok(())
    }

    fn ask_column(&mut self, catalog: &Catalog, label: &str) -> Result<ColumnDescriptor> {
        let name = self.ask(label)?;
        catalog.require_column(name.trim()).cloned()
    }

    fn ask_value(&mut self, column: &ColumnDescriptor, label: &str) -> Result<TypedValue> {
        let raw = self.ask(label)?;
        self.coercer.coerce(&raw, &column.declared_type)
    }

    fn ask_yes_no(&mut self, label: &str) -> Result<bool> {
        let answer = self.ask(label)?;
        Ok(matches!(
            answer.trim().to_lowercase().as_str(),
            "y" | "yes"
        ))
    }

    fn ask_filter(&mut self, catalog: &Catalog) -> Result<Filter> {
        self.print_columns(catalog, true)?;
        let column = self.ask_column(catalog, "Search column: ")?;
        let label = format!("Search value for {} ({}): ", column.name, column.declared_type);
        let value = self.ask_value(&column, &label)?;
        Ok(Filter {
            column: column.name,
            value,
        })
    }

    /// Render the rows matching `filter` and return how many there were.
    async fn show_matches(&mut self, table: &str, filter: &Filter) -> Result<usize> {
        let statement =
            QuerySpec::select(table, filter.column.clone(), filter.value.clone()).build()?;
        debug!("select: {}", statement.sql);
        let rows = self.db.query(&statement.sql, &statement.params).await?;

        let out = self.console.writer();
        writeln!(out, "\nMatches in {}:", table)?;
        render(out, &rows.columns, rows.rows, RenderStyle::Record)
    }

    fn print_total(&mut self, count: usize) -> Result<()> {
        let out = self.console.writer();
        if count == 0 {
            writeln!(out, "\nNo matches")?;
        } else {
            writeln!(out, "\nTotal rows: {}", count)?;
        }
        Ok(())
    }

    async fn execute(&self, statement: &Statement) -> Result<u64> {
        debug!("execute: {}", statement.sql);
        self.db.execute(&statement.sql, &statement.params).await
    }
}
