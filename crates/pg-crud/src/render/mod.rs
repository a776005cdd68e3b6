//! Generic result-set rendering.
//!
//! Prints rows of any shape by zipping the statement's column names with each
//! row's cells. Cells are never interpreted, only displayed.

use std::io::Write;

use crate::core::value::CellValue;
use crate::error::Result;

/// Layout for rendered rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderStyle {
    /// One line per row: `1. id: 5 name: ann`.
    #[default]
    Line,
    /// A `Row N:` header, then one `column: value` line per column.
    Record,
}

/// Write `rows` to `out` and return how many were rendered.
///
/// An empty sequence writes nothing and returns 0. The first `Err` row stops
/// iteration; rows before it have already been written when the error is
/// returned.
pub fn render<W, I>(
    out: &mut W,
    columns: &[String],
    rows: I,
    style: RenderStyle,
) -> Result<usize>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = Result<Vec<CellValue>>>,
{
    let mut count = 0usize;

    for row in rows {
        let row = row?;
        count += 1;

        match style {
            RenderStyle::Line => {
                let pairs = format_pairs(columns, &row).join(" ");
                writeln!(out, "{}. {}", count, pairs)?;
            }
            RenderStyle::Record => {
                writeln!(out)?;
                writeln!(out, "Row {}:", count)?;
                for pair in format_pairs(columns, &row) {
                    writeln!(out, "{}", pair)?;
                }
            }
        }
    }

    Ok(count)
}

/// `column: value` strings for one row, paired by position.
///
/// A row shorter than the column list only renders the cells it has.
fn format_pairs(columns: &[String], row: &[CellValue]) -> Vec<String> {
    columns
        .iter()
        .zip(row.iter())
        .map(|(name, value)| format!("{}: {}", name, value))
        .collect()
}
