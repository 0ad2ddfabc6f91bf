/// Conversion from sqlx rows to [`CellRow`]
///
/// Statements handed to [`to_cell_row`] must cast every column to `text`, so
/// composites and arrays arrive in their text form instead of the binary
/// protocol encoding.

use crate::codec::{Cell, CellRow};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row};

/// Copies every column of `row` into a [`CellRow`], NULL as [`Cell::Null`]
pub fn to_cell_row(row: &PgRow) -> Result<CellRow, sqlx::Error> {
    let mut cells = CellRow::new();
    for column in row.columns() {
        let value: Option<String> = row.try_get(column.ordinal())?;
        cells.insert(column.name(), Cell::from(value));
    }
    Ok(cells)
}
