/// Raw database cells and named-column rows
///
/// A driver hands every column over as a [`Cell`]. Decoders only ever want
/// text, so [`scan_to_string`] resolves the text/bytes distinction once and
/// rejects everything else with [`DecodeError::InvalidType`].
///
/// # Example
///
/// ```
/// use roster_shared::codec::cell::{scan_to_string, Cell};
///
/// let cell = Cell::from(b"(a,b)".to_vec());
/// assert_eq!(scan_to_string(&cell).unwrap(), "(a,b)");
/// assert!(scan_to_string(&Cell::Int(7)).is_err());
/// ```

use super::error::{DecodeError, DecodeResultExt};
use bytes::Bytes;
use std::borrow::Cow;
use std::collections::HashMap;

/// One database cell as surfaced by a driver
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Bytes(Bytes),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl Cell {
    /// Short name of the representation, used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Cell::Text(_) => "text",
            Cell::Bytes(_) => "bytes",
            Cell::Int(_) => "integer",
            Cell::Float(_) => "float",
            Cell::Bool(_) => "boolean",
            Cell::Null => "null",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<Vec<u8>> for Cell {
    fn from(value: Vec<u8>) -> Self {
        Cell::Bytes(Bytes::from(value))
    }
}

impl From<Bytes> for Cell {
    fn from(value: Bytes) -> Self {
        Cell::Bytes(value)
    }
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        value.map(Cell::Text).unwrap_or(Cell::Null)
    }
}

/// Returns the string form of a text or byte cell
///
/// # Errors
///
/// - [`DecodeError::InvalidType`] for any other representation, including `Null`
/// - [`DecodeError::InvalidUtf8`] when a byte cell is not UTF-8
pub fn scan_to_string(cell: &Cell) -> Result<Cow<'_, str>, DecodeError> {
    match cell {
        Cell::Text(s) => Ok(Cow::Borrowed(s.as_str())),
        Cell::Bytes(b) => Ok(Cow::Borrowed(std::str::from_utf8(b)?)),
        other => Err(DecodeError::InvalidType {
            found: other.type_name(),
        }),
    }
}

/// Like [`scan_to_string`], but maps `Null` to `None`
pub fn scan_optional_string(cell: &Cell) -> Result<Option<Cow<'_, str>>, DecodeError> {
    if cell.is_null() {
        return Ok(None);
    }
    scan_to_string(cell).map(Some)
}

/// Named-column access to one result row
pub trait RowSource {
    /// Returns the cell for `column`, or `None` if the row has no such column
    fn cell(&self, column: &str) -> Option<&Cell>;

    /// Returns the cell for `column`, failing if the column is missing
    fn require(&self, column: &str) -> Result<&Cell, DecodeError> {
        self.cell(column)
            .ok_or_else(|| DecodeError::MissingColumn(column.to_string()))
    }

    /// Text of a required, non-null column
    fn text(&self, column: &str) -> Result<Cow<'_, str>, DecodeError> {
        let cell = self.require(column)?;
        scan_to_string(cell).context(column)
    }

    /// Text of a required, nullable column
    fn nullable_text(&self, column: &str) -> Result<Option<Cow<'_, str>>, DecodeError> {
        let cell = self.require(column)?;
        scan_optional_string(cell).context(column)
    }

    /// Text of a column the query may not select at all
    fn optional_text(&self, column: &str) -> Result<Option<Cow<'_, str>>, DecodeError> {
        match self.cell(column) {
            Some(cell) => scan_optional_string(cell).context(column),
            None => Ok(None),
        }
    }
}

/// In-memory row keyed by column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellRow {
    cells: HashMap<String, Cell>,
}

impl CellRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, column: impl Into<String>, cell: impl Into<Cell>) -> Self {
        self.insert(column, cell);
        self
    }

    pub fn insert(&mut self, column: impl Into<String>, cell: impl Into<Cell>) {
        self.cells.insert(column.into(), cell.into());
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl RowSource for CellRow {
    fn cell(&self, column: &str) -> Option<&Cell> {
        self.cells.get(column)
    }
}
