/// Decoding of PostgreSQL text representations
///
/// Layers, leaf to root:
/// - `cell`: raw driver cells to strings, and named-column rows
/// - `composite`: `(a,"b",)` row literals to positional fields
/// - `array`: `{"(..)","(..)"}` array literals to elements
/// - `timestamp`: timestamp text to `DateTime<Utc>`
/// - `error`: the shared error type with context chaining
///
/// The entity-specific decoders live next to their types in `models`.

pub mod array;
pub mod cell;
pub mod composite;
pub mod error;
pub mod timestamp;

pub use array::{decode_array, parse_array};
pub use cell::{scan_optional_string, scan_to_string, Cell, CellRow, RowSource};
pub use composite::{check_arity, parse_composite, parse_composite_exact};
pub use error::{DecodeError, DecodeResultExt};
pub use timestamp::parse_timestamp;

use uuid::Uuid;

/// Parses a mandatory identifier field, mapping failure through `invalid`
///
/// The empty string is never a valid identifier.
pub(crate) fn parse_id(value: &str, invalid: fn(String) -> DecodeError) -> Result<Uuid, DecodeError> {
    if value.is_empty() {
        return Err(invalid(String::new()));
    }
    Uuid::parse_str(value).map_err(|_| invalid(value.to_string()))
}

/// Parses a mandatory numeric field
pub(crate) fn parse_number<T: std::str::FromStr>(
    field: &'static str,
    value: &str,
) -> Result<T, DecodeError> {
    value.trim().parse().map_err(|_| DecodeError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}
