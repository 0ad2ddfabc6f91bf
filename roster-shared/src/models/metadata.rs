/// Ownership and soft-delete metadata shared by every entity
///
/// # Composite types
///
/// ```sql
/// CREATE TYPE timestamps AS (
///     created_at TIMESTAMPTZ,
///     updated_at TIMESTAMPTZ,
///     deleted_at TIMESTAMPTZ
/// );
///
/// CREATE TYPE metadata AS (
///     owner_id   UUID,
///     created_at TIMESTAMPTZ,
///     updated_at TIMESTAMPTZ,
///     deleted_at TIMESTAMPTZ
/// );
/// ```
///
/// # JSON
///
/// A metadata block encodes as a flat object and leaves out anything unset:
///
/// ```json
/// {"owner_id": "...", "created_at": "2024-01-01T00:00:00Z", "updated_at": "2024-01-02T00:00:00Z"}
/// ```
///
/// # Example
///
/// ```
/// use roster_shared::models::metadata::OwnershipMetadata;
///
/// let metadata = OwnershipMetadata::from_composite(
///     r#"(00000000-0000-0000-0000-000000000000,"2024-01-01 00:00:00","2024-01-02 00:00:00",)"#,
/// )
/// .unwrap();
/// assert!(metadata.owner.unwrap().id.is_nil());
/// assert!(metadata.timestamps.unwrap().deleted_at.is_none());
/// ```

use super::reference::UserRef;
use crate::codec::{
    check_arity, parse_composite_exact, parse_id, parse_timestamp, DecodeError, DecodeResultExt,
    RowSource,
};
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use uuid::Uuid;

/// Created/updated/deleted instants
///
/// `created_at` and `updated_at` are always present once read from storage.
/// `deleted_at` is `None` unless the row is soft-deleted.
///
/// The zero instant (`DateTime::<Utc>::default()`, the Unix epoch) counts as
/// unset: a field holding it is left out of the JSON rather than encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimestampSet {
    #[serde(skip_serializing_if = "is_unset")]
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "is_unset")]
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "is_unset_or_none")]
    pub deleted_at: Option<DateTime<Utc>>,
}

fn is_unset(at: &DateTime<Utc>) -> bool {
    *at == DateTime::<Utc>::default()
}

fn is_unset_or_none(at: &Option<DateTime<Utc>>) -> bool {
    at.as_ref().map_or(true, is_unset)
}

impl TimestampSet {
    /// Number of fields in the composite type
    pub const ARITY: usize = 3;

    /// Both instants set to `at`, not deleted
    pub fn created(at: DateTime<Utc>) -> Self {
        Self {
            created_at: at,
            updated_at: at,
            deleted_at: None,
        }
    }

    /// Decodes a `(created,updated,deleted)` composite literal
    pub fn from_composite(input: &str) -> Result<Self, DecodeError> {
        let fields = parse_composite_exact(input, Self::ARITY)?;
        Self::from_fields(&fields)
    }

    /// Decodes the three positional fields of the composite
    ///
    /// An empty `deleted_at` field means "not deleted"; a non-empty one that
    /// fails to parse is an error like any other timestamp.
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, DecodeError> {
        check_arity(fields, Self::ARITY)?;

        let created_at = required_timestamp("created_at", fields[0].as_ref())?;
        let updated_at = required_timestamp("updated_at", fields[1].as_ref())?;
        let deleted_at = match fields[2].as_ref() {
            "" => None,
            value => Some(required_timestamp("deleted_at", value)?),
        };

        Ok(Self {
            created_at,
            updated_at,
            deleted_at,
        })
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

fn required_timestamp(field: &'static str, value: &str) -> Result<DateTime<Utc>, DecodeError> {
    parse_timestamp(value).ok_or_else(|| DecodeError::TimestampParse {
        field,
        value: value.to_string(),
    })
}

/// Owner reference plus timestamps
///
/// Both halves are optional so an entity that has not been persisted yet can
/// exist; decoding from storage always fills them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OwnershipMetadata {
    pub owner: Option<UserRef>,
    pub timestamps: Option<TimestampSet>,
}

impl OwnershipMetadata {
    /// Number of fields in the composite type
    pub const ARITY: usize = 4;

    pub fn new(owner: UserRef, timestamps: TimestampSet) -> Self {
        Self {
            owner: Some(owner),
            timestamps: Some(timestamps),
        }
    }

    /// Decodes an `(owner_id,created,updated,deleted)` composite literal
    pub fn from_composite(input: &str) -> Result<Self, DecodeError> {
        let fields = parse_composite_exact(input, Self::ARITY)?;
        Self::from_fields(&fields)
    }

    /// Decodes the four positional fields of the composite
    ///
    /// The owner is mandatory here; the trailing three fields go to
    /// [`TimestampSet::from_fields`].
    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, DecodeError> {
        check_arity(fields, Self::ARITY)?;

        let owner_id = parse_id(fields[0].as_ref(), DecodeError::InvalidOwnerId)?;
        let timestamps = TimestampSet::from_fields(&fields[1..]).context("timestamps")?;

        Ok(Self::new(UserRef::new(owner_id), timestamps))
    }

    /// Decodes the flattened `owner_id`, `created_at`, `updated_at` and
    /// `deleted_at` columns of a table row
    ///
    /// Unlike the composite form, a NULL `owner_id` column means "no owner".
    pub fn from_row<R: RowSource + ?Sized>(row: &R) -> Result<Self, DecodeError> {
        let owner = match row.nullable_text("owner_id")? {
            Some(owner_id) => Some(UserRef::new(parse_id(
                &owner_id,
                DecodeError::InvalidOwnerId,
            )?)),
            None => None,
        };

        let created_at = row.text("created_at")?;
        let updated_at = row.text("updated_at")?;
        let deleted_at = row.nullable_text("deleted_at")?.unwrap_or_default();
        let timestamps = TimestampSet::from_fields(&[created_at, updated_at, deleted_at])
            .context("timestamps")?;

        Ok(Self {
            owner,
            timestamps: Some(timestamps),
        })
    }

    pub fn owner_id(&self) -> Option<Uuid> {
        self.owner.map(|owner| owner.id)
    }

    /// True when there is nothing to encode
    pub fn is_empty(&self) -> bool {
        self.owner.is_none() && self.timestamps.is_none()
    }
}

impl Serialize for OwnershipMetadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(owner) = &self.owner {
            map.serialize_entry("owner_id", &owner.id)?;
        }
        if let Some(timestamps) = &self.timestamps {
            if !is_unset(&timestamps.created_at) {
                map.serialize_entry("created_at", &timestamps.created_at)?;
            }
            if !is_unset(&timestamps.updated_at) {
                map.serialize_entry("updated_at", &timestamps.updated_at)?;
            }
            if !is_unset_or_none(&timestamps.deleted_at) {
                map.serialize_entry("deleted_at", &timestamps.deleted_at)?;
            }
        }
        map.end()
    }
}
