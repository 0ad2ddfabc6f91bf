/// Teams
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     team_id         UUID PRIMARY KEY,
///     organization_id UUID REFERENCES organizations(organization_id),
///     name            TEXT NOT NULL,
///     capacity        INTEGER NOT NULL DEFAULT 0,  -- 0 = no limit
///     owner_id        UUID NOT NULL,
///     created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at      TIMESTAMPTZ
/// );
/// ```
///
/// The parent organization is held as an [`OrganizationRef`], never as a
/// hydrated organization.

use super::membership::TeamMembership;
use super::metadata::OwnershipMetadata;
use super::reference::OrganizationRef;
use crate::codec::{
    check_arity, decode_array, parse_composite_exact, parse_id, parse_number, DecodeError,
    DecodeResultExt, RowSource,
};
use serde::Serialize;
use uuid::Uuid;

/// Fields ahead of the embedded metadata
const OWN_FIELDS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    #[serde(rename = "team_id")]
    pub id: Uuid,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<OrganizationRef>,

    pub users: Vec<TeamMembership>,

    pub name: String,

    /// Maximum number of users in the team. 0 = no limit.
    pub capacity: u32,

    #[serde(skip_serializing_if = "OwnershipMetadata::is_empty")]
    pub metadata: OwnershipMetadata,
}

impl Team {
    /// Number of fields in a `teams` composite
    pub const ARITY: usize = OWN_FIELDS + OwnershipMetadata::ARITY;

    /// Decodes a `teams` composite literal
    ///
    /// The composite carries no members; `users` comes back empty.
    pub fn from_composite(input: &str) -> Result<Self, DecodeError> {
        let fields = parse_composite_exact(input, Self::ARITY)?;
        Self::from_fields(&fields)
    }

    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, DecodeError> {
        check_arity(fields, Self::ARITY)?;

        let id = parse_id(fields[0].as_ref(), DecodeError::InvalidTeamId)?;
        let organization = match fields[1].as_ref() {
            "" => None,
            value => Some(OrganizationRef::new(parse_id(
                value,
                DecodeError::InvalidOrganizationId,
            )?)),
        };
        let capacity = parse_number("capacity", fields[3].as_ref())?;
        let metadata = OwnershipMetadata::from_fields(&fields[OWN_FIELDS..]).context("metadata")?;

        Ok(Self {
            id,
            organization,
            users: Vec::new(),
            name: fields[2].as_ref().to_string(),
            capacity,
            metadata,
        })
    }

    /// Decodes a team row with its members aggregated into `users`
    pub fn from_row<R: RowSource + ?Sized>(row: &R) -> Result<Self, DecodeError> {
        let decode = || -> Result<Self, DecodeError> {
            let id = parse_id(&row.text("team_id")?, DecodeError::InvalidTeamId)?;

            let organization = match row.nullable_text("organization_id")? {
                Some(value) => Some(OrganizationRef::new(parse_id(
                    &value,
                    DecodeError::InvalidOrganizationId,
                )?)),
                None => None,
            };

            let users = match row.nullable_text("users")? {
                Some(array) => {
                    decode_array(&array, TeamMembership::from_composite).context("users")?
                }
                None => Vec::new(),
            };

            let capacity = parse_number("capacity", &row.text("capacity")?)?;
            let metadata = OwnershipMetadata::from_row(row).context("metadata")?;

            Ok(Self {
                id,
                organization,
                users,
                name: row.text("name")?.into_owned(),
                capacity,
                metadata,
            })
        };
        decode().context("team")
    }

    pub fn is_unlimited(&self) -> bool {
        self.capacity == 0
    }

    /// True if one more member fits
    pub fn has_room(&self) -> bool {
        self.is_unlimited() || self.users.len() < self.capacity as usize
    }
}
