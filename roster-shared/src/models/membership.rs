/// Membership join rows between users and organizations / teams
///
/// # Schema
///
/// ```sql
/// CREATE TABLE user_organization_join (
///     user_id         UUID NOT NULL REFERENCES users(user_id),
///     organization_id UUID NOT NULL REFERENCES organizations(organization_id),
///     role            TEXT NOT NULL,
///     owner_id        UUID NOT NULL,
///     created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at      TIMESTAMPTZ
/// );
///
/// CREATE TABLE user_team_join (
///     user_id    UUID NOT NULL REFERENCES users(user_id),
///     team_id    UUID NOT NULL REFERENCES teams(team_id),
///     role       TEXT NOT NULL,
///     owner_id   UUID NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at TIMESTAMPTZ
/// );
/// ```
///
/// A join row arrives as a 7-field composite literal: the three membership
/// columns followed by the four metadata columns, in table order.
///
/// # Example
///
/// ```
/// use roster_shared::models::membership::OrganizationMembership;
///
/// let membership = OrganizationMembership::from_composite(concat!(
///     "(11111111-1111-1111-1111-111111111111,",
///     "22222222-2222-2222-2222-222222222222,admin,",
///     "33333333-3333-3333-3333-333333333333,",
///     r#""2024-01-01 00:00:00+00","2024-01-01 00:00:00+00",)"#,
/// ))
/// .unwrap();
/// assert_eq!(membership.role, "admin");
/// ```

use super::metadata::OwnershipMetadata;
use crate::codec::{
    check_arity, parse_composite_exact, parse_id, DecodeError, DecodeResultExt,
};
use serde::Serialize;
use uuid::Uuid;

/// Fields ahead of the embedded metadata
const OWN_FIELDS: usize = 3;

/// Number of fields in a membership composite
pub const MEMBERSHIP_ARITY: usize = OWN_FIELDS + OwnershipMetadata::ARITY;

/// A user's membership in an organization
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizationMembership {
    pub user_id: Uuid,
    pub organization_id: Uuid,

    /// Organization-scoped role, never empty
    pub role: String,

    #[serde(skip_serializing_if = "OwnershipMetadata::is_empty")]
    pub metadata: OwnershipMetadata,
}

impl OrganizationMembership {
    /// Decodes a `user_organization_join` composite literal
    pub fn from_composite(input: &str) -> Result<Self, DecodeError> {
        let fields = parse_composite_exact(input, MEMBERSHIP_ARITY)?;
        Self::from_fields(&fields)
    }

    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, DecodeError> {
        let (user_id, organization_id, role, metadata) =
            decode_membership(fields, DecodeError::InvalidOrganizationId)?;

        Ok(Self {
            user_id,
            organization_id,
            role,
            metadata,
        })
    }
}

/// A user's membership in a team
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeamMembership {
    pub user_id: Uuid,
    pub team_id: Uuid,

    /// Team-scoped role, never empty
    pub role: String,

    #[serde(skip_serializing_if = "OwnershipMetadata::is_empty")]
    pub metadata: OwnershipMetadata,
}

impl TeamMembership {
    /// Decodes a `user_team_join` composite literal
    pub fn from_composite(input: &str) -> Result<Self, DecodeError> {
        let fields = parse_composite_exact(input, MEMBERSHIP_ARITY)?;
        Self::from_fields(&fields)
    }

    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, DecodeError> {
        let (user_id, team_id, role, metadata) =
            decode_membership(fields, DecodeError::InvalidTeamId)?;

        Ok(Self {
            user_id,
            team_id,
            role,
            metadata,
        })
    }
}

/// Shared layout of both join rows: user, target, role, metadata
fn decode_membership<S: AsRef<str>>(
    fields: &[S],
    invalid_target: fn(String) -> DecodeError,
) -> Result<(Uuid, Uuid, String, OwnershipMetadata), DecodeError> {
    check_arity(fields, MEMBERSHIP_ARITY)?;

    let user_id = parse_id(fields[0].as_ref(), DecodeError::InvalidUserId)?;
    let target_id = parse_id(fields[1].as_ref(), invalid_target)?;

    let role = fields[2].as_ref();
    if role.is_empty() {
        return Err(DecodeError::InvalidRole);
    }

    let metadata = OwnershipMetadata::from_fields(&fields[OWN_FIELDS..]).context("metadata")?;

    Ok((user_id, target_id, role.to_string(), metadata))
}
