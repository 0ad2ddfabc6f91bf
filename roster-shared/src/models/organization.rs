/// Organizations
///
/// # Schema
///
/// ```sql
/// CREATE TABLE organizations (
///     organization_id UUID PRIMARY KEY,
///     payment_plan_id UUID REFERENCES payment_plans(payment_plan_id),
///     owner_id        UUID NOT NULL,
///     created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at      TIMESTAMPTZ
/// );
/// ```
///
/// An organization row embeds its members directly, as an aggregated array of
/// `user_organization_join` composites in the `users` column. Teams and the
/// payment plan are optional columns.

use super::membership::OrganizationMembership;
use super::metadata::OwnershipMetadata;
use super::payment_plan::PaymentPlan;
use super::reference::OrganizationRef;
use super::team::Team;
use crate::codec::{decode_array, parse_id, DecodeError, DecodeResultExt, RowSource};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Organization {
    #[serde(rename = "organization_id")]
    pub id: Uuid,

    pub users: Vec<OrganizationMembership>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<Team>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_plan: Option<PaymentPlan>,

    #[serde(skip_serializing_if = "OwnershipMetadata::is_empty")]
    pub metadata: OwnershipMetadata,
}

impl Organization {
    /// Decodes an organization row
    ///
    /// Required columns: `organization_id`, `users`, `owner_id`, `created_at`,
    /// `updated_at`, `deleted_at`. Optional columns: `teams` (array of team
    /// composites) and `payment_plan` (payment plan composite).
    pub fn from_row<R: RowSource + ?Sized>(row: &R) -> Result<Self, DecodeError> {
        let decode = || -> Result<Self, DecodeError> {
            let id = parse_id(
                &row.text("organization_id")?,
                DecodeError::InvalidOrganizationId,
            )?;

            let users = match row.nullable_text("users")? {
                Some(array) => decode_array(&array, OrganizationMembership::from_composite)
                    .context("users")?,
                None => Vec::new(),
            };

            let teams = match row.optional_text("teams")? {
                Some(array) => decode_array(&array, Team::from_composite).context("teams")?,
                None => Vec::new(),
            };

            let payment_plan = row
                .optional_text("payment_plan")?
                .map(|plan| PaymentPlan::from_composite(&plan))
                .transpose()
                .context("payment_plan")?;

            let metadata = OwnershipMetadata::from_row(row).context("metadata")?;

            Ok(Self {
                id,
                users,
                teams,
                payment_plan,
                metadata,
            })
        };
        decode().context("organization")
    }

    pub fn reference(&self) -> OrganizationRef {
        OrganizationRef::new(self.id)
    }

    /// Membership of `user_id`, if any
    pub fn membership(&self, user_id: Uuid) -> Option<&OrganizationMembership> {
        self.users.iter().find(|m| m.user_id == user_id)
    }
}
