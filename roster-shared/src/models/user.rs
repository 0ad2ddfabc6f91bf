/// User model, row decoding and the insert write path
///
/// # Schema
///
/// ```sql
/// CREATE TABLE users (
///     user_id         UUID PRIMARY KEY,
///     payment_plan_id UUID REFERENCES payment_plans(payment_plan_id),
///     owner_id        UUID REFERENCES users(user_id),
///     created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at      TIMESTAMPTZ
/// );
/// ```
///
/// A user row is read with its organization memberships aggregated into one
/// array column (see `db::users`). Team memberships and the payment plan are
/// optional columns.
///
/// # Example
///
/// ```
/// use roster_shared::codec::{Cell, CellRow};
/// use roster_shared::models::user::User;
///
/// let row = CellRow::new()
///     .with("user_id", "00000000-0000-0000-0000-000000000000")
///     .with("owner_id", "00000000-0000-0000-0000-000000000000")
///     .with("organization_memberships", "{NULL}")
///     .with("created_at", "2024-01-01 00:00:00+00")
///     .with("updated_at", "2024-01-02 00:00:00+00")
///     .with("deleted_at", Cell::Null);
///
/// let user = User::from_row(&row).unwrap();
/// assert!(user.organizations.is_empty());
///
/// let json = serde_json::to_value(&user).unwrap();
/// assert!(json["metadata"].get("deleted_at").is_none());
/// ```

use super::membership::{OrganizationMembership, TeamMembership};
use super::metadata::OwnershipMetadata;
use super::payment_plan::PaymentPlan;
use super::reference::UserRef;
use super::EncodeError;
use crate::codec::{decode_array, parse_id, DecodeError, DecodeResultExt, RowSource};
use serde::Serialize;
use uuid::Uuid;

/// User model
///
/// Constructed by decoding one row and left untouched afterwards, except that
/// [`User::prepare_insert`] assigns a fresh identifier before persisting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    #[serde(rename = "user_id")]
    pub id: Uuid,

    #[serde(rename = "organization_memberships", skip_serializing_if = "Vec::is_empty")]
    pub organizations: Vec<OrganizationMembership>,

    #[serde(rename = "team_memberships", skip_serializing_if = "Vec::is_empty")]
    pub teams: Vec<TeamMembership>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_plan: Option<PaymentPlan>,

    #[serde(skip_serializing_if = "OwnershipMetadata::is_empty")]
    pub metadata: OwnershipMetadata,
}

/// Column values for inserting a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserInsert {
    pub user_id: Uuid,
    pub owner_id: Uuid,
}

impl User {
    /// A user with no memberships, plan or metadata
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            organizations: Vec::new(),
            teams: Vec::new(),
            payment_plan: None,
            metadata: OwnershipMetadata::default(),
        }
    }

    /// Decodes a user row
    ///
    /// Required columns: `user_id`, `owner_id`, `organization_memberships`,
    /// `created_at`, `updated_at`, `deleted_at`. Optional columns:
    /// `team_memberships` and `payment_plan`.
    ///
    /// # Errors
    ///
    /// Any failure in any column aborts the whole row; the error names the
    /// column, and the array element where there is one.
    pub fn from_row<R: RowSource + ?Sized>(row: &R) -> Result<Self, DecodeError> {
        let decode = || -> Result<Self, DecodeError> {
            let id = parse_id(&row.text("user_id")?, DecodeError::InvalidUserId)?;

            let organizations = match row.nullable_text("organization_memberships")? {
                Some(array) => decode_array(&array, OrganizationMembership::from_composite)
                    .context("organization_memberships")?,
                None => Vec::new(),
            };

            let teams = match row.optional_text("team_memberships")? {
                Some(array) => decode_array(&array, TeamMembership::from_composite)
                    .context("team_memberships")?,
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
                organizations,
                teams,
                payment_plan,
                metadata,
            })
        };
        decode().context("user")
    }

    pub fn reference(&self) -> UserRef {
        UserRef::new(self.id)
    }

    /// Assigns a fresh identifier and returns the columns an insert needs
    ///
    /// # Errors
    ///
    /// [`EncodeError::MissingOwner`] if the user has no owner. The identifier is
    /// left unchanged in that case.
    pub fn prepare_insert(&mut self) -> Result<UserInsert, EncodeError> {
        let owner_id = self.metadata.owner_id().ok_or(EncodeError::MissingOwner)?;
        self.id = Uuid::new_v4();

        Ok(UserInsert {
            user_id: self.id,
            owner_id,
        })
    }
}
