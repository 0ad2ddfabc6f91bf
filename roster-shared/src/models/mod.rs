/// Domain models
///
/// Every entity composes an [`metadata::OwnershipMetadata`] block and decodes
/// itself from a row (`from_row`) or from a composite literal
/// (`from_composite`). Encoding to JSON goes through `serde::Serialize`.
///
/// # Models
///
/// - `metadata`: `TimestampSet` and `OwnershipMetadata`
/// - `reference`: identifier-only links (`UserRef`, `OrganizationRef`)
/// - `user`: users and the insert write path
/// - `membership`: user/organization and user/team join rows
/// - `organization`: organizations with embedded memberships
/// - `team`: teams with a capacity limit
/// - `payment_plan`: payment plans
///
/// # Example
///
/// ```
/// use roster_shared::models::metadata::OwnershipMetadata;
///
/// let metadata = OwnershipMetadata::from_composite(
///     r#"("00000000-0000-0000-0000-000000000000","2024-01-01 00:00:00","2024-01-02 00:00:00","")"#,
/// )
/// .unwrap();
///
/// let json = serde_json::to_value(metadata).unwrap();
/// assert_eq!(json["created_at"], "2024-01-01T00:00:00Z");
/// assert!(json.get("deleted_at").is_none());
/// ```

use thiserror::Error;

pub mod membership;
pub mod metadata;
pub mod organization;
pub mod payment_plan;
pub mod reference;
pub mod team;
pub mod user;

pub use membership::{OrganizationMembership, TeamMembership};
pub use metadata::{OwnershipMetadata, TimestampSet};
pub use organization::Organization;
pub use payment_plan::PaymentPlan;
pub use reference::{OrganizationRef, UserRef};
pub use team::Team;
pub use user::{User, UserInsert};

/// Errors preparing an entity for persistence
#[derive(Error, Debug)]
pub enum EncodeError {
    /// Insert needs an owner identifier
    #[error("cannot insert without an owner")]
    MissingOwner,
}
