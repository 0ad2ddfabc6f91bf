/// Reference-by-identifier types
///
/// Cross-entity links that are stored as a bare identifier. They never carry a
/// hydrated record, so decoding an owner or a parent organization cannot recurse
/// into the full entity graph.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Weak reference to a user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserRef {
    #[serde(rename = "user_id")]
    pub id: Uuid,
}

impl UserRef {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

/// Weak reference to an organization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganizationRef {
    #[serde(rename = "organization_id")]
    pub id: Uuid,
}

impl OrganizationRef {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}
