/// Payment plans
///
/// # Schema
///
/// ```sql
/// CREATE TABLE payment_plans (
///     payment_plan_id UUID PRIMARY KEY,
///     name            TEXT NOT NULL,
///     cost            NUMERIC NOT NULL,
///     currency        TEXT NOT NULL,
///     term            TEXT NOT NULL,  -- 'Yearly', 'Monthly', ...
///     owner_id        UUID NOT NULL,
///     created_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at      TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     deleted_at      TIMESTAMPTZ
/// );
/// ```
///
/// Unlike the other entities, a plan encodes its metadata inline: `owner_id`
/// and the timestamps sit next to `name` and `cost` in the same JSON object.

use super::metadata::OwnershipMetadata;
use crate::codec::{
    check_arity, parse_composite_exact, parse_id, parse_number, DecodeError, DecodeResultExt,
    RowSource,
};
use serde::Serialize;
use uuid::Uuid;

/// Fields ahead of the embedded metadata
const OWN_FIELDS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaymentPlan {
    #[serde(rename = "payment_plan_id")]
    pub id: Uuid,

    pub name: String,
    pub cost: f64,
    pub currency: String,

    /// Billing period, e.g. "Yearly" or "Monthly"
    pub term: String,

    #[serde(flatten)]
    pub metadata: OwnershipMetadata,
}

impl PaymentPlan {
    /// Number of fields in a `payment_plans` composite
    pub const ARITY: usize = OWN_FIELDS + OwnershipMetadata::ARITY;

    pub fn from_composite(input: &str) -> Result<Self, DecodeError> {
        let fields = parse_composite_exact(input, Self::ARITY)?;
        Self::from_fields(&fields)
    }

    pub fn from_fields<S: AsRef<str>>(fields: &[S]) -> Result<Self, DecodeError> {
        check_arity(fields, Self::ARITY)?;

        let id = parse_id(fields[0].as_ref(), DecodeError::InvalidPaymentPlanId)?;
        let cost = parse_number("cost", fields[2].as_ref())?;
        let metadata = OwnershipMetadata::from_fields(&fields[OWN_FIELDS..]).context("metadata")?;

        Ok(Self {
            id,
            name: fields[1].as_ref().to_string(),
            cost,
            currency: fields[3].as_ref().to_string(),
            term: fields[4].as_ref().to_string(),
            metadata,
        })
    }

    /// Decodes a `payment_plans` table row
    pub fn from_row<R: RowSource + ?Sized>(row: &R) -> Result<Self, DecodeError> {
        let decode = || -> Result<Self, DecodeError> {
            let id = parse_id(&row.text("payment_plan_id")?, DecodeError::InvalidPaymentPlanId)?;
            let cost = parse_number("cost", &row.text("cost")?)?;
            let metadata = OwnershipMetadata::from_row(row).context("metadata")?;

            Ok(Self {
                id,
                name: row.text("name")?.into_owned(),
                cost,
                currency: row.text("currency")?.into_owned(),
                term: row.text("term")?.into_owned(),
                metadata,
            })
        };
        decode().context("payment_plan")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{Cell, CellRow};
    use serde_json::json;

    const PLAN: &str = "44444444-4444-4444-4444-444444444444";
    const OWNER: &str = "33333333-3333-3333-3333-333333333333";

    #[test]
    fn test_from_composite() {
        let input = format!(
            r#"({PLAN},"Gold, yearly",99.5,USD,Yearly,{OWNER},"2024-01-01 00:00:00+00","2024-01-01 00:00:00+00",)"#
        );
        let plan = PaymentPlan::from_composite(&input).unwrap();

        assert_eq!(plan.id.to_string(), PLAN);
        assert_eq!(plan.name, "Gold, yearly");
        assert_eq!(plan.cost, 99.5);
        assert_eq!(plan.currency, "USD");
        assert_eq!(plan.term, "Yearly");
    }

    #[test]
    fn test_invalid_cost() {
        let input = format!(
            r#"({PLAN},Gold,free,USD,Yearly,{OWNER},"2024-01-01 00:00:00","2024-01-01 00:00:00",)"#
        );
        let err = PaymentPlan::from_composite(&input).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidNumber { field: "cost", .. }));
    }

    #[test]
    fn test_invalid_id() {
        let input = format!(
            r#"(,Gold,1,USD,Yearly,{OWNER},"2024-01-01 00:00:00","2024-01-01 00:00:00",)"#
        );
        let err = PaymentPlan::from_composite(&input).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidPaymentPlanId(_)));
    }

    #[test]
    fn test_from_row() {
        let row = CellRow::new()
            .with("payment_plan_id", PLAN)
            .with("name", "Basic")
            .with("cost", "9.99")
            .with("currency", "EUR")
            .with("term", "Monthly")
            .with("owner_id", OWNER)
            .with("created_at", "2024-01-01 00:00:00+00")
            .with("updated_at", "2024-01-01 00:00:00+00")
            .with("deleted_at", Cell::Null);

        let plan = PaymentPlan::from_row(&row).unwrap();
        assert_eq!(plan.cost, 9.99);
        assert_eq!(plan.metadata.owner_id().unwrap().to_string(), OWNER);
    }

    #[test]
    fn test_metadata_is_flattened() {
        let input = format!(
            r#"({PLAN},Gold,10,USD,Monthly,{OWNER},"2024-01-01 00:00:00","2024-01-02 00:00:00",)"#
        );
        let plan = PaymentPlan::from_composite(&input).unwrap();

        assert_eq!(
            serde_json::to_value(&plan).unwrap(),
            json!({
                "payment_plan_id": PLAN,
                "name": "Gold",
                "cost": 10.0,
                "currency": "USD",
                "term": "Monthly",
                "owner_id": OWNER,
                "created_at": "2024-01-01T00:00:00Z",
                "updated_at": "2024-01-02T00:00:00Z",
            })
        );
    }
}
