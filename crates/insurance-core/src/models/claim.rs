//! Insurance claim model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Status every claim is stored with on submission
pub const CLAIM_STATUS_PENDING: &str = "pending";

/// A claim submitted by an owner for one of their pets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub claim_id: String,
    pub owner_id: i64,
    pub pet_id: i64,
    pub amount: Decimal,
    pub status: String,
}

impl Claim {
    pub fn pending(claim_id: String, owner_id: i64, pet_id: i64, amount: Decimal) -> Self {
        Self {
            claim_id,
            owner_id,
            pet_id,
            amount,
            status: CLAIM_STATUS_PENDING.to_string(),
        }
    }
}
