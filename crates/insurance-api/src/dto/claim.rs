//! Claim DTOs

use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

/// Claim submission request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ClaimRequest {
    #[validate(length(min = 1, max = 128, message = "claim_id is required"))]
    pub claim_id: String,

    #[validate(range(min = 1))]
    pub owner_id: i64,

    #[validate(range(min = 1))]
    pub pet_id: i64,

    pub amount: Decimal,
}

impl ClaimRequest {
    pub fn validate_business_rules(&self) -> Result<(), String> {
        if self.amount <= Decimal::ZERO {
            return Err("Claim amount must be greater than zero".to_string());
        }
        Ok(())
    }
}
