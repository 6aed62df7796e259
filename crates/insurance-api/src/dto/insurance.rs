//! Insurance DTOs
//!
//! Request and response types for the insurance catalogue endpoints.

use chrono::{DateTime, Utc};
use insurance_core::models::{Insurance, InsuranceDraft};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Insurance create/replace request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InsuranceRequest {
    /// Product name
    #[validate(length(min = 1, max = 255, message = "Insurance name is required"))]
    pub name: String,

    #[validate(length(max = 2000))]
    pub description: Option<String>,

    /// Free-text coverage summary
    #[validate(length(max = 2000))]
    pub coverage: Option<String>,

    /// Monthly premium
    pub price: Decimal,
}

impl InsuranceRequest {
    /// Validate insurance business rules
    pub fn validate_business_rules(&self) -> Result<(), String> {
        if self.price < Decimal::ZERO {
            return Err("Insurance price cannot be negative".to_string());
        }
        Ok(())
    }

    pub fn into_draft(self) -> InsuranceDraft {
        InsuranceDraft {
            name: self.name,
            description: self.description,
            coverage: self.coverage,
            price: self.price,
        }
    }
}

/// Insurance response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub coverage: Option<String>,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Insurance> for InsuranceResponse {
    fn from(insurance: Insurance) -> Self {
        Self {
            id: insurance.id,
            name: insurance.name,
            description: insurance.description,
            coverage: insurance.coverage,
            price: insurance.price,
            created_at: insurance.created_at,
            updated_at: insurance.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(name: &str, price: Decimal) -> InsuranceRequest {
        InsuranceRequest {
            name: name.to_string(),
            description: None,
            coverage: Some("Accidents and emergencies".to_string()),
            price,
        }
    }

    #[test]
    fn test_insurance_request_validation() {
        assert!(request("Accident", dec!(50)).validate().is_ok());
        assert!(request("", dec!(50)).validate().is_err());
        assert!(request("Accident", dec!(-1)).validate_business_rules().is_err());
        assert!(request("Accident", dec!(0)).validate_business_rules().is_ok());
    }
}
