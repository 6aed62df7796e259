//! Pet insurance DTOs
//!
//! `owner_id` rides along on create and update to drive billing; it is
//! never stored with the pet insurance.

use chrono::{DateTime, NaiveDate, Utc};
use insurance_core::models::{NewPetInsurance, PetInsurance, PetInsuranceChanges};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Pet insurance creation request
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PetInsuranceCreateRequest {
    #[validate(range(min = 1, message = "pet_id must be positive"))]
    pub pet_id: i64,

    #[validate(range(min = 1, message = "insurance_id must be positive"))]
    pub insurance_id: i64,

    /// Product name, sent to billing as the type name
    #[validate(length(min = 1, max = 255))]
    pub insurance_name: Option<String>,

    pub price: Decimal,

    pub start_date: NaiveDate,

    pub end_date: Option<NaiveDate>,

    /// Owner charged for the premium; billing is skipped without it
    #[validate(range(min = 1, message = "owner_id must be positive"))]
    pub owner_id: Option<i64>,
}

impl PetInsuranceCreateRequest {
    /// Validate pet insurance business rules
    pub fn validate_business_rules(&self) -> Result<(), String> {
        check_price(Some(self.price))?;
        check_dates(Some(self.start_date), self.end_date)
    }

    /// Split into the record to save and the owner ID
    pub fn into_parts(self) -> (NewPetInsurance, Option<i64>) {
        (
            NewPetInsurance {
                pet_id: self.pet_id,
                insurance_id: self.insurance_id,
                insurance_name: self.insurance_name,
                price: self.price,
                start_date: self.start_date,
                end_date: self.end_date,
            },
            self.owner_id,
        )
    }
}

/// Pet insurance partial update request
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PetInsuranceUpdateRequest {
    #[validate(range(min = 1, message = "insurance_id must be positive"))]
    pub insurance_id: Option<i64>,

    #[validate(length(min = 1, max = 255))]
    pub insurance_name: Option<String>,

    pub price: Option<Decimal>,

    pub start_date: Option<NaiveDate>,

    pub end_date: Option<NaiveDate>,

    #[validate(range(min = 1, message = "owner_id must be positive"))]
    pub owner_id: Option<i64>,
}

impl PetInsuranceUpdateRequest {
    /// Validate the fields present in the request
    pub fn validate_business_rules(&self) -> Result<(), String> {
        check_price(self.price)?;
        check_dates(self.start_date, self.end_date)
    }

    pub fn into_parts(self) -> (PetInsuranceChanges, Option<i64>) {
        (
            PetInsuranceChanges {
                insurance_id: self.insurance_id,
                insurance_name: self.insurance_name,
                price: self.price,
                start_date: self.start_date,
                end_date: self.end_date,
            },
            self.owner_id,
        )
    }
}

fn check_price(price: Option<Decimal>) -> Result<(), String> {
    match price {
        Some(price) if price < Decimal::ZERO => Err("Price cannot be negative".to_string()),
        _ => Ok(()),
    }
}

fn check_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<(), String> {
    match (start, end) {
        (Some(start), Some(end)) if end < start => {
            Err("end_date cannot be before start_date".to_string())
        }
        _ => Ok(()),
    }
}

/// Pet insurance response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PetInsuranceResponse {
    pub id: i64,
    pub pet_id: i64,
    pub insurance_id: i64,
    pub insurance_name: Option<String>,
    pub price: Decimal,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PetInsurance> for PetInsuranceResponse {
    fn from(record: PetInsurance) -> Self {
        Self {
            id: record.id,
            pet_id: record.pet_id,
            insurance_id: record.insurance_id,
            insurance_name: record.insurance_name,
            price: record.price,
            start_date: record.start_date,
            end_date: record.end_date,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
