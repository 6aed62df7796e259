//! Pet insurance model
//!
//! Links a pet to an insurance product at a given premium. Records are
//! addressed by `pet_id`, which is unique.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A pet's enrollment in an insurance product
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PetInsurance {
    /// Unique record ID
    pub id: i64,

    /// Pet identifier (owned by the pets domain)
    pub pet_id: i64,

    /// Insurance product the pet is enrolled in
    pub insurance_id: i64,

    /// Display name of the insurance product, used as billing type name
    pub insurance_name: Option<String>,

    /// Premium charged for this pet
    pub price: Decimal,

    /// Coverage start date
    pub start_date: NaiveDate,

    /// Coverage end date (open-ended when absent)
    pub end_date: Option<NaiveDate>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to enroll a pet
#[derive(Debug, Clone, PartialEq)]
pub struct NewPetInsurance {
    pub pet_id: i64,
    pub insurance_id: i64,
    pub insurance_name: Option<String>,
    pub price: Decimal,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
}

/// Partial update of a pet insurance; `None` keeps the stored value
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PetInsuranceChanges {
    pub insurance_id: Option<i64>,
    pub insurance_name: Option<String>,
    pub price: Option<Decimal>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl PetInsuranceChanges {
    /// Whether the update carries no field at all
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Apply the changes on top of an existing record
    pub fn apply_to(&self, record: &mut PetInsurance) {
        if let Some(insurance_id) = self.insurance_id {
            record.insurance_id = insurance_id;
        }
        if let Some(ref name) = self.insurance_name {
            record.insurance_name = Some(name.clone());
        }
        if let Some(price) = self.price {
            record.price = price;
        }
        if let Some(start_date) = self.start_date {
            record.start_date = start_date;
        }
        if let Some(end_date) = self.end_date {
            record.end_date = Some(end_date);
        }
    }
}
