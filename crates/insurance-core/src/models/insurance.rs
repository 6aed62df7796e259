//! Insurance catalogue model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An insurance product that pets can be enrolled in
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insurance {
    /// Unique insurance ID
    pub id: i64,

    /// Product name (e.g., "Basic Accident Cover")
    pub name: String,

    /// Optional long description
    pub description: Option<String>,

    /// Optional coverage summary
    pub coverage: Option<String>,

    /// Reference premium
    pub price: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields accepted when creating or replacing an insurance product
#[derive(Debug, Clone, PartialEq)]
pub struct InsuranceDraft {
    pub name: String,
    pub description: Option<String>,
    pub coverage: Option<String>,
    pub price: Decimal,
}
