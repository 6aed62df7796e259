//! Billing records as exchanged with the billing service
//!
//! The billing service owns these records. A new record is described by
//! [`NewBilling`]; an existing one is carried as an opaque JSON object so
//! that every field the billing service returns is echoed back on update.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Number, Value};

/// Status of a billing entry that still accepts payment updates
pub const BILLING_STATUS_OPEN: &str = "open";

/// Billing type used for pet insurance premiums
pub const INSURANCE_BILLING_TYPE: &str = "insurance";

/// Conceptual key of a billing entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingKey {
    pub owner_id: i64,
    pub pet_id: i64,
    pub billing_type: String,
}

impl BillingKey {
    /// Lookup path relative to the billing service base URL
    pub fn lookup_path(&self) -> String {
        format!(
            "billings/{}/{}/{}/",
            self.owner_id, self.pet_id, self.billing_type
        )
    }
}

/// Body of the create call
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewBilling {
    pub owner_id: i64,
    #[serde(rename = "type")]
    pub billing_type: String,
    pub type_name: Option<String>,
    pub pet_id: i64,
    #[serde(serialize_with = "serialize_payment")]
    pub payment: Decimal,
    pub status: String,
}

impl NewBilling {
    /// An open billing entry for `key` charging `payment`
    pub fn open(key: &BillingKey, type_name: Option<String>, payment: Decimal) -> Self {
        Self {
            owner_id: key.owner_id,
            billing_type: key.billing_type.clone(),
            type_name,
            pet_id: key.pet_id,
            payment,
            status: BILLING_STATUS_OPEN.to_string(),
        }
    }
}

/// Existing billing entry, kept verbatim
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BillingRecord(Map<String, Value>);

impl BillingRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Identifier assigned by the billing service, rendered for use in a path
    pub fn id(&self) -> Option<String> {
        match self.0.get("id")? {
            Value::Number(n) => Some(n.to_string()),
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<&str> {
        self.0.get("status").and_then(Value::as_str)
    }

    pub fn payment(&self) -> Option<&Value> {
        self.0.get("payment")
    }

    /// Overwrite the payment, leaving every other field untouched
    pub fn set_payment(&mut self, payment: Decimal) {
        self.0.insert("payment".to_string(), payment_value(payment));
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// JSON representation of an amount: an integer when whole, a float otherwise
pub fn payment_value(amount: Decimal) -> Value {
    if amount.fract().is_zero() {
        if let Some(whole) = amount.to_i64() {
            return Value::from(whole);
        }
    }

    amount
        .to_f64()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(amount.to_string()))
}

fn serialize_payment<S: Serializer>(amount: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    payment_value(*amount).serialize(serializer)
}
