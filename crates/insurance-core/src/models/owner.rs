//! Owner data fetched from the customers service
//!
//! The shape belongs to the customers service, so the record is passed
//! through unmodified.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Opaque owner record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerRecord(Map<String, Value>);

impl OwnerRecord {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}
