//! Domain models for the insurance service
//!
//! This module contains all the core domain models used throughout the application.

pub mod billing;
pub mod claim;
pub mod insurance;
pub mod owner;
pub mod pet_insurance;
pub mod service;

pub use billing::{
    payment_value, BillingKey, BillingRecord, NewBilling, BILLING_STATUS_OPEN,
    INSURANCE_BILLING_TYPE,
};
pub use claim::{Claim, CLAIM_STATUS_PENDING};
pub use insurance::{Insurance, InsuranceDraft};
pub use owner::OwnerRecord;
pub use pet_insurance::{NewPetInsurance, PetInsurance, PetInsuranceChanges};
pub use service::{ServiceEndpoint, ServiceInstance, ServiceName};
