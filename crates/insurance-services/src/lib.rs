//! Downstream orchestration for the pet insurance service
//!
//! This crate resolves the customers and billing services and keeps the
//! billing entry of every pet insurance in step with its premium.
//!
//! # Architecture
//!
//! - Every collaborator sits behind a trait or an `Arc` so it can be swapped in tests
//! - Endpoints are resolved per call and never cached
//! - All downstream calls are sequential and instrumented with tracing
//! - Errors propagate as `AppError`; nothing is retried
//!
//! # Services
//!
//! - `ServiceLocator` - Static URL or registry lookup for a logical service name
//! - `EurekaRegistry` / `FixedRegistry` - Registry adapters
//! - `OwnerClient` - Owner lookup in the customers service
//! - `BillingReconciler` - Create-or-update of the open billing entry
//! - `PetInsuranceService` - Pet insurance writes followed by reconciliation
//! - `ClaimService` - Claim submission to the claim store

pub mod billing_reconciler;
pub mod claims;
pub mod discovery;
pub mod http_client;
pub mod locator;
pub mod memory;
pub mod owners;
pub mod pet_insurance_service;

#[cfg(test)]
mod test_support;

pub use billing_reconciler::{BillingReconciler, ReconcileOutcome};
pub use claims::ClaimService;
pub use discovery::{EurekaRegistry, FixedRegistry};
pub use http_client::build_http_client;
pub use locator::ServiceLocator;
pub use owners::OwnerClient;
pub use pet_insurance_service::PetInsuranceService;
