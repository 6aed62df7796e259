//! Common traits for repositories and external collaborators
//!
//! Defines the seams between the billing orchestration and the things it
//! talks to: the insurance store, the service registry and the claim store.

use crate::error::AppError;
use crate::models::{
    Claim, Insurance, InsuranceDraft, NewPetInsurance, PetInsurance, PetInsuranceChanges,
    ServiceInstance,
};
use async_trait::async_trait;
use thiserror::Error;

/// Insurance catalogue repository
#[async_trait]
pub trait InsuranceRepository: Send + Sync {
    /// Find insurance by ID
    async fn find_by_id(&self, id: i64) -> Result<Option<Insurance>, AppError>;

    /// List every insurance product
    async fn list_all(&self) -> Result<Vec<Insurance>, AppError>;

    /// Create a new insurance product
    async fn create(&self, draft: &InsuranceDraft) -> Result<Insurance, AppError>;

    /// Replace an existing product; `None` when it does not exist
    async fn update(&self, id: i64, draft: &InsuranceDraft)
        -> Result<Option<Insurance>, AppError>;

    /// Delete by ID, returning whether a row was removed
    async fn delete(&self, id: i64) -> Result<bool, AppError>;
}

/// Pet insurance repository, addressed by pet ID
#[async_trait]
pub trait PetInsuranceRepository: Send + Sync {
    /// Find the enrollment of a pet
    async fn find_by_pet_id(&self, pet_id: i64) -> Result<Option<PetInsurance>, AppError>;

    /// List every enrollment
    async fn list_all(&self) -> Result<Vec<PetInsurance>, AppError>;

    /// Insert a new enrollment
    async fn create(&self, new: &NewPetInsurance) -> Result<PetInsurance, AppError>;

    /// Apply a partial update; `None` when the pet has no enrollment
    async fn update(
        &self,
        pet_id: i64,
        changes: &PetInsuranceChanges,
    ) -> Result<Option<PetInsurance>, AppError>;

    /// Delete by pet ID, returning whether a row was removed
    async fn delete(&self, pet_id: i64) -> Result<bool, AppError>;
}

/// Failure talking to the service registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry unreachable: {0}")]
    Unreachable(String),

    #[error("registry returned status {0}")]
    Status(u16),

    #[error("malformed registry response: {0}")]
    Malformed(String),
}

/// Directory of running service instances
///
/// Implementations must return instances in the registry's own order.
#[async_trait]
pub trait ServiceRegistry: Send + Sync {
    /// Instances registered under `app_name` (already upper-cased)
    async fn instances(&self, app_name: &str) -> Result<Vec<ServiceInstance>, RegistryError>;
}

/// Key-value store receiving submitted claims
#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// Persist a claim, overwriting any claim with the same ID
    async fn put_claim(&self, claim: &Claim) -> Result<(), AppError>;
}
