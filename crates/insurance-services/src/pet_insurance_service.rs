//! Pet insurance write flow
//!
//! Saves a pet insurance and then reconciles its billing entry when an owner
//! ID came with the request. The save and the reconciliation are not one
//! transaction: a billing failure is returned to the caller while the saved
//! record stays saved.

use crate::billing_reconciler::BillingReconciler;
use crate::owners::OwnerClient;
use insurance_core::models::{
    NewPetInsurance, PetInsurance, PetInsuranceChanges, INSURANCE_BILLING_TYPE,
};
use insurance_core::traits::PetInsuranceRepository;
use insurance_core::{AppError, AppResult};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Pet insurance CRUD with billing reconciliation
pub struct PetInsuranceService {
    repository: Arc<dyn PetInsuranceRepository>,
    reconciler: Arc<BillingReconciler>,
    owners: Arc<OwnerClient>,
    validate_owner: bool,
}

impl PetInsuranceService {
    /// Create a new service
    ///
    /// # Arguments
    ///
    /// * `repository` - Pet insurance storage
    /// * `reconciler` - Billing reconciliation run after each write
    /// * `owners` - Customers service client
    /// * `validate_owner` - Look the owner up before writing
    pub fn new(
        repository: Arc<dyn PetInsuranceRepository>,
        reconciler: Arc<BillingReconciler>,
        owners: Arc<OwnerClient>,
        validate_owner: bool,
    ) -> Self {
        Self {
            repository,
            reconciler,
            owners,
            validate_owner,
        }
    }

    /// Get the enrollment of a pet
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the pet has no insurance
    pub async fn get(&self, pet_id: i64) -> AppResult<PetInsurance> {
        self.repository
            .find_by_pet_id(pet_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Pet insurance for pet {} not found", pet_id)))
    }

    pub async fn list(&self) -> AppResult<Vec<PetInsurance>> {
        self.repository.list_all().await
    }

    /// Enroll a pet and reconcile its billing
    ///
    /// # Arguments
    ///
    /// * `new` - Enrollment to save
    /// * `owner_id` - Owner charged for the premium; without it billing is skipped
    ///
    /// # Errors
    ///
    /// Storage errors abort before anything is written. Billing errors are
    /// returned after the enrollment has been committed.
    #[instrument(skip(self, new), fields(pet_id = new.pet_id))]
    pub async fn create(
        &self,
        new: NewPetInsurance,
        owner_id: Option<i64>,
    ) -> AppResult<PetInsurance> {
        self.check_owner(owner_id).await?;

        let saved = self.repository.create(&new).await?;
        info!("Pet insurance {} created for pet {}", saved.id, saved.pet_id);

        self.after_save(&saved, owner_id).await?;
        Ok(saved)
    }

    /// Apply a partial update and reconcile billing
    ///
    /// # Errors
    ///
    /// Returns `AppError::NotFound` if the pet has no insurance; billing
    /// errors as for [`create`](Self::create).
    #[instrument(skip(self, changes))]
    pub async fn update(
        &self,
        pet_id: i64,
        changes: PetInsuranceChanges,
        owner_id: Option<i64>,
    ) -> AppResult<PetInsurance> {
        if changes.is_empty() {
            debug!("Update without field changes for pet {}", pet_id);
        }
        self.check_owner(owner_id).await?;

        let saved = self
            .repository
            .update(pet_id, &changes)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Pet insurance for pet {} not found", pet_id)))?;
        info!("Pet insurance for pet {} updated", pet_id);

        self.after_save(&saved, owner_id).await?;
        Ok(saved)
    }

    /// Remove the enrollment of a pet; billing entries are left alone
    pub async fn delete(&self, pet_id: i64) -> AppResult<()> {
        if !self.repository.delete(pet_id).await? {
            return Err(AppError::NotFound(format!(
                "Pet insurance for pet {} not found",
                pet_id
            )));
        }
        info!("Pet insurance for pet {} deleted", pet_id);
        Ok(())
    }

    async fn check_owner(&self, owner_id: Option<i64>) -> AppResult<()> {
        match owner_id {
            Some(owner_id) if self.validate_owner => {
                self.owners.fetch_owner(owner_id).await?;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Post-commit hook
    async fn after_save(&self, saved: &PetInsurance, owner_id: Option<i64>) -> AppResult<()> {
        let Some(owner_id) = owner_id else {
            warn!(
                "No owner_id given for pet {}, billing not generated",
                saved.pet_id
            );
            return Ok(());
        };

        let outcome = self
            .reconciler
            .reconcile(
                saved,
                owner_id,
                INSURANCE_BILLING_TYPE,
                saved.insurance_name.as_deref(),
            )
            .await?;

        info!(
            "Billing reconciled for owner {} pet {}: {:?}",
            owner_id, saved.pet_id, outcome
        );
        Ok(())
    }
}
