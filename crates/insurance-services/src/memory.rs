//! In-memory store implementations
//!
//! Used by tests that do not need PostgreSQL or Redis. They honour the same
//! contracts as the real stores: pet IDs are unique and updates are partial.

use async_trait::async_trait;
use chrono::Utc;
use insurance_core::models::{
    Claim, Insurance, InsuranceDraft, NewPetInsurance, PetInsurance, PetInsuranceChanges,
};
use insurance_core::traits::{ClaimStore, InsuranceRepository, PetInsuranceRepository};
use insurance_core::{AppError, AppResult};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};

/// Insurance catalogue kept in a map
#[derive(Default)]
pub struct InMemoryInsuranceRepository {
    rows: Mutex<BTreeMap<i64, Insurance>>,
    next_id: AtomicI64,
}

impl InMemoryInsuranceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InsuranceRepository for InMemoryInsuranceRepository {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Insurance>> {
        Ok(self.rows.lock().get(&id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<Insurance>> {
        Ok(self.rows.lock().values().cloned().collect())
    }

    async fn create(&self, draft: &InsuranceDraft) -> AppResult<Insurance> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let insurance = Insurance {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            coverage: draft.coverage.clone(),
            price: draft.price,
            created_at: now,
            updated_at: now,
        };
        self.rows.lock().insert(id, insurance.clone());
        Ok(insurance)
    }

    async fn update(&self, id: i64, draft: &InsuranceDraft) -> AppResult<Option<Insurance>> {
        let mut rows = self.rows.lock();
        Ok(rows.get_mut(&id).map(|insurance| {
            insurance.name = draft.name.clone();
            insurance.description = draft.description.clone();
            insurance.coverage = draft.coverage.clone();
            insurance.price = draft.price;
            insurance.updated_at = Utc::now();
            insurance.clone()
        }))
    }

    async fn delete(&self, id: i64) -> AppResult<bool> {
        Ok(self.rows.lock().remove(&id).is_some())
    }
}

/// Pet enrollments kept in a map keyed by pet ID
#[derive(Default)]
pub struct InMemoryPetInsuranceRepository {
    rows: Mutex<BTreeMap<i64, PetInsurance>>,
    next_id: AtomicI64,
}

impl InMemoryPetInsuranceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored enrollments
    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }
}

#[async_trait]
impl PetInsuranceRepository for InMemoryPetInsuranceRepository {
    async fn find_by_pet_id(&self, pet_id: i64) -> AppResult<Option<PetInsurance>> {
        Ok(self.rows.lock().get(&pet_id).cloned())
    }

    async fn list_all(&self) -> AppResult<Vec<PetInsurance>> {
        Ok(self.rows.lock().values().cloned().collect())
    }

    async fn create(&self, new: &NewPetInsurance) -> AppResult<PetInsurance> {
        let mut rows = self.rows.lock();
        if rows.contains_key(&new.pet_id) {
            return Err(AppError::AlreadyExists(format!(
                "Pet {} already has an insurance",
                new.pet_id
            )));
        }

        let now = Utc::now();
        let record = PetInsurance {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            pet_id: new.pet_id,
            insurance_id: new.insurance_id,
            insurance_name: new.insurance_name.clone(),
            price: new.price,
            start_date: new.start_date,
            end_date: new.end_date,
            created_at: now,
            updated_at: now,
        };
        rows.insert(new.pet_id, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        pet_id: i64,
        changes: &PetInsuranceChanges,
    ) -> AppResult<Option<PetInsurance>> {
        let mut rows = self.rows.lock();
        Ok(rows.get_mut(&pet_id).map(|record| {
            changes.apply_to(record);
            record.updated_at = Utc::now();
            record.clone()
        }))
    }

    async fn delete(&self, pet_id: i64) -> AppResult<bool> {
        Ok(self.rows.lock().remove(&pet_id).is_some())
    }
}

/// Claim store kept in a map keyed by claim ID
#[derive(Default)]
pub struct InMemoryClaimStore {
    claims: Mutex<HashMap<String, Claim>>,
}

impl InMemoryClaimStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, claim_id: &str) -> Option<Claim> {
        self.claims.lock().get(claim_id).cloned()
    }
}

#[async_trait]
impl ClaimStore for InMemoryClaimStore {
    async fn put_claim(&self, claim: &Claim) -> AppResult<()> {
        self.claims
            .lock()
            .insert(claim.claim_id.clone(), claim.clone());
        Ok(())
    }
}
