//! Claim submission
//!
//! Independent of billing: a failing claim store only fails the claim.

use insurance_core::models::Claim;
use insurance_core::traits::ClaimStore;
use insurance_core::AppResult;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument};

pub struct ClaimService {
    store: Arc<dyn ClaimStore>,
}

impl ClaimService {
    pub fn new(store: Arc<dyn ClaimStore>) -> Self {
        Self { store }
    }

    /// Store a claim as pending and return it
    #[instrument(skip(self, amount))]
    pub async fn submit(
        &self,
        claim_id: String,
        owner_id: i64,
        pet_id: i64,
        amount: Decimal,
    ) -> AppResult<Claim> {
        let claim = Claim::pending(claim_id, owner_id, pet_id, amount);
        self.store.put_claim(&claim).await?;
        info!("Claim {} submitted", claim.claim_id);
        Ok(claim)
    }
}
