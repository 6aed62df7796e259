//! Claim handlers

use crate::dto::claim::ClaimRequest;
use crate::dto::ApiResponse;
use actix_web::{web, HttpResponse};
use insurance_core::AppError;
use insurance_services::ClaimService;
use std::sync::Arc;
use tracing::{instrument, warn};
use validator::Validate;

/// Submit a claim
///
/// POST /api/v1/claims
#[instrument(skip(service, req), fields(claim_id = %req.claim_id))]
pub async fn create_claim(
    service: web::Data<Arc<ClaimService>>,
    req: web::Json<ClaimRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Claim validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;
    req.validate_business_rules().map_err(AppError::Validation)?;

    let ClaimRequest {
        claim_id,
        owner_id,
        pet_id,
        amount,
    } = req.into_inner();
    let claim = service.submit(claim_id, owner_id, pet_id, amount).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(claim)))
}

/// Configure claim routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/claims", web::post().to(create_claim));
}
