//! Insurance handlers
//!
//! HTTP handlers for the insurance catalogue endpoints.

use crate::dto::insurance::{InsuranceRequest, InsuranceResponse};
use crate::dto::ApiResponse;
use actix_web::{web, HttpResponse};
use insurance_core::traits::InsuranceRepository;
use insurance_core::AppError;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// Shared handle on the insurance repository
pub type InsuranceRepo = web::Data<Arc<dyn InsuranceRepository>>;

fn validate_request(req: &InsuranceRequest) -> Result<(), AppError> {
    req.validate().map_err(|e| {
        warn!("Insurance validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    req.validate_business_rules().map_err(|e| {
        warn!("Insurance business validation failed: {}", e);
        AppError::Validation(e)
    })
}

/// List all insurances
///
/// GET /api/v1/insurances
#[instrument(skip(repo))]
pub async fn list_insurances(repo: InsuranceRepo) -> Result<HttpResponse, AppError> {
    debug!("Listing all insurances");

    let insurances = repo.list_all().await?;
    let response_data: Vec<InsuranceResponse> = insurances.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(response_data)))
}

/// Get a single insurance by ID
///
/// GET /api/v1/insurances/{id}
#[instrument(skip(repo))]
pub async fn get_insurance(
    repo: InsuranceRepo,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let insurance_id = path.into_inner();
    debug!(id = insurance_id, "Getting insurance");

    let insurance = repo
        .find_by_id(insurance_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Insurance {} not found", insurance_id)))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(InsuranceResponse::from(insurance))))
}

/// Create a new insurance
///
/// POST /api/v1/insurances
#[instrument(skip(repo, req))]
pub async fn create_insurance(
    repo: InsuranceRepo,
    req: web::Json<InsuranceRequest>,
) -> Result<HttpResponse, AppError> {
    validate_request(&req)?;
    debug!(name = %req.name, "Creating insurance");

    let created = repo.create(&req.into_inner().into_draft()).await?;

    info!(id = created.id, name = %created.name, "Insurance created successfully");

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        InsuranceResponse::from(created),
        "Insurance created successfully",
    )))
}

/// Replace an existing insurance
///
/// PUT /api/v1/insurances/{id}
#[instrument(skip(repo, req))]
pub async fn update_insurance(
    repo: InsuranceRepo,
    path: web::Path<i64>,
    req: web::Json<InsuranceRequest>,
) -> Result<HttpResponse, AppError> {
    let insurance_id = path.into_inner();
    validate_request(&req)?;
    debug!(id = insurance_id, "Updating insurance");

    let updated = repo
        .update(insurance_id, &req.into_inner().into_draft())
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Insurance {} not found", insurance_id)))?;

    info!(id = insurance_id, "Insurance updated successfully");

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        InsuranceResponse::from(updated),
        "Insurance updated successfully",
    )))
}

/// Delete an insurance
///
/// DELETE /api/v1/insurances/{id}
#[instrument(skip(repo))]
pub async fn delete_insurance(
    repo: InsuranceRepo,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let insurance_id = path.into_inner();
    debug!(id = insurance_id, "Deleting insurance");

    if !repo.delete(insurance_id).await? {
        return Err(AppError::NotFound(format!(
            "Insurance {} not found",
            insurance_id
        )));
    }

    info!(id = insurance_id, "Insurance deleted successfully");
    Ok(HttpResponse::NoContent().finish())
}

/// Configure insurance routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/insurances")
            .route("", web::get().to(list_insurances))
            .route("", web::post().to(create_insurance))
            .route("/{id}", web::get().to(get_insurance))
            .route("/{id}", web::put().to(update_insurance))
            .route("/{id}", web::delete().to(delete_insurance)),
    );
}
