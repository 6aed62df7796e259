//! Pet insurance handlers
//!
//! Create and update save the record first and then reconcile billing. When
//! reconciliation fails the error is returned even though the record was
//! saved.

use crate::dto::pet_insurance::{
    PetInsuranceCreateRequest, PetInsuranceResponse, PetInsuranceUpdateRequest,
};
use crate::dto::ApiResponse;
use actix_web::{web, HttpResponse};
use insurance_core::AppError;
use insurance_services::PetInsuranceService;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use validator::Validate;

/// List all pet insurances
///
/// GET /api/v1/pet-insurances
#[instrument(skip(service))]
pub async fn list_pet_insurances(
    service: web::Data<Arc<PetInsuranceService>>,
) -> Result<HttpResponse, AppError> {
    debug!("Listing all pet insurances");

    let records = service.list().await?;
    let response_data: Vec<PetInsuranceResponse> = records.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(response_data)))
}

/// Get the insurance of a pet
///
/// GET /api/v1/pet-insurances/{pet_id}
#[instrument(skip(service))]
pub async fn get_pet_insurance(
    service: web::Data<Arc<PetInsuranceService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let pet_id = path.into_inner();
    debug!(pet_id, "Getting pet insurance");

    let record = service.get(pet_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(PetInsuranceResponse::from(record))))
}

/// Enroll a pet
///
/// POST /api/v1/pet-insurances
#[instrument(skip(service, req))]
pub async fn create_pet_insurance(
    service: web::Data<Arc<PetInsuranceService>>,
    req: web::Json<PetInsuranceCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Pet insurance validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;
    req.validate_business_rules().map_err(|e| {
        warn!("Pet insurance business validation failed: {}", e);
        AppError::Validation(e)
    })?;

    let (new, owner_id) = req.into_inner().into_parts();
    debug!(pet_id = new.pet_id, ?owner_id, "Creating pet insurance");

    let created = service.create(new, owner_id).await?;

    info!(pet_id = created.pet_id, "Pet insurance created successfully");

    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        PetInsuranceResponse::from(created),
        "Pet insurance created successfully",
    )))
}

/// Partially update the insurance of a pet
///
/// PUT /api/v1/pet-insurances/{pet_id}
#[instrument(skip(service, req))]
pub async fn update_pet_insurance(
    service: web::Data<Arc<PetInsuranceService>>,
    path: web::Path<i64>,
    req: web::Json<PetInsuranceUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let pet_id = path.into_inner();

    req.validate().map_err(|e| {
        warn!("Pet insurance update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;
    req.validate_business_rules().map_err(AppError::Validation)?;

    let (changes, owner_id) = req.into_inner().into_parts();
    debug!(pet_id, ?owner_id, "Updating pet insurance");

    let updated = service.update(pet_id, changes, owner_id).await?;

    info!(pet_id, "Pet insurance updated successfully");

    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        PetInsuranceResponse::from(updated),
        "Pet insurance updated successfully",
    )))
}

/// Delete the insurance of a pet
///
/// DELETE /api/v1/pet-insurances/{pet_id}
#[instrument(skip(service))]
pub async fn delete_pet_insurance(
    service: web::Data<Arc<PetInsuranceService>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
    let pet_id = path.into_inner();
    service.delete(pet_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Configure pet insurance routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/pet-insurances")
            .route("", web::get().to(list_pet_insurances))
            .route("", web::post().to(create_pet_insurance))
            .route("/{pet_id}", web::get().to(get_pet_insurance))
            .route("/{pet_id}", web::put().to(update_pet_insurance))
            .route("/{pet_id}", web::delete().to(delete_pet_insurance)),
    );
}
