//! Health endpoint

use crate::dto::HealthResponse;
use actix_web::HttpResponse;

/// GET /health
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse::ok())
}
