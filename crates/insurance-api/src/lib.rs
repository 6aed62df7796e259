//! API layer for the pet insurance service
//!
//! HTTP handlers for the insurance catalogue, pet insurances and claims.
//! Handlers read their collaborators from `web::Data`:
//!
//! - `Arc<dyn InsuranceRepository>`
//! - `Arc<PetInsuranceService>`
//! - `Arc<ClaimService>`

#![forbid(unsafe_code)]

pub mod dto;
pub mod handlers;

use actix_web::{error::InternalError, web, HttpResponse};

pub use dto::ApiResponse;
pub use handlers::{configure_claims, configure_insurances, configure_pet_insurances};

/// Register every route: `/health` and the `/api/v1` scope
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(handlers::health_check))
        .service(
            web::scope("/api/v1")
                .configure(configure_insurances)
                .configure(configure_pet_insurances)
                .configure(configure_claims),
        );
}

/// JSON body config answering malformed bodies with the API error shape
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(256 * 1024)
        .error_handler(|err, _req| {
            let error_message = err.to_string();
            InternalError::from_response(
                err,
                HttpResponse::BadRequest().json(serde_json::json!({
                    "error": "invalid_body",
                    "message": error_message,
                    "status": 400,
                })),
            )
            .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{http::StatusCode, test, App};
    use insurance_core::traits::InsuranceRepository;
    use insurance_services::memory::InMemoryInsuranceRepository;
    use serde_json::Value;
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_routes_are_mounted() {
        let repo: Arc<dyn InsuranceRepository> = Arc::new(InMemoryInsuranceRepository::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(repo))
                .app_data(json_config())
                .configure(configure_routes),
        )
        .await;

        let req = test::TestRequest::get().uri("/health").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/v1/insurances").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/api/v1/insurances")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "invalid_body");
    }
}
