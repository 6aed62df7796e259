//! Pet Clinic Insurance Service
//!
//! Manages insurance products and pet enrollments, and keeps the billing
//! service in step with every enrollment premium.

use actix_cors::Cors;
use actix_web::{http::header, middleware, web, App, HttpServer};
use insurance_api::{configure_routes, json_config};
use insurance_cache::RedisClaimStore;
use insurance_core::traits::{InsuranceRepository, ServiceRegistry};
use insurance_core::AppConfig;
use insurance_db::{create_pool, run_migrations, PgInsuranceRepository, PgPetInsuranceRepository};
use insurance_services::{
    build_http_client, BillingReconciler, ClaimService, EurekaRegistry, FixedRegistry,
    OwnerClient, PetInsuranceService, ServiceLocator,
};
use std::env;
use std::io;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing/logging
fn init_tracing() {
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "petclinic_insurance={lvl},insurance_api={lvl},insurance_services={lvl},\
             insurance_db={lvl},insurance_cache={lvl},actix_web=info,sqlx=warn",
            lvl = log_level
        ))
    });

    let json_output = env::var("LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);
    if json_output {
        registry
            .with(fmt::layer().json().with_current_span(true))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .init();
    }
}

fn startup_error(context: &str, err: impl std::fmt::Display) -> io::Error {
    io::Error::new(io::ErrorKind::Other, format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_tracing();

    info!(
        "Starting Pet Clinic Insurance Service v{}",
        env!("CARGO_PKG_VERSION")
    );

    let config = AppConfig::load().map_err(|e| startup_error("Invalid configuration", e))?;

    info!("Connecting to database...");
    let pool = create_pool(&config.database.url, Some(config.database.max_connections))
        .await
        .map_err(|e| startup_error("Failed to create database pool", e))?;
    run_migrations(&pool)
        .await
        .map_err(|e| startup_error("Failed to run migrations", e))?;

    let claim_store = RedisClaimStore::new(&config.redis.url)
        .await
        .map_err(|e| startup_error("Failed to connect to Redis", e))?;

    let http_client = build_http_client(&config.services)
        .map_err(|e| startup_error("Failed to build HTTP client", e))?;

    let registry: Arc<dyn ServiceRegistry> = match config.services.eureka_url.as_deref() {
        Some(url) if !url.trim().is_empty() => {
            info!("Service registry: {}", url);
            Arc::new(EurekaRegistry::new(http_client.clone(), url))
        }
        _ => {
            warn!("No service registry configured; only static service URLs will resolve");
            Arc::new(FixedRegistry::new())
        }
    };

    let locator = Arc::new(ServiceLocator::new(config.services.clone(), registry));
    let reconciler = Arc::new(BillingReconciler::new(
        locator.clone(),
        http_client.clone(),
        config.billing.check_policy,
    ));
    let owners = Arc::new(OwnerClient::new(locator, http_client));

    info!(
        "Billing check policy: {:?}, owner validation: {}",
        config.billing.check_policy, config.billing.validate_owner
    );

    let insurances: Arc<dyn InsuranceRepository> = Arc::new(PgInsuranceRepository::new(pool.clone()));
    let pet_insurances = Arc::new(PetInsuranceService::new(
        Arc::new(PgPetInsuranceRepository::new(pool)),
        reconciler,
        owners,
        config.billing.validate_owner,
    ));
    let claims = Arc::new(ClaimService::new(Arc::new(claim_store)));

    // CORS configuration
    let cors_origins = env::var("CORS_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

    let bind_addr = config.server_addr();
    info!(
        "Starting HTTP server on {} with {} workers",
        bind_addr, config.server.workers
    );

    HttpServer::new(move || {
        let cors_origins_inner = cors_origins.clone();
        let cors = Cors::default()
            .allowed_origin_fn(move |origin, _req_head| {
                let origins: Vec<&str> = cors_origins_inner.split(',').collect();
                if let Ok(origin_str) = origin.to_str() {
                    origins.iter().any(|o| o.trim() == origin_str)
                } else {
                    false
                }
            })
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
            .max_age(3600);

        App::new()
            .app_data(web::Data::new(insurances.clone()))
            .app_data(web::Data::new(pet_insurances.clone()))
            .app_data(web::Data::new(claims.clone()))
            .app_data(json_config())
            // Middleware
            .wrap(cors)
            .wrap(TracingLogger::default())
            .wrap(middleware::Compress::default())
            .wrap(middleware::NormalizePath::trim())
            .configure(configure_routes)
    })
    .workers(config.server.workers)
    .bind(&bind_addr)?
    .run()
    .await
}
