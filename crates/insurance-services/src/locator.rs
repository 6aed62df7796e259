//! Service Locator
//!
//! Turns a logical service name into a base URL. A static URL from
//! configuration always wins; only when none is configured is the service
//! registry consulted. Nothing is cached: every call resolves again.

use insurance_core::config::ServicesConfig;
use insurance_core::models::{ServiceEndpoint, ServiceName};
use insurance_core::traits::ServiceRegistry;
use insurance_core::{AppError, AppResult};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Resolves downstream service endpoints
pub struct ServiceLocator {
    services: ServicesConfig,
    registry: Arc<dyn ServiceRegistry>,
}

impl ServiceLocator {
    /// Create a new locator
    ///
    /// # Arguments
    ///
    /// * `services` - Static endpoint configuration, read once at startup
    /// * `registry` - Fallback registry
    pub fn new(services: ServicesConfig, registry: Arc<dyn ServiceRegistry>) -> Self {
        Self { services, registry }
    }

    /// Resolve `service` to its base URL
    ///
    /// # Returns
    ///
    /// Base URL ending in exactly one `/`
    ///
    /// # Errors
    ///
    /// - `AppError::ServiceResolution` when the registry lists no instance
    /// - `AppError::Discovery` when the registry cannot be queried
    #[instrument(skip(self, service), fields(service = %service))]
    pub async fn resolve(&self, service: &ServiceName) -> AppResult<ServiceEndpoint> {
        if let Some(url) = self.services.static_url(service) {
            let endpoint = ServiceEndpoint::new(url);
            info!("Resolved {} from configuration: {}", service, endpoint);
            return Ok(endpoint);
        }

        let app_name = service.registry_name();
        info!("No static URL for {}, querying registry as {}", service, app_name);

        let instances = self.registry.instances(&app_name).await.map_err(|e| {
            error!("Service discovery failed for {}: {}", app_name, e);
            AppError::Discovery {
                service: service.to_string(),
                message: e.to_string(),
            }
        })?;

        info!("Found {} instance(s) for {}", instances.len(), app_name);

        let instance = instances.first().ok_or_else(|| {
            warn!("No instance found for {}", app_name);
            AppError::ServiceResolution(service.to_string())
        })?;

        let endpoint = instance.endpoint();
        info!("Resolved {} from registry: {}", service, endpoint);
        Ok(endpoint)
    }
}
