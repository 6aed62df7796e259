//! Service registry adapters
//!
//! - `EurekaRegistry` queries a Eureka-compatible REST registry
//! - `FixedRegistry` serves a fixed instance table (tests, registry-less deployments)

use async_trait::async_trait;
use insurance_core::models::ServiceInstance;
use insurance_core::traits::{RegistryError, ServiceRegistry};
use parking_lot::RwLock;
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Eureka `GET /apps/{APP}` payload
#[derive(Debug, Deserialize)]
struct EurekaApplicationEnvelope {
    application: EurekaApplication,
}

#[derive(Debug, Deserialize)]
struct EurekaApplication {
    #[serde(default)]
    instance: OneOrMany<EurekaInstance>,
}

/// Eureka renders a single instance as an object rather than a list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(Vec::new())
    }
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EurekaInstance {
    ip_addr: String,
    port: EurekaPort,
}

#[derive(Debug, Deserialize)]
struct EurekaPort {
    #[serde(rename = "$")]
    value: u16,
}

/// Client for a Eureka-compatible registry
pub struct EurekaRegistry {
    http_client: Client,
    base_url: String,
}

impl EurekaRegistry {
    /// # Arguments
    ///
    /// * `http_client` - Shared downstream client
    /// * `base_url` - Registry root (ej: "http://eureka:8761/eureka")
    pub fn new(http_client: Client, base_url: &str) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn app_url(&self, app_name: &str) -> String {
        format!("{}/apps/{}", self.base_url, app_name)
    }
}

#[async_trait]
impl ServiceRegistry for EurekaRegistry {
    #[instrument(skip(self))]
    async fn instances(&self, app_name: &str) -> Result<Vec<ServiceInstance>, RegistryError> {
        let url = self.app_url(app_name);
        debug!("Registry lookup: {}", url);

        let response = self
            .http_client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| RegistryError::Unreachable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("Application {} is not registered", app_name);
            return Ok(Vec::new());
        }
        if !status.is_success() {
            warn!("Registry HTTP error: status={}", status);
            return Err(RegistryError::Status(status.as_u16()));
        }

        let envelope: EurekaApplicationEnvelope = response
            .json()
            .await
            .map_err(|e| RegistryError::Malformed(e.to_string()))?;

        Ok(envelope
            .application
            .instance
            .into_vec()
            .into_iter()
            .map(|instance| ServiceInstance::new(instance.ip_addr, instance.port.value))
            .collect())
    }
}

/// In-memory registry with a fixed instance table
#[derive(Default)]
pub struct FixedRegistry {
    apps: RwLock<HashMap<String, Vec<ServiceInstance>>>,
}

impl FixedRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `instances` under `app_name` (case-insensitive), replacing any previous list
    pub fn with_instances(self, app_name: &str, instances: Vec<ServiceInstance>) -> Self {
        self.register(app_name, instances);
        self
    }

    pub fn register(&self, app_name: &str, instances: Vec<ServiceInstance>) {
        self.apps.write().insert(app_name.to_uppercase(), instances);
    }
}

#[async_trait]
impl ServiceRegistry for FixedRegistry {
    async fn instances(&self, app_name: &str) -> Result<Vec<ServiceInstance>, RegistryError> {
        Ok(self
            .apps
            .read()
            .get(&app_name.to_uppercase())
            .cloned()
            .unwrap_or_default())
    }
}
