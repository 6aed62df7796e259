//! Owner lookup against the customers service

use crate::http_client::{malformed_response, transport_error};
use crate::locator::ServiceLocator;
use insurance_core::models::{OwnerRecord, ServiceName};
use insurance_core::{AppError, AppResult};
use reqwest::{Client, StatusCode};
use std::sync::Arc;
use tracing::{error, info, instrument};

/// Fetches owner records from the customers service
pub struct OwnerClient {
    locator: Arc<ServiceLocator>,
    http_client: Client,
}

impl OwnerClient {
    pub fn new(locator: Arc<ServiceLocator>, http_client: Client) -> Self {
        Self {
            locator,
            http_client,
        }
    }

    /// Fetch the owner record for `owner_id`
    ///
    /// The owner ID is attached to the span as `customer.id` before any
    /// I/O, so it is present even when the call fails.
    ///
    /// # Errors
    ///
    /// - `AppError::OwnerNotFound` on any non-200 status
    /// - `AppError::Transport` on connection failure, timeout or an undecodable body
    /// - resolution errors from the locator
    #[instrument(skip(self), fields(customer.id = owner_id))]
    pub async fn fetch_owner(&self, owner_id: i64) -> AppResult<OwnerRecord> {
        let endpoint = self.locator.resolve(&ServiceName::Customers).await?;
        let url = endpoint.url(&format!("owners/{}", owner_id));
        info!("Fetching owner info from: {}", url);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let status = response.status();
        info!("Owner info response: {} - {}", url, status);

        if status != StatusCode::OK {
            error!("Owner {} not found: status={}", owner_id, status);
            return Err(AppError::OwnerNotFound(owner_id.to_string()));
        }

        response
            .json::<OwnerRecord>()
            .await
            .map_err(|e| malformed_response(&url, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::FixedRegistry;
    use crate::test_support::CapturingLayer;
    use httpmock::prelude::*;
    use insurance_core::config::ServicesConfig;
    use serde_json::json;

    fn client_for(customers_url: &str) -> OwnerClient {
        let services = ServicesConfig {
            customers_url: Some(customers_url.to_string()),
            ..Default::default()
        };
        let locator = Arc::new(ServiceLocator::new(services, Arc::new(FixedRegistry::new())));
        OwnerClient::new(locator, Client::new())
    }

    #[tokio::test]
    async fn test_fetch_owner_passes_record_through() {
        let server = MockServer::start_async().await;
        let owner = server
            .mock_async(|when, then| {
                when.method(GET).path("/owners/3");
                then.status(200).json_body(json!({
                    "id": 3,
                    "first_name": "Eduardo",
                    "last_name": "Rodriquez",
                    "pets": [{"id": 11, "name": "Jewel"}]
                }));
            })
            .await;

        let record = client_for(&server.base_url()).fetch_owner(3).await.unwrap();

        owner.assert_async().await;
        assert_eq!(record.get("first_name"), Some(&json!("Eduardo")));
        assert_eq!(record.get("pets"), Some(&json!([{"id": 11, "name": "Jewel"}])));
    }

    #[tokio::test]
    async fn test_non_200_is_owner_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/owners/404");
                then.status(404);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/owners/500");
                then.status(500);
            })
            .await;

        let client = client_for(&format!("{}/", server.base_url()));

        assert!(matches!(
            client.fetch_owner(404).await,
            Err(AppError::OwnerNotFound(ref id)) if id == "404"
        ));
        assert!(matches!(
            client.fetch_owner(500).await,
            Err(AppError::OwnerNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_transport_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/owners/3");
                then.status(200).body("not json");
            })
            .await;

        let result = client_for(&server.base_url()).fetch_owner(3).await;

        assert!(matches!(result, Err(AppError::Transport { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_customers_service_is_transport_error() {
        let result = client_for("http://127.0.0.1:9").fetch_owner(3).await;

        assert!(matches!(
            result,
            Err(AppError::Transport { ref url, .. }) if url == "http://127.0.0.1:9/owners/3"
        ));
    }

    #[tokio::test]
    async fn test_unresolvable_customers_service() {
        let logs = CapturingLayer::default();
        let _guard = logs.install();
        let locator = Arc::new(ServiceLocator::new(
            ServicesConfig::default(),
            Arc::new(FixedRegistry::new()),
        ));
        let client = OwnerClient::new(locator, Client::new());

        assert!(matches!(
            client.fetch_owner(42).await,
            Err(AppError::ServiceResolution(ref name)) if name == "customers-service"
        ));

        let span = logs.span("fetch_owner").expect("fetch_owner span");
        assert_eq!(span.field("customer.id"), Some("42"));
    }

    #[tokio::test]
    async fn test_customer_id_recorded_on_transport_failure() {
        let logs = CapturingLayer::default();
        let _guard = logs.install();

        let result = client_for("http://127.0.0.1:9").fetch_owner(7).await;

        assert!(matches!(result, Err(AppError::Transport { .. })));
        let span = logs.span("fetch_owner").expect("fetch_owner span");
        assert_eq!(span.field("customer.id"), Some("7"));
    }
}
