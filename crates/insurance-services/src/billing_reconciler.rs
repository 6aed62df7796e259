//! Billing Reconciler
//!
//! Keeps one open billing entry per (owner, pet, billing type) in step with a
//! pet insurance premium. After every committed write it:
//!
//! 1. Resolves `billing-service` through the [`ServiceLocator`]
//! 2. Checks `GET billings/{owner}/{pet}/{type}/` for an open entry
//! 3. Creates one with `POST billings/` or re-submits the existing one with
//!    the new payment via `PUT billings/{id}/`
//!
//! The check and the write are two separate requests. Two reconciliations
//! for the same key running at once can both see "absent" and both create;
//! uniqueness is left to the billing service. Nothing is retried and
//! nothing is compensated: the first failure is returned to the caller.

use crate::http_client::{malformed_response, transport_error};
use crate::locator::ServiceLocator;
use insurance_core::config::CheckPolicy;
use insurance_core::models::{
    BillingKey, BillingRecord, NewBilling, PetInsurance, ServiceEndpoint, ServiceName,
    BILLING_STATUS_OPEN,
};
use insurance_core::{AppError, AppResult};
use reqwest::{Client, StatusCode};
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// What a reconciliation did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// A new open billing entry was created
    Created,
    /// The existing entry with this ID got the new payment
    Updated { billing_id: String },
}

/// Create-or-update of billing entries
pub struct BillingReconciler {
    locator: Arc<ServiceLocator>,
    http_client: Client,
    check_policy: CheckPolicy,
}

impl BillingReconciler {
    /// Create a new reconciler
    ///
    /// # Arguments
    ///
    /// * `locator` - Resolves the billing service on every call
    /// * `http_client` - Shared downstream client
    /// * `check_policy` - How a non-200 existence check is read
    pub fn new(locator: Arc<ServiceLocator>, http_client: Client, check_policy: CheckPolicy) -> Self {
        Self {
            locator,
            http_client,
            check_policy,
        }
    }

    /// Reconcile the billing entry of a saved pet insurance
    ///
    /// # Arguments
    ///
    /// * `pet_insurance` - The record as committed
    /// * `owner_id` - Owner charged for the pet
    /// * `billing_type` - Billing type key (ej: "insurance")
    /// * `billing_type_name` - Display name sent on creation
    ///
    /// # Errors
    ///
    /// - resolution errors from the locator
    /// - `AppError::Transport` when any call fails at transport level
    /// - `AppError::BillingCheckFailed` when the check fails and the policy forbids creating
    /// - `AppError::BillingRejected` when the create or update answers non-2xx
    #[instrument(
        skip(self, pet_insurance, billing_type_name),
        fields(pet_id = pet_insurance.pet_id)
    )]
    pub async fn reconcile(
        &self,
        pet_insurance: &PetInsurance,
        owner_id: i64,
        billing_type: &str,
        billing_type_name: Option<&str>,
    ) -> AppResult<ReconcileOutcome> {
        let endpoint = self.locator.resolve(&ServiceName::Billing).await?;
        let key = BillingKey {
            owner_id,
            pet_id: pet_insurance.pet_id,
            billing_type: billing_type.to_string(),
        };

        let check_url = endpoint.url(&key.lookup_path());
        let response = self
            .http_client
            .get(&check_url)
            .send()
            .await
            .map_err(|e| transport_error(&check_url, e))?;

        let status = response.status();
        info!("Billing check: {} - {}", check_url, status);

        if status == StatusCode::OK {
            let existing = response
                .json::<BillingRecord>()
                .await
                .map_err(|e| malformed_response(&check_url, e))?;
            return self
                .update_billing(&endpoint, existing, pet_insurance.price, &check_url)
                .await;
        }

        match self.check_policy {
            CheckPolicy::CreateOnAnyFailure => {}
            CheckPolicy::CreateOnNotFound if status == StatusCode::NOT_FOUND => {}
            CheckPolicy::CreateOnNotFound => {
                error!("Billing check failed: {} - {}", check_url, status);
                return Err(AppError::BillingCheckFailed {
                    url: check_url,
                    status: status.as_u16(),
                });
            }
        }

        let new_billing = NewBilling::open(
            &key,
            billing_type_name.map(str::to_string),
            pet_insurance.price,
        );
        self.create_billing(&endpoint, &new_billing).await
    }

    async fn create_billing(
        &self,
        endpoint: &ServiceEndpoint,
        new_billing: &NewBilling,
    ) -> AppResult<ReconcileOutcome> {
        let url = endpoint.url("billings/");
        let response = self
            .http_client
            .post(&url)
            .json(new_billing)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let status = response.status();
        info!("Billing create: {} - {}", url, status);

        if !status.is_success() {
            error!("Billing service rejected create: {} - {}", url, status);
            return Err(AppError::BillingRejected {
                url,
                status: status.as_u16(),
            });
        }

        Ok(ReconcileOutcome::Created)
    }

    async fn update_billing(
        &self,
        endpoint: &ServiceEndpoint,
        mut record: BillingRecord,
        payment: Decimal,
        check_url: &str,
    ) -> AppResult<ReconcileOutcome> {
        let billing_id = record
            .id()
            .ok_or_else(|| malformed_response(check_url, "billing record has no id"))?;

        if record.status().is_some_and(|status| status != BILLING_STATUS_OPEN) {
            warn!("Updating billing {} with status {:?}", billing_id, record.status());
        }
        record.set_payment(payment);

        let url = endpoint.url(&format!("billings/{}/", billing_id));
        let response = self
            .http_client
            .put(&url)
            .json(&record)
            .send()
            .await
            .map_err(|e| transport_error(&url, e))?;

        let status = response.status();
        info!("Billing update: {} - {}", url, status);

        if !status.is_success() {
            error!("Billing service rejected update: {} - {}", url, status);
            return Err(AppError::BillingRejected {
                url,
                status: status.as_u16(),
            });
        }

        Ok(ReconcileOutcome::Updated { billing_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::FixedRegistry;
    use chrono::{NaiveDate, Utc};
    use httpmock::prelude::*;
    use insurance_core::config::ServicesConfig;
    use insurance_core::models::ServiceInstance;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn pet_insurance(pet_id: i64, price: Decimal) -> PetInsurance {
        PetInsurance {
            id: 1,
            pet_id,
            insurance_id: 2,
            insurance_name: Some("Accident".to_string()),
            price,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn reconciler(billing_url: &str, policy: CheckPolicy) -> BillingReconciler {
        let services = ServicesConfig {
            billing_url: Some(billing_url.to_string()),
            ..Default::default()
        };
        let locator = Arc::new(ServiceLocator::new(services, Arc::new(FixedRegistry::new())));
        BillingReconciler::new(locator, Client::new(), policy)
    }

    #[tokio::test]
    async fn test_absent_billing_is_created_open() {
        let server = MockServer::start_async().await;
        let check = server
            .mock_async(|when, then| {
                when.method(GET).path("/billings/3/11/insurance/");
                then.status(404);
            })
            .await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST).path("/billings/").json_body(json!({
                    "owner_id": 3,
                    "type": "insurance",
                    "type_name": "Accident",
                    "pet_id": 11,
                    "payment": 50,
                    "status": "open"
                }));
                then.status(201).json_body(json!({"id": 21}));
            })
            .await;
        let update = server
            .mock_async(|when, then| {
                when.method(PUT);
                then.status(200);
            })
            .await;

        let outcome = reconciler(&server.base_url(), CheckPolicy::CreateOnAnyFailure)
            .reconcile(&pet_insurance(11, dec!(50)), 3, "insurance", Some("Accident"))
            .await
            .unwrap();

        assert_eq!(outcome, ReconcileOutcome::Created);
        check.assert_async().await;
        create.assert_hits_async(1).await;
        update.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_any_failed_check_creates_by_default() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/billings/3/11/insurance/");
                then.status(503);
            })
            .await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST).path("/billings/");
                then.status(201);
            })
            .await;

        let outcome = reconciler(&server.base_url(), CheckPolicy::CreateOnAnyFailure)
            .reconcile(&pet_insurance(11, dec!(50)), 3, "insurance", None)
            .await
            .unwrap();

        assert_eq!(outcome, ReconcileOutcome::Created);
        create.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_existing_billing_keeps_fields_and_gets_new_payment() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/billings/3/11/insurance/");
                then.status(200).json_body(json!({
                    "id": 7,
                    "owner_id": 3,
                    "pet_id": 11,
                    "type": "insurance",
                    "type_name": "Accident",
                    "payment": 50,
                    "status": "open",
                    "created": "2024-01-01T10:00:00Z"
                }));
            })
            .await;
        let update = server
            .mock_async(|when, then| {
                when.method(PUT).path("/billings/7/").json_body(json!({
                    "id": 7,
                    "owner_id": 3,
                    "pet_id": 11,
                    "type": "insurance",
                    "type_name": "Accident",
                    "payment": 75,
                    "status": "open",
                    "created": "2024-01-01T10:00:00Z"
                }));
                then.status(200);
            })
            .await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(201);
            })
            .await;

        let outcome = reconciler(&server.base_url(), CheckPolicy::CreateOnAnyFailure)
            .reconcile(&pet_insurance(11, dec!(75)), 3, "insurance", Some("Accident"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            ReconcileOutcome::Updated {
                billing_id: "7".to_string()
            }
        );
        update.assert_hits_async(1).await;
        create.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_trailing_separator_does_not_change_paths() {
        for suffix in ["", "/"] {
            let server = MockServer::start_async().await;
            let check = server
                .mock_async(|when, then| {
                    when.method(GET).path("/billings/3/11/insurance/");
                    then.status(404);
                })
                .await;
            let create = server
                .mock_async(|when, then| {
                    when.method(POST).path("/billings/");
                    then.status(201);
                })
                .await;

            reconciler(
                &format!("{}{}", server.base_url(), suffix),
                CheckPolicy::CreateOnAnyFailure,
            )
            .reconcile(&pet_insurance(11, dec!(50)), 3, "insurance", None)
            .await
            .unwrap();

            check.assert_hits_async(1).await;
            create.assert_hits_async(1).await;
        }
    }

    #[tokio::test]
    async fn test_rejected_create_propagates_without_retry() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/billings/3/11/insurance/");
                then.status(404);
            })
            .await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST).path("/billings/");
                then.status(500);
            })
            .await;
        let update = server
            .mock_async(|when, then| {
                when.method(PUT);
                then.status(200);
            })
            .await;

        let result = reconciler(&server.base_url(), CheckPolicy::CreateOnAnyFailure)
            .reconcile(&pet_insurance(11, dec!(50)), 3, "insurance", None)
            .await;

        assert!(matches!(
            result,
            Err(AppError::BillingRejected { status: 500, .. })
        ));
        create.assert_hits_async(1).await;
        update.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_dropped_update_is_transport_error_without_retry() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/billings/3/11/insurance/");
                then.status(200)
                    .json_body(json!({"id": 7, "payment": 50, "status": "open"}));
            })
            .await;
        // Responds slower than the client timeout
        let update = server
            .mock_async(|when, then| {
                when.method(PUT).path("/billings/7/");
                then.status(200).delay(std::time::Duration::from_secs(3));
            })
            .await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST);
                then.status(201);
            })
            .await;

        let services = ServicesConfig {
            billing_url: Some(server.base_url()),
            request_timeout_secs: Some(1),
            ..Default::default()
        };
        let http_client = crate::build_http_client(&services).unwrap();
        let locator = Arc::new(ServiceLocator::new(services, Arc::new(FixedRegistry::new())));
        let reconciler =
            BillingReconciler::new(locator, http_client, CheckPolicy::CreateOnAnyFailure);

        let result = reconciler
            .reconcile(&pet_insurance(11, dec!(75)), 3, "insurance", None)
            .await;

        assert!(matches!(
            result,
            Err(AppError::Transport { ref url, .. }) if url.ends_with("/billings/7/")
        ));
        update.assert_hits_async(1).await;
        create.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_dropped_create_is_transport_error_without_retry() {
        let server = MockServer::start_async().await;
        let check = server
            .mock_async(|when, then| {
                when.method(GET).path("/billings/3/11/insurance/");
                then.status(404);
            })
            .await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST).path("/billings/");
                then.status(201).delay(std::time::Duration::from_secs(3));
            })
            .await;
        let update = server
            .mock_async(|when, then| {
                when.method(PUT);
                then.status(200);
            })
            .await;

        let services = ServicesConfig {
            billing_url: Some(server.base_url()),
            request_timeout_secs: Some(1),
            ..Default::default()
        };
        let http_client = crate::build_http_client(&services).unwrap();
        let locator = Arc::new(ServiceLocator::new(services, Arc::new(FixedRegistry::new())));
        let reconciler =
            BillingReconciler::new(locator, http_client, CheckPolicy::CreateOnAnyFailure);

        let result = reconciler
            .reconcile(&pet_insurance(11, dec!(50)), 3, "insurance", None)
            .await;

        assert!(matches!(
            result,
            Err(AppError::Transport { ref url, .. }) if url.ends_with("/billings/")
        ));
        check.assert_hits_async(1).await;
        create.assert_hits_async(1).await;
        update.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_unreachable_billing_service_is_transport_error() {
        let result = reconciler("http://127.0.0.1:9", CheckPolicy::CreateOnAnyFailure)
            .reconcile(&pet_insurance(11, dec!(50)), 3, "insurance", None)
            .await;

        assert!(matches!(
            result,
            Err(AppError::Transport { ref url, .. })
                if url == "http://127.0.0.1:9/billings/3/11/insurance/"
        ));
    }

    #[tokio::test]
    async fn test_strict_policy_creates_only_on_404() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/billings/3/11/insurance/");
                then.status(404);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/billings/3/12/insurance/");
                then.status(502);
            })
            .await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST).path("/billings/");
                then.status(201);
            })
            .await;

        let reconciler = reconciler(&server.base_url(), CheckPolicy::CreateOnNotFound);

        let created = reconciler
            .reconcile(&pet_insurance(11, dec!(50)), 3, "insurance", None)
            .await;
        assert_eq!(created.unwrap(), ReconcileOutcome::Created);

        let failed = reconciler
            .reconcile(&pet_insurance(12, dec!(50)), 3, "insurance", None)
            .await;
        assert!(matches!(
            failed,
            Err(AppError::BillingCheckFailed { status: 502, .. })
        ));

        create.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_existing_record_without_id_is_malformed() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/billings/3/11/insurance/");
                then.status(200).json_body(json!({"payment": 50}));
            })
            .await;
        let writes = server
            .mock_async(|when, then| {
                when.method(PUT);
                then.status(200);
            })
            .await;

        let result = reconciler(&server.base_url(), CheckPolicy::CreateOnAnyFailure)
            .reconcile(&pet_insurance(11, dec!(50)), 3, "insurance", None)
            .await;

        assert!(matches!(result, Err(AppError::Transport { .. })));
        writes.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn test_billing_resolved_through_registry() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/billings/3/11/insurance/");
                then.status(404);
            })
            .await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST).path("/billings/");
                then.status(201);
            })
            .await;

        let registry = FixedRegistry::new().with_instances(
            "BILLING-SERVICE",
            vec![ServiceInstance::new(server.host(), server.port())],
        );
        let locator = Arc::new(ServiceLocator::new(
            ServicesConfig::default(),
            Arc::new(registry),
        ));
        let reconciler =
            BillingReconciler::new(locator, Client::new(), CheckPolicy::CreateOnAnyFailure);

        reconciler
            .reconcile(&pet_insurance(11, dec!(50)), 3, "insurance", None)
            .await
            .unwrap();

        create.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn test_unresolvable_billing_makes_no_call() {
        let locator = Arc::new(ServiceLocator::new(
            ServicesConfig::default(),
            Arc::new(FixedRegistry::new()),
        ));
        let reconciler =
            BillingReconciler::new(locator, Client::new(), CheckPolicy::CreateOnAnyFailure);

        let result = reconciler
            .reconcile(&pet_insurance(11, dec!(50)), 3, "insurance", None)
            .await;

        assert!(matches!(result, Err(AppError::ServiceResolution(_))));
    }
}
