//! Shared HTTP client for downstream calls
//!
//! One `reqwest::Client` (connection pool only) is shared by the registry
//! adapter, the owner lookup and the billing reconciler.

use insurance_core::{config::ServicesConfig, AppError, AppResult};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::error;

/// Build the downstream HTTP client
///
/// No timeout is set unless `request_timeout_secs` is configured.
pub fn build_http_client(services: &ServicesConfig) -> AppResult<Client> {
    let mut builder = ClientBuilder::new()
        .pool_max_idle_per_host(20)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60));

    if let Some(secs) = services.request_timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }

    builder
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// Log and wrap a transport-level failure
pub(crate) fn transport_error(url: &str, err: reqwest::Error) -> AppError {
    let message = if err.is_timeout() {
        format!("timed out: {}", err)
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    };

    error!(url = %url, "Request failed: {}", message);
    AppError::Transport {
        url: url.to_string(),
        message,
    }
}

/// Log and wrap a body that could not be decoded
pub(crate) fn malformed_response(url: &str, err: impl std::fmt::Display) -> AppError {
    error!(url = %url, "Malformed response: {}", err);
    AppError::Transport {
        url: url.to_string(),
        message: format!("malformed response: {}", err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        assert!(build_http_client(&ServicesConfig::default()).is_ok());

        let services = ServicesConfig {
            request_timeout_secs: Some(2),
            ..Default::default()
        };
        assert!(build_http_client(&services).is_ok());
    }
}
