//! Logical service names and resolved endpoints
//!
//! A `ServiceName` is the stable identifier of a downstream service; a
//! `ServiceEndpoint` is the base URL it resolved to for a single call.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical identifier of a downstream service
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceName {
    /// Owner directory (`customers-service`)
    Customers,
    /// Billing ledger (`billing-service`)
    Billing,
    /// Any other logical name, stored lower-cased
    Other(String),
}

impl ServiceName {
    /// Canonical lower-case name
    pub fn as_str(&self) -> &str {
        match self {
            ServiceName::Customers => "customers-service",
            ServiceName::Billing => "billing-service",
            ServiceName::Other(name) => name,
        }
    }

    /// Name under which the service registers itself in the registry
    pub fn registry_name(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ServiceName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        match name.as_str() {
            "" => Err("service name cannot be empty".to_string()),
            "customers-service" => Ok(ServiceName::Customers),
            "billing-service" => Ok(ServiceName::Billing),
            _ => Ok(ServiceName::Other(name)),
        }
    }
}

/// Resolved base URL of a service, always ending with exactly one `/`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint(String);

impl ServiceEndpoint {
    /// Normalize a configured or synthesized base URL
    pub fn new(base_url: &str) -> Self {
        Self(format!("{}/", base_url.trim().trim_end_matches('/')))
    }

    /// Base URL including the trailing separator
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Build a request URL for a path relative to the base
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.0, path.trim_start_matches('/'))
    }
}

impl fmt::Display for ServiceEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One registered instance of a service as listed by the registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceInstance {
    pub ip_addr: String,
    pub port: u16,
}

impl ServiceInstance {
    pub fn new(ip_addr: impl Into<String>, port: u16) -> Self {
        Self {
            ip_addr: ip_addr.into(),
            port,
        }
    }

    /// `http://<ip>:<port>/`
    pub fn endpoint(&self) -> ServiceEndpoint {
        ServiceEndpoint::new(&format!("http://{}:{}", self.ip_addr, self.port))
    }
}
