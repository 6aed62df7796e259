//! Application configuration
//!
//! This module provides centralized configuration management using the `config` crate.
//! Configuration is built once at process start and handed to the components that
//! need it; nothing reads the environment after that.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::env;

use crate::models::ServiceName;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    #[serde(default)]
    pub services: ServicesConfig,
    #[serde(default)]
    pub billing: BillingConfig,
}

/// HTTP server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Number of worker threads
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_workers() -> usize {
    num_cpus::get()
}

/// Database configuration
#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

/// Redis configuration (claim store)
#[derive(Debug, Deserialize, Clone)]
pub struct RedisConfig {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub url: String,
}

fn default_redis_url() -> String {
    "redis://127.0.0.1:6379".to_string()
}

/// Downstream service addressing
///
/// A static URL, when present and non-empty, always wins over the registry.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ServicesConfig {
    /// Static base URL of the customers service
    pub customers_url: Option<String>,

    /// Static base URL of the billing service
    pub billing_url: Option<String>,

    /// Static base URLs for any further logical service, keyed by name
    #[serde(default)]
    pub endpoints: HashMap<String, String>,

    /// Base URL of the Eureka-compatible registry used as fallback
    pub eureka_url: Option<String>,

    /// Timeout applied to every downstream request; unset keeps transport defaults
    pub request_timeout_secs: Option<u64>,
}

impl ServicesConfig {
    /// Static base URL configured for `service`, if any.
    ///
    /// Blank values count as "not configured".
    pub fn static_url(&self, service: &ServiceName) -> Option<&str> {
        let configured = match service {
            ServiceName::Customers => self.customers_url.as_deref(),
            ServiceName::Billing => self.billing_url.as_deref(),
            ServiceName::Other(name) => self.endpoints.get(name).map(String::as_str),
        };

        configured.filter(|url| !url.trim().is_empty())
    }
}

/// How the reconciler reads a non-200 answer from the billing existence check
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum CheckPolicy {
    /// Any non-200 status means "no open billing", so a new one is created
    #[default]
    CreateOnAnyFailure,

    /// Only 404 means "no open billing"; other statuses abort the reconciliation
    CreateOnNotFound,
}

/// Billing reconciliation configuration
#[derive(Debug, Deserialize, Clone, Default)]
pub struct BillingConfig {
    /// Interpretation of the existence check status
    #[serde(default)]
    pub check_policy: CheckPolicy,

    /// Look the owner up in the customers service before writing a pet insurance
    #[serde(default)]
    pub validate_owner: bool,
}

impl AppConfig {
    /// Load configuration from environment and optional config file
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8000)?
            .set_default("server.workers", num_cpus::get() as i64)?
            .set_default("database.max_connections", 10)?
            .set_default("redis.url", "redis://127.0.0.1:6379")?
            .set_default("billing.check_policy", "create_on_any_failure")?
            .set_default("billing.validate_owner", false)?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Load from environment variables with INSURANCE_ prefix
            .add_source(
                Environment::with_prefix("INSURANCE")
                    .separator("__")
                    .try_parsing(true),
            )
            // Support legacy flat environment variables
            .set_override_option("services.customers_url", env::var("CUSTOMERS_SERVICE_URL").ok())?
            .set_override_option("services.billing_url", env::var("BILLING_SERVICE_URL").ok())?
            .set_override_option("services.eureka_url", env::var("EUREKA_URL").ok())?
            .set_override_option("database.url", env::var("DATABASE_URL").ok())?
            .set_override_option("redis.url", env::var("REDIS_URL").ok())?
            .build()?;

        config.try_deserialize()
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let config = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("INSURANCE").separator("__"))
            .build()?;

        config.try_deserialize()
    }

    /// Get the server bind address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
