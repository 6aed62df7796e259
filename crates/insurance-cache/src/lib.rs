//! Redis claim store for the insurance service
//!
//! Submitted claims are written as JSON documents under `claim:{claim_id}`.
//! The store is an isolated write path: its failures never reach the
//! billing reconciliation.
//!
//! # Example
//!
//! ```no_run
//! use insurance_cache::RedisClaimStore;
//! use insurance_core::models::Claim;
//! use insurance_core::traits::ClaimStore;
//! use rust_decimal::Decimal;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = RedisClaimStore::new("redis://127.0.0.1:6379").await?;
//!     let claim = Claim::pending("c-1".to_string(), 3, 11, Decimal::new(12050, 2));
//!     store.put_claim(&claim).await?;
//!     Ok(())
//! }
//! ```

pub mod keys;

use async_trait::async_trait;
use insurance_core::error::AppError;
use insurance_core::models::Claim;
use insurance_core::traits::ClaimStore;
use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use tracing::{debug, error, info, instrument, warn};

/// Redis-backed claim store with a multiplexed connection
#[derive(Clone)]
pub struct RedisClaimStore {
    manager: ConnectionManager,
}

impl RedisClaimStore {
    /// Connect to Redis
    ///
    /// # Errors
    ///
    /// Returns `AppError::CacheConnection` if the connection fails
    pub async fn new(url: &str) -> Result<Self, AppError> {
        debug!("Connecting to Redis at {}", url);

        let client = Client::open(url).map_err(|e| {
            error!("Failed to create Redis client: {}", e);
            AppError::CacheConnection(format!("Invalid Redis URL: {}", e))
        })?;

        let manager = ConnectionManager::new(client).await.map_err(|e| {
            error!("Failed to establish Redis connection: {}", e);
            AppError::CacheConnection(format!("Connection failed: {}", e))
        })?;

        debug!("Redis connection established successfully");
        Ok(Self { manager })
    }

    /// Ping the Redis server to check connectivity
    pub async fn ping(&self) -> Result<(), AppError> {
        let mut conn = self.manager.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                error!("Redis ping failed: {}", e);
                AppError::Cache(format!("Ping failed: {}", e))
            })?;
        Ok(())
    }

    /// Read a stored claim back
    pub async fn get_claim(&self, claim_id: &str) -> Result<Option<Claim>, AppError> {
        let key = keys::claim_key(claim_id);
        debug!("GET {}", key);
        let mut conn = self.manager.clone();

        let raw: Option<String> = conn.get(&key).await.map_err(Self::map_redis_error)?;

        raw.map(|json| {
            serde_json::from_str::<Claim>(&json).map_err(|e| {
                error!("Failed to deserialize claim {}: {}", claim_id, e);
                AppError::Serialization(format!("Deserialization failed: {}", e))
            })
        })
        .transpose()
    }

    /// Convert RedisError to AppError
    fn map_redis_error(err: RedisError) -> AppError {
        match err.kind() {
            redis::ErrorKind::IoError => {
                error!("Redis I/O error: {}", err);
                AppError::CacheConnection(format!("I/O error: {}", err))
            }
            redis::ErrorKind::TypeError => {
                warn!("Redis type error: {}", err);
                AppError::Cache(format!("Type mismatch: {}", err))
            }
            _ => {
                error!("Redis error: {}", err);
                AppError::Cache(err.to_string())
            }
        }
    }
}

#[async_trait]
impl ClaimStore for RedisClaimStore {
    #[instrument(skip(self, claim), fields(claim_id = %claim.claim_id))]
    async fn put_claim(&self, claim: &Claim) -> Result<(), AppError> {
        let key = keys::claim_key(&claim.claim_id);
        let mut conn = self.manager.clone();

        let json = serde_json::to_string(claim).map_err(|e| {
            error!("Failed to serialize claim {}: {}", claim.claim_id, e);
            AppError::Serialization(format!("Serialization failed: {}", e))
        })?;

        let _: () = conn.set(&key, json).await.map_err(Self::map_redis_error)?;

        info!("Claim stored under {}", key);
        Ok(())
    }
}
