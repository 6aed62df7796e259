//! Insurance Database Layer
//!
//! This crate provides PostgreSQL database access and repository implementations
//! for the insurance service. It includes:
//!
//! - Connection pool management with sqlx
//! - Embedded schema migrations
//! - Repository implementations for insurances and pet insurances

pub mod pool;
pub mod repositories;

pub use pool::{create_pool, run_migrations};
pub use repositories::*;

// Re-export commonly used types
pub use insurance_core::{AppError, AppResult};
pub use sqlx::PgPool;
