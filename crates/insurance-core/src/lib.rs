//! Pet Clinic Insurance Core Library
//!
//! This crate provides the foundational types, traits, and error handling
//! for the insurance service. It includes:
//!
//! - Domain models (Insurance, PetInsurance, billing and owner records, claims)
//! - Logical service names and resolved endpoints
//! - Ports for persistence, service discovery and claim storage
//! - Unified error handling with HTTP response mapping
//! - Application configuration

pub mod config;
pub mod error;
pub mod models;
pub mod traits;

pub use config::AppConfig;
pub use error::AppError;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;
