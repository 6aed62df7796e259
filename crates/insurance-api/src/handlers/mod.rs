//! HTTP request handlers

pub mod claim;
pub mod health;
pub mod insurance;
pub mod pet_insurance;

pub use claim::configure as configure_claims;
pub use health::health_check;
pub use insurance::configure as configure_insurances;
pub use pet_insurance::configure as configure_pet_insurances;
