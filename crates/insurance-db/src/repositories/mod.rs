//! Repository implementations
//!
//! Concrete implementations of the repository traits defined in
//! insurance-core, using sqlx for PostgreSQL access.

pub mod insurance_repo;
pub mod pet_insurance_repo;

pub use insurance_repo::PgInsuranceRepository;
pub use pet_insurance_repo::PgPetInsuranceRepository;
