//! Data Transfer Objects (DTOs) for API requests and responses

pub mod claim;
pub mod common;
pub mod insurance;
pub mod pet_insurance;

pub use claim::*;
pub use common::*;
pub use insurance::*;
pub use pet_insurance::*;
