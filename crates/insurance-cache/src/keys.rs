//! Key naming for records kept in Redis
//!
//! # Key Patterns
//!
//! - `claim:{claim_id}` - Submitted insurance claim
//!
//! # Example
//!
//! ```
//! use insurance_cache::keys;
//!
//! assert_eq!(keys::claim_key("c-100"), "claim:c-100");
//! ```

/// Prefix for submitted claims
///
/// Format: `claim:{claim_id}`
pub const CLAIM_KEY_PREFIX: &str = "claim";

/// Build the key holding a claim
pub fn claim_key(claim_id: &str) -> String {
    format!("{}:{}", CLAIM_KEY_PREFIX, claim_id)
}
