//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `variant_lookup` - First-variant resolution with stale-response discard
//! - `wholesale` - B2B custom product setup through the Admin API

pub mod variant_lookup;
pub mod wholesale;

pub use variant_lookup::{VariantLookup, VariantSource};
