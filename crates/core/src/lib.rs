//! Orchard Core - Shared domain logic.
//!
//! This crate holds everything in the storefront that does not touch the
//! network or the HTTP layer:
//! - [`types`] - Prices, email addresses and Shopify global IDs
//! - [`carousel`] - The auto-scroll / drag carousel state machine
//! - [`catalog`] - In-memory sort and stock filtering of a product page
//! - [`lookup`] - Sequence-tagged tracking of remote lookups
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. The storefront crate adapts Shopify responses to the traits
//! defined here.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod carousel;
pub mod catalog;
pub mod lookup;
pub mod types;

pub use types::*;
