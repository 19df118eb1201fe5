//! Lumina Core - Shared types library.
//!
//! This crate provides common types used across all Lumina components:
//! - `storefront` - Client library: cart state, local storage, REST API client
//! - `cli` - Command-line front end for shoppers and store admins
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product/order/review IDs, prices,
//!   emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
