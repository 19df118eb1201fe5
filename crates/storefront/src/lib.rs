//! Lumina storefront client library.
//!
//! The cart state manager plus the thin client layer around it: local
//! storage profiles, the backend REST client, checkout, reviews and order
//! helpers. Front ends (the `lumina` CLI, tests) drive everything through
//! this crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod orders;
pub mod reviews;
pub mod storage;
