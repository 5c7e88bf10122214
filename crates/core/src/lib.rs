//! Arbor Core - Shared types library.
//!
//! This crate provides common types used across all Arbor components:
//! - `storefront` - Public-facing furniture shop
//! - `admin` - Internal administration panel
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs and the catalog/order/user wire models
//! - [`cart`] - Cart lines, keying, and the guest/server merge
//! - [`payment`] - Card number and expiry validation
//! - [`i18n`] - Bilingual (en/bg) string dictionary

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod i18n;
pub mod payment;
pub mod types;

pub use types::*;
