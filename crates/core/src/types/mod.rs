//! Core types for Arbor.
//!
//! This module provides type-safe wrappers for common domain concepts and
//! the wire models of the commerce backend's entities.

pub mod catalog;
pub mod id;
pub mod order;
pub mod user;

pub use catalog::{Category, Department, OptionKind, PriceModifierKind, Product, ProductOption};
pub use id::*;
pub use order::{Order, OrderItem, OrderStatus, PaymentMethod, PaymentStatus};
pub use user::{Role, User};
