//! Cached catalog values.
//!
//! Only read-mostly catalog data goes in the cache; cart and order state is
//! always fetched fresh.

use arbor_core::{Category, Department, Product};

/// Values stored in the moka cache, keyed by resource-specific strings
/// (`departments`, `categories:{id}`, `product:{id}`, ...).
#[derive(Clone)]
pub enum CacheValue {
    Departments(Vec<Department>),
    Categories(Vec<Category>),
    Products(Vec<Product>),
    Product(Box<Product>),
}
