//! Cache types for product reads.

use std::sync::Arc;

use lumina_core::ProductId;

use super::types::Product;

/// Cache key for product reads.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Product(ProductId),
    Products,
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Arc<Product>),
    Products(Arc<Vec<Product>>),
}
