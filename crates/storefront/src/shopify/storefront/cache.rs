//! Cache types for Storefront API responses.

use crate::shopify::types::{Collection, CollectionConnection, Menu, Product, ProductConnection};

/// Cached value types.
///
/// Keys are strings of the form `kind:arg[:arg]`, built by the client
/// methods that own each entry.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Product(Box<Product>),
    Products(ProductConnection),
    Recommendations(Vec<Product>),
    Collection(Box<Collection>),
    Collections(CollectionConnection),
    Menu(Menu),
}
