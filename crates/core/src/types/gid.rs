//! Shopify global IDs and product references.
//!
//! Shopify identifies every resource with a global ID of the form
//! `gid://shopify/<Resource>/<id>`. Product pages are addressed by handle
//! instead, so lookups accept either form through [`ProductRef`].

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

const GID_PREFIX: &str = "gid://shopify/";

/// Errors that can occur when parsing a [`ShopifyGid`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum GidError {
    /// The string does not start with `gid://shopify/`.
    #[error("not a Shopify global id: {0}")]
    MissingPrefix(String),
    /// The resource type or id segment is missing.
    #[error("malformed Shopify global id: {0}")]
    Malformed(String),
}

/// A parsed Shopify global ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShopifyGid {
    resource: String,
    id: String,
}

impl ShopifyGid {
    /// Build a global ID from its parts.
    #[must_use]
    pub fn new(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Parse `gid://shopify/ProductVariant/42`.
    ///
    /// Query strings (`?cart=...`) on the id are kept as part of the id,
    /// since cart GIDs carry their key that way.
    ///
    /// # Errors
    ///
    /// Returns an error if the prefix is wrong or a segment is empty.
    pub fn parse(s: &str) -> Result<Self, GidError> {
        let rest = s
            .strip_prefix(GID_PREFIX)
            .ok_or_else(|| GidError::MissingPrefix(s.to_owned()))?;

        match rest.split_once('/') {
            Some((resource, id)) if !resource.is_empty() && !id.is_empty() => {
                Ok(Self::new(resource, id))
            }
            _ => Err(GidError::Malformed(s.to_owned())),
        }
    }

    /// Resource type, e.g. `Product`.
    #[must_use]
    pub fn resource(&self) -> &str {
        &self.resource
    }

    /// Resource-local id, e.g. `42`.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Whether this ID names a resource of the given type.
    #[must_use]
    pub fn is(&self, resource: &str) -> bool {
        self.resource == resource
    }
}

impl fmt::Display for ShopifyGid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{GID_PREFIX}{}/{}", self.resource, self.id)
    }
}

impl FromStr for ShopifyGid {
    type Err = GidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// How a caller identifies a product: by global ID or by URL handle.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ProductRef {
    Id(ShopifyGid),
    Handle(String),
}

impl ProductRef {
    /// Interpret a free-form identifier. Anything that is not a GID is a handle.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        ShopifyGid::parse(s).map_or_else(|_| Self::Handle(s.to_owned()), Self::Id)
    }
}

impl fmt::Display for ProductRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(gid) => gid.fmt(f),
            Self::Handle(handle) => f.write_str(handle),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variant_gid() {
        let gid = ShopifyGid::parse("gid://shopify/ProductVariant/42").unwrap();
        assert_eq!(gid.resource(), "ProductVariant");
        assert_eq!(gid.id(), "42");
        assert!(gid.is("ProductVariant"));
        assert_eq!(gid.to_string(), "gid://shopify/ProductVariant/42");
    }

    #[test]
    fn test_parse_cart_gid_keeps_key() {
        let gid = ShopifyGid::parse("gid://shopify/Cart/c1-abc?key=def").unwrap();
        assert_eq!(gid.id(), "c1-abc?key=def");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            ShopifyGid::parse("Product/42"),
            Err(GidError::MissingPrefix(_))
        ));
        assert!(matches!(
            ShopifyGid::parse("gid://shopify/Product/"),
            Err(GidError::Malformed(_))
        ));
        assert!(matches!(
            ShopifyGid::parse("gid://shopify/Product"),
            Err(GidError::Malformed(_))
        ));
    }

    #[test]
    fn test_product_ref() {
        assert!(matches!(
            ProductRef::parse("gid://shopify/Product/7"),
            ProductRef::Id(_)
        ));
        assert_eq!(
            ProductRef::parse(" honey-jar "),
            ProductRef::Handle("honey-jar".to_owned())
        );
    }
}
