//! Custom wholesale products.
//!
//! A wholesale buyer describes the product they want (title, unit price,
//! shipping weight). The storefront creates it through the Admin API,
//! prices and weighs the default variant, tags it for merchandisers, and
//! hands back the variant id so the caller can add it to the visitor's cart.

use rust_decimal::Decimal;
use tracing::{info, instrument};

use crate::shopify::types::{NewProduct, VariantUpdate, Weight, WeightUnit};
use crate::shopify::{AdminClient, ShopifyError};

/// Tag applied to every product created through the wholesale flow.
pub const WHOLESALE_TAG: &str = "wholesale";

const MAX_TITLE_LEN: usize = 255;

/// A validated wholesale order.
#[derive(Debug, Clone, PartialEq)]
pub struct WholesaleRequest {
    pub title: String,
    pub vendor: Option<String>,
    pub product_type: Option<String>,
    pub price: Decimal,
    pub weight: Option<Weight>,
}

impl WholesaleRequest {
    /// Validate raw form input.
    ///
    /// # Errors
    ///
    /// Returns a message suitable for showing to the buyer.
    pub fn parse(
        title: &str,
        vendor: Option<&str>,
        product_type: Option<&str>,
        price: &str,
        weight: Option<&str>,
        weight_unit: Option<&str>,
    ) -> Result<Self, String> {
        let title = title.trim();
        if title.is_empty() {
            return Err("Title is required".to_string());
        }
        if title.chars().count() > MAX_TITLE_LEN {
            return Err("Title is too long".to_string());
        }

        let price: Decimal = price
            .trim()
            .trim_start_matches('$')
            .parse()
            .map_err(|_| "Price must be a number".to_string())?;
        if price <= Decimal::ZERO {
            return Err("Price must be greater than zero".to_string());
        }

        let weight = match non_empty(weight) {
            None => None,
            Some(raw) => {
                let value: f64 = raw
                    .parse()
                    .map_err(|_| "Weight must be a number".to_string())?;
                if !value.is_finite() || value < 0.0 {
                    return Err("Weight must be zero or more".to_string());
                }
                let unit = match non_empty(weight_unit) {
                    Some(unit) => unit.parse::<WeightUnit>()?,
                    None => WeightUnit::default(),
                };
                Some(Weight { value, unit })
            }
        };

        Ok(Self {
            title: title.to_string(),
            vendor: non_empty(vendor).map(str::to_string),
            product_type: non_empty(product_type).map(str::to_string),
            price: price.round_dp(2),
            weight,
        })
    }
}

/// A wholesale product ready to be added to a cart.
#[derive(Debug, Clone)]
pub struct WholesaleProduct {
    pub product_id: String,
    pub handle: String,
    pub variant_id: String,
    pub price: String,
}

/// Create, price and tag a custom product.
///
/// # Errors
///
/// Returns an error if any of the three Admin API mutations fail, or if
/// Shopify did not create a default variant.
#[instrument(skip(admin, request), fields(title = %request.title))]
pub async fn create_custom_product(
    admin: &AdminClient,
    request: WholesaleRequest,
) -> Result<WholesaleProduct, ShopifyError> {
    let created = admin
        .create_product(NewProduct {
            title: request.title,
            vendor: request.vendor,
            product_type: request.product_type,
            tags: vec![],
        })
        .await?;

    let variant_id = created.default_variant_id.clone().ok_or_else(|| {
        ShopifyError::NotFound(format!("default variant for {}", created.id))
    })?;

    let variant = admin
        .update_variant(
            &created.id,
            &variant_id,
            VariantUpdate {
                price: Some(request.price),
                weight: request.weight,
            },
        )
        .await?;

    admin
        .add_tags(&created.id, &[WHOLESALE_TAG.to_string()])
        .await?;

    info!(product_id = %created.id, variant_id = %variant.id, "Wholesale product ready");

    Ok(WholesaleProduct {
        product_id: created.id,
        handle: created.handle,
        variant_id: variant.id,
        price: variant.price,
    })
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_request() {
        let request = WholesaleRequest::parse(
            "  Cider barrel  ",
            Some("Orchard Co"),
            Some(""),
            "$120.50",
            Some("40"),
            Some("kg"),
        )
        .unwrap();

        assert_eq!(request.title, "Cider barrel");
        assert_eq!(request.vendor.as_deref(), Some("Orchard Co"));
        assert_eq!(request.product_type, None);
        assert_eq!(request.price, Decimal::new(12050, 2));
        assert_eq!(
            request.weight,
            Some(Weight {
                value: 40.0,
                unit: WeightUnit::Kilograms
            })
        );
    }

    #[test]
    fn test_weight_defaults_to_pounds() {
        let request =
            WholesaleRequest::parse("Crate", None, None, "10", Some("3.5"), None).unwrap();
        assert_eq!(request.weight.map(|w| w.unit), Some(WeightUnit::Pounds));
    }

    #[test]
    fn test_weight_is_optional() {
        let request = WholesaleRequest::parse("Crate", None, None, "10", Some(" "), None).unwrap();
        assert_eq!(request.weight, None);
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert!(WholesaleRequest::parse(" ", None, None, "10", None, None).is_err());
        assert!(WholesaleRequest::parse("Crate", None, None, "ten", None, None).is_err());
        assert!(WholesaleRequest::parse("Crate", None, None, "0", None, None).is_err());
        assert!(WholesaleRequest::parse("Crate", None, None, "5", Some("-1"), None).is_err());
        assert!(WholesaleRequest::parse("Crate", None, None, "5", Some("1"), Some("stone")).is_err());
        assert!(WholesaleRequest::parse(&"x".repeat(256), None, None, "5", None, None).is_err());
    }
}
