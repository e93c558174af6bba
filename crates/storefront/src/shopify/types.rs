//! Domain types for the Shopify Storefront and Admin APIs.
//!
//! These types provide a clean, ergonomic API separate from the raw wire
//! types in `storefront::queries` and `admin::queries`.

use chrono::{DateTime, Utc};
use orchard_core::Price;
use orchard_core::catalog::CatalogEntry;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Money Types
// =============================================================================

/// Monetary amount with currency code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal amount as string (preserves precision).
    pub amount: String,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Money {
    /// Parse into a typed [`Price`], if the amount and currency are valid.
    #[must_use]
    pub fn to_price(&self) -> Option<Price> {
        Price::parse(&self.amount, &self.currency_code).ok()
    }
}

/// Price range for a product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceRange {
    /// Minimum price among all variants.
    pub min_variant_price: Money,
    /// Maximum price among all variants.
    pub max_variant_price: Money,
}

// =============================================================================
// Image Types
// =============================================================================

/// Product or collection image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    /// Shopify image ID.
    pub id: Option<String>,
    /// Image URL.
    pub url: String,
    /// Alt text for accessibility.
    pub alt_text: Option<String>,
    /// Image width in pixels.
    pub width: Option<i64>,
    /// Image height in pixels.
    pub height: Option<i64>,
}

// =============================================================================
// Product Types
// =============================================================================

/// Selected option on a product variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedOption {
    /// Option name (e.g., "Packaging").
    pub name: String,
    /// Selected value (e.g., "Gift box").
    pub value: String,
}

/// Product option definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductOption {
    /// Option ID.
    pub id: String,
    /// Option name (e.g., "Size").
    pub name: String,
    /// Available values (e.g., `["Small", "Medium", "Large"]`).
    pub values: Vec<String>,
}

/// A product variant (specific combination of options).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductVariant {
    /// Variant ID.
    pub id: String,
    /// Variant title (combination of option values).
    pub title: String,
    /// Whether this variant is available for sale.
    pub available_for_sale: bool,
    /// Quantity available (if inventory tracking enabled).
    pub quantity_available: Option<i64>,
    /// SKU code.
    pub sku: Option<String>,
    /// Shipping weight.
    pub weight: Option<f64>,
    /// Unit for `weight` (e.g., `POUNDS`).
    pub weight_unit: Option<String>,
    /// Current price.
    pub price: Money,
    /// Compare-at price (original price if on sale).
    pub compare_at_price: Option<Money>,
    /// Selected options for this variant.
    pub selected_options: Vec<SelectedOption>,
    /// Variant image.
    pub image: Option<Image>,
}

impl ProductVariant {
    /// Whether this variant has `name` set to `value`.
    #[must_use]
    pub fn has_option(&self, name: &str, value: &str) -> bool {
        self.selected_options
            .iter()
            .any(|o| o.name.eq_ignore_ascii_case(name) && o.value == value)
    }
}

/// A product in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product ID.
    pub id: String,
    /// URL handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// HTML description.
    pub description_html: String,
    /// Whether any variant is available.
    pub available_for_sale: bool,
    /// Product type/category.
    #[serde(rename = "product_type")]
    pub kind: String,
    /// Vendor name.
    pub vendor: String,
    /// Product tags.
    pub tags: Vec<String>,
    /// Creation timestamp.
    pub created_at: Option<DateTime<Utc>>,
    /// Price range across variants.
    pub price_range: PriceRange,
    /// Compare-at price range.
    pub compare_at_price_range: Option<PriceRange>,
    /// Featured image.
    pub featured_image: Option<Image>,
    /// All product images.
    pub images: Vec<Image>,
    /// Product options.
    pub options: Vec<ProductOption>,
    /// Product variants.
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Find the variant whose selected options match every `(name, value)`
    /// pair. Pairs naming options the product does not have are ignored.
    #[must_use]
    pub fn variant_for_options(&self, selections: &[(String, String)]) -> Option<&ProductVariant> {
        let relevant: Vec<&(String, String)> = selections
            .iter()
            .filter(|(name, _)| {
                self.options
                    .iter()
                    .any(|o| o.name.eq_ignore_ascii_case(name))
            })
            .collect();

        self.variants.iter().find(|variant| {
            relevant
                .iter()
                .all(|(name, value)| variant.has_option(name, value))
        })
    }
}

impl CatalogEntry for Product {
    fn title(&self) -> &str {
        &self.title
    }

    fn min_price(&self) -> Option<Decimal> {
        self.price_range
            .min_variant_price
            .amount
            .trim()
            .parse()
            .ok()
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    /// Only the first page of variants is fetched, so when none of those
    /// are available the product-level flag decides.
    fn available_variant_count(&self) -> usize {
        match self.variants.iter().filter(|v| v.available_for_sale).count() {
            0 => usize::from(self.available_for_sale),
            count => count,
        }
    }
}

// =============================================================================
// Collection Types
// =============================================================================

/// A collection of products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    /// Collection ID.
    pub id: String,
    /// URL handle.
    pub handle: String,
    /// Collection title.
    pub title: String,
    /// Plain text description.
    pub description: String,
    /// HTML description.
    pub description_html: String,
    /// Collection image.
    pub image: Option<Image>,
    /// Products in this page of the collection.
    pub products: Vec<Product>,
    /// Pagination over the collection's products.
    pub page_info: Option<PageInfo>,
}

// =============================================================================
// Pagination Types
// =============================================================================

/// Pagination information.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageInfo {
    /// Whether there are more items after this page.
    pub has_next_page: bool,
    /// Whether there are items before this page.
    pub has_previous_page: bool,
    /// Cursor for the first item.
    pub start_cursor: Option<String>,
    /// Cursor for the last item.
    pub end_cursor: Option<String>,
}

/// Paginated list of products.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConnection {
    /// Products in this page.
    pub products: Vec<Product>,
    /// Pagination info.
    pub page_info: PageInfo,
}

/// Paginated list of collections.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionConnection {
    /// Collections in this page.
    pub collections: Vec<Collection>,
    /// Pagination info.
    pub page_info: PageInfo,
}

// =============================================================================
// Navigation Types
// =============================================================================

/// A navigation menu managed in Shopify admin.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Menu {
    /// Menu handle (e.g., `main-menu`).
    pub handle: String,
    /// Menu title.
    pub title: String,
    /// Top-level items.
    pub items: Vec<MenuItem>,
}

/// One link in a [`Menu`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    /// Link text.
    pub title: String,
    /// Storefront-relative path (or absolute URL for external links).
    pub url: String,
    /// Nested items.
    pub items: Vec<MenuItem>,
}

// =============================================================================
// Cart Types
// =============================================================================

/// Input for custom attributes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttributeInput {
    /// Attribute key.
    pub key: String,
    /// Attribute value.
    pub value: String,
}

/// Merchandise in a cart line (simplified product variant info).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartMerchandise {
    /// Variant ID.
    pub id: String,
    /// Variant title.
    pub title: String,
    /// Whether available for sale.
    pub available_for_sale: bool,
    /// Current price.
    pub price: Money,
    /// Selected options.
    pub selected_options: Vec<SelectedOption>,
    /// Variant image.
    pub image: Option<Image>,
    /// Parent product info.
    pub product: CartMerchandiseProduct,
}

/// Simplified product info for cart merchandise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartMerchandiseProduct {
    /// Product ID.
    pub id: String,
    /// Product handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// Featured image.
    pub featured_image: Option<Image>,
}

/// Cost for a cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineCost {
    /// Price per unit.
    pub amount_per_quantity: Money,
    /// Total (after discounts).
    pub total_amount: Money,
}

/// A line item in the cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    /// Cart line ID.
    pub id: String,
    /// Quantity.
    pub quantity: i64,
    /// Line cost.
    pub cost: CartLineCost,
    /// Product variant.
    pub merchandise: CartMerchandise,
}

/// Cart cost summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartCost {
    /// Subtotal before tax/shipping.
    pub subtotal: Money,
    /// Total amount.
    pub total: Money,
    /// Total tax amount.
    pub total_tax: Option<Money>,
}

/// Discount code applied to cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartDiscountCode {
    /// The discount code.
    pub code: String,
    /// Whether the code is applicable.
    pub applicable: bool,
}

/// A shopping cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cart {
    /// Cart ID.
    pub id: String,
    /// Checkout URL.
    pub checkout_url: String,
    /// Cart note.
    pub note: Option<String>,
    /// Total item quantity.
    pub total_quantity: i64,
    /// Cart cost summary.
    pub cost: CartCost,
    /// Applied discount codes.
    pub discount_codes: Vec<CartDiscountCode>,
    /// Cart lines.
    pub lines: Vec<CartLine>,
}

/// Input for adding a line to cart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineInput {
    /// Product variant ID.
    pub merchandise_id: String,
    /// Quantity to add.
    pub quantity: i64,
    /// Custom attributes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Vec<AttributeInput>>,
}

/// Input for updating a cart line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineUpdateInput {
    /// Cart line ID.
    pub id: String,
    /// New quantity.
    pub quantity: i64,
}

// =============================================================================
// Customer Types
// =============================================================================

/// A customer created through the newsletter signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterSubscriber {
    /// Customer ID.
    pub id: String,
    /// Email address.
    pub email: Option<String>,
    /// Marketing consent as recorded by Shopify.
    pub accepts_marketing: bool,
}

/// Outcome of a newsletter signup.
#[derive(Debug, Clone)]
pub enum SubscribeOutcome {
    /// A new customer was created with marketing consent.
    Subscribed(NewsletterSubscriber),
    /// The address already belongs to a customer.
    AlreadySubscribed,
}

// =============================================================================
// Sort Keys
// =============================================================================

/// Sort keys for product queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductSortKey {
    /// Sort by title.
    Title,
    /// Sort by creation date.
    CreatedAt,
    /// Sort by best selling.
    BestSelling,
    /// Sort by price.
    Price,
}

// =============================================================================
// Admin Types
// =============================================================================

/// Input for creating a wholesale product through the Admin API.
#[derive(Debug, Clone)]
pub struct NewProduct {
    /// Product title.
    pub title: String,
    /// Vendor name.
    pub vendor: Option<String>,
    /// Product type.
    pub product_type: Option<String>,
    /// Tags set at creation.
    pub tags: Vec<String>,
}

/// A product just created through the Admin API.
#[derive(Debug, Clone)]
pub struct CreatedProduct {
    /// Product ID.
    pub id: String,
    /// URL handle.
    pub handle: String,
    /// Product title.
    pub title: String,
    /// ID of the default variant Shopify creates with the product.
    pub default_variant_id: Option<String>,
}

/// Weight units accepted by the Admin API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WeightUnit {
    Grams,
    Kilograms,
    Ounces,
    #[default]
    Pounds,
}

impl std::str::FromStr for WeightUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "g" | "grams" => Ok(Self::Grams),
            "kg" | "kilograms" => Ok(Self::Kilograms),
            "oz" | "ounces" => Ok(Self::Ounces),
            "lb" | "lbs" | "pounds" => Ok(Self::Pounds),
            other => Err(format!("unknown weight unit: {other}")),
        }
    }
}

/// A shipping weight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weight {
    pub value: f64,
    pub unit: WeightUnit,
}

/// Changes applied to a variant through the Admin API.
#[derive(Debug, Clone, Default)]
pub struct VariantUpdate {
    /// New price, as a decimal string.
    pub price: Option<Decimal>,
    /// New shipping weight.
    pub weight: Option<Weight>,
}

/// A variant as returned by the Admin API after an update.
#[derive(Debug, Clone)]
pub struct UpdatedVariant {
    /// Variant ID.
    pub id: String,
    /// Variant title.
    pub title: String,
    /// Price as a decimal string.
    pub price: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use orchard_core::catalog::{SortOption, StockFilter, arrange};

    fn money(amount: &str) -> Money {
        Money {
            amount: amount.to_string(),
            currency_code: "USD".to_string(),
        }
    }

    fn variant(id: &str, available: bool, options: &[(&str, &str)]) -> ProductVariant {
        ProductVariant {
            id: id.to_string(),
            title: id.to_string(),
            available_for_sale: available,
            quantity_available: None,
            sku: None,
            weight: None,
            weight_unit: None,
            price: money("5.00"),
            compare_at_price: None,
            selected_options: options
                .iter()
                .map(|(name, value)| SelectedOption {
                    name: (*name).to_string(),
                    value: (*value).to_string(),
                })
                .collect(),
            image: None,
        }
    }

    fn product(title: &str, min_price: &str, variants: Vec<ProductVariant>) -> Product {
        Product {
            id: format!("gid://shopify/Product/{title}"),
            handle: title.to_lowercase(),
            title: title.to_string(),
            description: String::new(),
            description_html: String::new(),
            available_for_sale: variants.iter().any(|v| v.available_for_sale),
            kind: String::new(),
            vendor: "Orchard".to_string(),
            tags: vec![],
            created_at: None,
            price_range: PriceRange {
                min_variant_price: money(min_price),
                max_variant_price: money(min_price),
            },
            compare_at_price_range: None,
            featured_image: None,
            images: vec![],
            options: vec![ProductOption {
                id: "opt".to_string(),
                name: "Packaging".to_string(),
                values: vec!["Jar".to_string(), "Gift box".to_string()],
            }],
            variants,
        }
    }

    #[test]
    fn test_money_to_price() {
        let price = money("12.5").to_price().unwrap();
        assert_eq!(price.to_string(), "$12.50");
        assert!(money("n/a").to_price().is_none());
    }

    #[test]
    fn test_catalog_entry_counts_available_variants() {
        let p = product(
            "Honey",
            "5.00",
            vec![variant("a", true, &[]), variant("b", false, &[])],
        );
        assert_eq!(p.available_variant_count(), 1);
        assert_eq!(p.min_price(), Some(Decimal::new(500, 2)));
    }

    #[test]
    fn test_catalog_entry_without_variants_uses_product_flag() {
        let mut p = product("Honey", "5.00", vec![]);
        p.available_for_sale = true;
        assert_eq!(p.available_variant_count(), 1);
        p.available_for_sale = false;
        assert_eq!(p.available_variant_count(), 0);
    }

    #[test]
    fn test_catalog_entry_trusts_product_flag_past_fetched_variants() {
        // Fetched variants are all sold out but a later one is in stock
        let mut p = product("Honey", "5.00", vec![variant("a", false, &[])]);
        p.available_for_sale = true;
        assert_eq!(p.available_variant_count(), 1);
        assert!(StockFilter::InStock.admits(&p));

        p.available_for_sale = false;
        assert_eq!(p.available_variant_count(), 0);
        assert!(StockFilter::OutOfStock.admits(&p));
    }

    #[test]
    fn test_arrange_products_by_price() {
        let products = vec![
            product("B", "5", vec![variant("b", true, &[])]),
            product("A", "10", vec![variant("a", true, &[])]),
        ];
        let sorted = arrange(&products, SortOption::PriceDescending, StockFilter::All);
        assert_eq!(sorted[0].title, "A");
    }

    #[test]
    fn test_variant_for_options() {
        let p = product(
            "Honey",
            "5",
            vec![
                variant("jar", true, &[("Packaging", "Jar")]),
                variant("box", true, &[("Packaging", "Gift box")]),
            ],
        );

        let selected = p
            .variant_for_options(&[("packaging".to_string(), "Gift box".to_string())])
            .unwrap();
        assert_eq!(selected.id, "box");

        // Unknown option names are ignored, so the first variant matches
        let fallback = p
            .variant_for_options(&[("Color".to_string(), "Red".to_string())])
            .unwrap();
        assert_eq!(fallback.id, "jar");

        assert!(
            p.variant_for_options(&[("Packaging".to_string(), "Crate".to_string())])
                .is_none()
        );
    }

    #[test]
    fn test_weight_unit_parse() {
        assert_eq!("lb".parse::<WeightUnit>(), Ok(WeightUnit::Pounds));
        assert_eq!("KG".parse::<WeightUnit>(), Ok(WeightUnit::Kilograms));
        assert!("stone".parse::<WeightUnit>().is_err());
    }
}
