//! In-memory sort and stock filtering for a fetched page of products.
//!
//! Collection pages fetch one page of products from Shopify and let the
//! shopper reorder or narrow it without another round trip. [`arrange`] is a
//! pure function over anything implementing [`CatalogEntry`]; it never
//! mutates its input.
//!
//! Sorting is stable, so equal keys keep their fetched (merchandised) order
//! and re-applying the same sort is a no-op.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The fields a product must expose to be sorted and filtered.
pub trait CatalogEntry {
    /// Display title.
    fn title(&self) -> &str;

    /// Minimum variant price, if it could be parsed.
    fn min_price(&self) -> Option<Decimal>;

    /// Creation timestamp, if known.
    fn created_at(&self) -> Option<DateTime<Utc>>;

    /// Number of variants currently available for sale.
    fn available_variant_count(&self) -> usize;
}

/// Sort options accepted in the `sort` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    /// Platform order, unchanged.
    #[default]
    Manual,
    /// Identity: true best-seller ranking needs server-side sales data.
    BestSelling,
    TitleAscending,
    TitleDescending,
    PriceAscending,
    PriceDescending,
    #[serde(alias = "created-at-ascending")]
    CreatedAscending,
    #[serde(alias = "created-at-descending")]
    CreatedDescending,
}

impl SortOption {
    /// Every option, in the order the sort menu lists them.
    pub const ALL: [Self; 8] = [
        Self::Manual,
        Self::BestSelling,
        Self::TitleAscending,
        Self::TitleDescending,
        Self::PriceAscending,
        Self::PriceDescending,
        Self::CreatedAscending,
        Self::CreatedDescending,
    ];

    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::BestSelling => "best-selling",
            Self::TitleAscending => "title-ascending",
            Self::TitleDescending => "title-descending",
            Self::PriceAscending => "price-ascending",
            Self::PriceDescending => "price-descending",
            Self::CreatedAscending => "created-ascending",
            Self::CreatedDescending => "created-descending",
        }
    }

    /// Label for the sort menu.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Manual => "Featured",
            Self::BestSelling => "Best selling",
            Self::TitleAscending => "Alphabetically, A-Z",
            Self::TitleDescending => "Alphabetically, Z-A",
            Self::PriceAscending => "Price, low to high",
            Self::PriceDescending => "Price, high to low",
            Self::CreatedAscending => "Date, old to new",
            Self::CreatedDescending => "Date, new to old",
        }
    }

    /// Parse a query value, falling back to [`SortOption::Manual`].
    #[must_use]
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "created-at-ascending" => Ok(Self::CreatedAscending),
            "created-at-descending" => Ok(Self::CreatedDescending),
            other => Self::ALL
                .into_iter()
                .find(|option| option.as_str() == other)
                .ok_or_else(|| UnknownOption(other.to_owned())),
        }
    }
}

/// Stock filter accepted in the `stock` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockFilter {
    #[default]
    All,
    /// At least one available variant.
    InStock,
    /// No available variants.
    OutOfStock,
}

impl StockFilter {
    /// Every filter, in menu order.
    pub const ALL: [Self; 3] = [Self::All, Self::InStock, Self::OutOfStock];

    /// Query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::InStock => "in-stock",
            Self::OutOfStock => "out-of-stock",
        }
    }

    /// Label for the filter menu.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::All => "All products",
            Self::InStock => "In stock",
            Self::OutOfStock => "Out of stock",
        }
    }

    /// Parse a query value, falling back to [`StockFilter::All`].
    #[must_use]
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }

    /// Whether an entry passes this filter.
    #[must_use]
    pub fn admits<T: CatalogEntry + ?Sized>(self, entry: &T) -> bool {
        match self {
            Self::All => true,
            Self::InStock => entry.available_variant_count() > 0,
            Self::OutOfStock => entry.available_variant_count() == 0,
        }
    }
}

impl fmt::Display for StockFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockFilter {
    type Err = UnknownOption;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str() == s.trim())
            .ok_or_else(|| UnknownOption(s.to_owned()))
    }
}

/// A sort or filter query value that names no known option.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown option: {0}")]
pub struct UnknownOption(pub String);

/// Filter then sort a page of products, returning a new vector.
#[must_use]
pub fn arrange<T>(products: &[T], sort: SortOption, stock: StockFilter) -> Vec<T>
where
    T: CatalogEntry + Clone,
{
    let mut arranged: Vec<T> = products
        .iter()
        .filter(|product| stock.admits(*product))
        .cloned()
        .collect();

    match sort {
        SortOption::Manual | SortOption::BestSelling => {}
        SortOption::TitleAscending => arranged.sort_by(|a, b| compare_titles(a, b)),
        SortOption::TitleDescending => arranged.sort_by(|a, b| compare_titles(b, a)),
        SortOption::PriceAscending => {
            arranged.sort_by(|a, b| last_if_missing(a.min_price(), b.min_price(), Ord::cmp));
        }
        SortOption::PriceDescending => {
            arranged.sort_by(|a, b| last_if_missing(a.min_price(), b.min_price(), |x, y| y.cmp(x)));
        }
        SortOption::CreatedAscending => {
            arranged.sort_by(|a, b| last_if_missing(a.created_at(), b.created_at(), Ord::cmp));
        }
        SortOption::CreatedDescending => {
            arranged
                .sort_by(|a, b| last_if_missing(a.created_at(), b.created_at(), |x, y| y.cmp(x)));
        }
    }

    arranged
}

/// Case-insensitive comparison, with a case-sensitive tiebreak so the order
/// is total.
fn compare_titles<T: CatalogEntry>(a: &T, b: &T) -> Ordering {
    let (a, b) = (a.title(), b.title());
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Entries without a key sort after every entry with one, in either direction.
fn last_if_missing<K>(a: Option<K>, b: Option<K>, cmp: impl Fn(&K, &K) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        title: &'static str,
        price: Option<Decimal>,
        created: Option<DateTime<Utc>>,
        available: Vec<bool>,
    }

    impl CatalogEntry for Item {
        fn title(&self) -> &str {
            self.title
        }

        fn min_price(&self) -> Option<Decimal> {
            self.price
        }

        fn created_at(&self) -> Option<DateTime<Utc>> {
            self.created
        }

        fn available_variant_count(&self) -> usize {
            self.available.iter().filter(|a| **a).count()
        }
    }

    fn item(title: &'static str, price: i64) -> Item {
        Item {
            title,
            price: Some(Decimal::new(price, 0)),
            created: None,
            available: vec![true],
        }
    }

    fn titles(items: &[Item]) -> Vec<&'static str> {
        items.iter().map(|i| i.title).collect()
    }

    fn sample() -> Vec<Item> {
        vec![
            Item {
                created: Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
                ..item("Honey", 12)
            },
            Item {
                created: Some(Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()),
                available: vec![false, false],
                ..item("apple butter", 7)
            },
            Item {
                created: Some(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()),
                ..item("Cider", 12)
            },
            Item {
                available: vec![false, true],
                ..item("Brittle", 3)
            },
        ]
    }

    #[test]
    fn test_title_and_price_scenario() {
        let products = vec![item("B", 5), item("A", 10)];

        let by_title = arrange(&products, SortOption::TitleAscending, StockFilter::All);
        assert_eq!(titles(&by_title), vec!["A", "B"]);

        let by_price = arrange(&products, SortOption::PriceDescending, StockFilter::All);
        assert_eq!(titles(&by_price), vec!["A", "B"]);
        assert_eq!(by_price[0].price, Some(Decimal::new(10, 0)));
    }

    #[test]
    fn test_out_of_stock_scenario() {
        let products = vec![
            Item {
                available: vec![true],
                ..item("product 1", 1)
            },
            Item {
                available: vec![false],
                ..item("product 2", 1)
            },
        ];

        let result = arrange(&products, SortOption::Manual, StockFilter::OutOfStock);
        assert_eq!(titles(&result), vec!["product 2"]);
    }

    #[test]
    fn test_title_sort_ignores_case() {
        let sorted = arrange(&sample(), SortOption::TitleAscending, StockFilter::All);
        assert_eq!(
            titles(&sorted),
            vec!["apple butter", "Brittle", "Cider", "Honey"]
        );

        let reversed = arrange(&sample(), SortOption::TitleDescending, StockFilter::All);
        assert_eq!(
            titles(&reversed),
            vec!["Honey", "Cider", "Brittle", "apple butter"]
        );
    }

    #[test]
    fn test_price_directions_reverse_except_ties() {
        let ascending = arrange(&sample(), SortOption::PriceAscending, StockFilter::All);
        let descending = arrange(&sample(), SortOption::PriceDescending, StockFilter::All);

        assert_eq!(
            titles(&ascending),
            vec!["Brittle", "apple butter", "Honey", "Cider"]
        );
        // Honey and Cider tie at 12 and keep their fetched order both ways
        assert_eq!(
            titles(&descending),
            vec!["Honey", "Cider", "apple butter", "Brittle"]
        );
    }

    #[test]
    fn test_sorting_is_idempotent() {
        for sort in SortOption::ALL {
            let once = arrange(&sample(), sort, StockFilter::All);
            let twice = arrange(&once, sort, StockFilter::All);
            assert_eq!(once, twice, "{sort} is not idempotent");
        }
    }

    #[test]
    fn test_created_sort_puts_unknown_last() {
        let ascending = arrange(&sample(), SortOption::CreatedAscending, StockFilter::All);
        assert_eq!(
            titles(&ascending),
            vec!["apple butter", "Honey", "Cider", "Brittle"]
        );

        let descending = arrange(&sample(), SortOption::CreatedDescending, StockFilter::All);
        assert_eq!(
            titles(&descending),
            vec!["Cider", "Honey", "apple butter", "Brittle"]
        );
    }

    #[test]
    fn test_missing_price_sorts_last() {
        let products = vec![
            Item {
                price: None,
                ..item("Mystery", 0)
            },
            item("Jam", 4),
        ];
        for sort in [SortOption::PriceAscending, SortOption::PriceDescending] {
            let sorted = arrange(&products, sort, StockFilter::All);
            assert_eq!(titles(&sorted), vec!["Jam", "Mystery"]);
        }
    }

    #[test]
    fn test_manual_and_best_selling_are_identity() {
        for sort in [SortOption::Manual, SortOption::BestSelling] {
            assert_eq!(arrange(&sample(), sort, StockFilter::All), sample());
        }
    }

    #[test]
    fn test_stock_filters_partition_input() {
        let products = sample();
        let in_stock = arrange(&products, SortOption::Manual, StockFilter::InStock);
        let out_of_stock = arrange(&products, SortOption::Manual, StockFilter::OutOfStock);

        assert_eq!(in_stock.len() + out_of_stock.len(), products.len());
        for product in &products {
            let hits = in_stock.iter().filter(|p| *p == product).count()
                + out_of_stock.iter().filter(|p| *p == product).count();
            assert_eq!(hits, 1, "{} not partitioned", product.title);
        }
        assert_eq!(titles(&out_of_stock), vec!["apple butter"]);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let products = sample();
        let _ = arrange(&products, SortOption::TitleDescending, StockFilter::InStock);
        assert_eq!(products, sample());
    }

    #[test]
    fn test_parse_query_values() {
        assert_eq!(
            SortOption::parse_or_default(Some("price-descending")),
            SortOption::PriceDescending
        );
        assert_eq!(
            SortOption::parse_or_default(Some("created-at-ascending")),
            SortOption::CreatedAscending
        );
        assert_eq!(SortOption::parse_or_default(Some("bogus")), SortOption::Manual);
        assert_eq!(SortOption::parse_or_default(None), SortOption::Manual);
        assert_eq!(
            StockFilter::parse_or_default(Some("in-stock")),
            StockFilter::InStock
        );
        assert_eq!(StockFilter::parse_or_default(Some("")), StockFilter::All);
    }

    #[test]
    fn test_option_strings_round_trip() {
        for sort in SortOption::ALL {
            assert_eq!(sort.as_str().parse::<SortOption>(), Ok(sort));
        }
        for filter in StockFilter::ALL {
            assert_eq!(filter.as_str().parse::<StockFilter>(), Ok(filter));
        }
    }
}
