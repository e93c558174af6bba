//! Type-safe price representation using decimal arithmetic.
//!
//! Shopify returns money as a decimal string plus an ISO 4217 code. Prices
//! are parsed into [`rust_decimal::Decimal`] so that sorting and formatting
//! never go through floating point.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is not a decimal number.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    /// The currency code is not supported.
    #[error("unsupported currency code: {0}")]
    UnknownCurrency(String),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Create a price from an amount in minor units (cents).
    #[must_use]
    pub fn from_cents(cents: i64, currency_code: CurrencyCode) -> Self {
        Self::new(Decimal::new(cents, 2), currency_code)
    }

    /// Parse a Shopify `MoneyV2` pair (`"19.5"`, `"USD"`).
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is not a decimal or the currency is not
    /// one of the supported codes.
    pub fn parse(amount: &str, currency_code: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(amount.trim())
            .map_err(|_| PriceError::InvalidAmount(amount.to_owned()))?;
        let currency_code = currency_code.parse()?;
        Ok(Self::new(amount, currency_code))
    }

    /// Whether the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:.2}",
            self.currency_code.symbol(),
            self.amount.round_dp(2)
        )
    }
}

/// ISO 4217 currency codes the storefront sells in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

impl CurrencyCode {
    /// Display symbol.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::USD | Self::CAD | Self::AUD => "$",
            Self::EUR => "€",
            Self::GBP => "£",
        }
    }

    /// Three-letter code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::USD => "USD",
            Self::EUR => "EUR",
            Self::GBP => "GBP",
            Self::CAD => "CAD",
            Self::AUD => "AUD",
        }
    }
}

impl FromStr for CurrencyCode {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Self::USD),
            "EUR" => Ok(Self::EUR),
            "GBP" => Ok(Self::GBP),
            "CAD" => Ok(Self::CAD),
            "AUD" => Ok(Self::AUD),
            _ => Err(PriceError::UnknownCurrency(s.to_owned())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_shopify_money() {
        let price = Price::parse("19.5", "USD").unwrap();
        assert_eq!(price.amount, Decimal::new(195, 1));
        assert_eq!(price.currency_code, CurrencyCode::USD);
    }

    #[test]
    fn test_parse_lowercase_currency() {
        let price = Price::parse("3.00", "gbp").unwrap();
        assert_eq!(price.currency_code, CurrencyCode::GBP);
    }

    #[test]
    fn test_parse_invalid_amount() {
        assert!(matches!(
            Price::parse("free", "USD"),
            Err(PriceError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_parse_unknown_currency() {
        assert!(matches!(
            Price::parse("1.00", "JPY"),
            Err(PriceError::UnknownCurrency(_))
        ));
    }

    #[test]
    fn test_display_pads_to_cents() {
        assert_eq!(Price::parse("10", "USD").unwrap().to_string(), "$10.00");
        assert_eq!(Price::parse("4.5", "EUR").unwrap().to_string(), "€4.50");
        assert_eq!(Price::from_cents(1999, CurrencyCode::GBP).to_string(), "£19.99");
    }

    #[test]
    fn test_is_zero() {
        assert!(Price::parse("0.0", "USD").unwrap().is_zero());
        assert!(!Price::parse("0.01", "USD").unwrap().is_zero());
    }
}
