//! `orchard variant` commands.

use orchard_storefront::shopify::{VariantUpdate, Weight, WeightUnit};
use rust_decimal::Decimal;

use super::{CliError, admin_client, resolve_gid};

/// Update a variant's price and/or shipping weight.
pub async fn update(
    product: &str,
    variant: &str,
    price: Option<&str>,
    weight: Option<f64>,
    unit: &str,
) -> Result<(), CliError> {
    let update = VariantUpdate {
        price: price.map(parse_price).transpose()?,
        weight: weight.map(|value| parse_weight(value, unit)).transpose()?,
    };
    if update.price.is_none() && update.weight.is_none() {
        return Err(CliError::InvalidArgument(
            "update",
            "pass --price and/or --weight".to_string(),
        ));
    }

    let product_id = resolve_gid("Product", product)?;
    let variant_id = resolve_gid("ProductVariant", variant)?;
    let client = admin_client()?;

    let updated = client.update_variant(&product_id, &variant_id, update).await?;

    tracing::info!("Variant updated successfully!");
    tracing::info!("  ID: {}", updated.id);
    tracing::info!("  Title: {}", updated.title);
    tracing::info!("  Price: {}", updated.price);

    Ok(())
}

fn parse_price(input: &str) -> Result<Decimal, CliError> {
    let price: Decimal = input
        .trim()
        .trim_start_matches('$')
        .parse()
        .map_err(|_| CliError::InvalidArgument("price", input.to_string()))?;

    if price <= Decimal::ZERO {
        return Err(CliError::InvalidArgument("price", "must be positive".to_string()));
    }
    Ok(price.round_dp(2))
}

fn parse_weight(value: f64, unit: &str) -> Result<Weight, CliError> {
    if !value.is_finite() || value < 0.0 {
        return Err(CliError::InvalidArgument("weight", value.to_string()));
    }
    let unit: WeightUnit = unit
        .parse()
        .map_err(|e: String| CliError::InvalidArgument("unit", e))?;
    Ok(Weight { value, unit })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("$42.5").ok(), Some(Decimal::new(4250, 2)));
        assert!(parse_price("0").is_err());
        assert!(parse_price("free").is_err());
    }

    #[test]
    fn test_parse_weight() {
        let weight = parse_weight(2.5, "kg").ok();
        assert_eq!(weight.map(|w| w.unit), Some(WeightUnit::Kilograms));
        assert!(parse_weight(-1.0, "kg").is_err());
        assert!(parse_weight(1.0, "stone").is_err());
    }
}
