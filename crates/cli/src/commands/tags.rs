//! `orchard tags` commands.

use super::{CliError, admin_client, resolve_gid};

/// Add tags to a product.
pub async fn add(id: &str, tags: &[String]) -> Result<(), CliError> {
    let tags: Vec<String> = tags
        .iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect();
    if tags.is_empty() {
        return Err(CliError::InvalidArgument("tags", "at least one tag is required".to_string()));
    }

    let id = resolve_gid("Product", id)?;
    let client = admin_client()?;

    let tagged = client.add_tags(&id, &tags).await?;
    tracing::info!("Tagged {} with: {}", tagged, tags.join(", "));

    Ok(())
}
