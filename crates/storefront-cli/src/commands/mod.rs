//! Command handlers for the CLI.
//!
//! Handlers fetch through [`storefront_client::StorefrontClient`] and hand
//! the records to the pure functions in `storefront_core`; formatting lives
//! in small helpers so it can be tested without the network.

pub(crate) mod bag;
pub(crate) mod catalog;

use storefront_client::StorefrontClient;
use storefront_core::{OptionSelection, Product};

/// Parses a `Name=Value` option argument. Both sides are trimmed; neither
/// may be empty.
pub(crate) fn parse_option_pair(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected Name=Value, got '{raw}'"))?;
    let (name, value) = (name.trim(), value.trim());
    if name.is_empty() || value.is_empty() {
        return Err(format!("expected Name=Value, got '{raw}'"));
    }
    Ok((name.to_owned(), value.to_owned()))
}

/// Builds a selection from `--option` pairs. A later pair for the same
/// option wins.
///
/// # Errors
///
/// Returns an error naming the offending pair if the product does not
/// declare that option or value.
pub(crate) fn selection_from_pairs(
    product: &Product,
    pairs: &[(String, String)],
) -> anyhow::Result<OptionSelection> {
    let mut selection = OptionSelection::new();
    for (name, value) in pairs {
        let Some(option) = product.option(name) else {
            let declared: Vec<&str> = product.options.iter().map(|o| o.name.as_str()).collect();
            anyhow::bail!(
                "{} has no option '{name}' (options: {})",
                product.handle,
                if declared.is_empty() {
                    "none".to_owned()
                } else {
                    declared.join(", ")
                }
            );
        };
        if !option.values.iter().any(|v| v == value) {
            anyhow::bail!(
                "'{value}' is not a value of {name} (values: {})",
                option.values.join(", ")
            );
        }
        selection.set(name.as_str(), value.as_str());
    }
    Ok(selection)
}

/// Looks up a product by handle, failing with a readable message if the
/// store does not have it.
pub(crate) async fn require_product(
    client: &StorefrontClient,
    handle: &str,
) -> anyhow::Result<Product> {
    client
        .fetch_product_by_handle(handle)
        .await?
        .ok_or_else(|| anyhow::anyhow!("no product with handle '{handle}'"))
}
