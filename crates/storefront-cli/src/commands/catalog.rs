use storefront_client::StorefrontClient;
use storefront_core::{
    display_image, display_price, filter_products, has_standard_size_options, matches,
    option_picker, resolve_variant, Category, OptionSelection, Product, CARD_DESCRIPTION_LIMIT,
};

use super::{require_product, selection_from_pairs};

/// Print the category menu for the current catalog.
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
pub(crate) async fn run_categories(client: &StorefrontClient) -> anyhow::Result<()> {
    let products = client.fetch_all_products().await?;
    for category in storefront_core::classify(&products) {
        let count = filter_products(&products, category.label()).len();
        println!("{:<24}{count}", category.display_name());
    }
    Ok(())
}

/// Print one line per product in `category` (every product when absent or
/// unknown).
///
/// # Errors
///
/// Returns an error if the catalog cannot be fetched.
pub(crate) async fn run_products(
    client: &StorefrontClient,
    category: Option<&str>,
) -> anyhow::Result<()> {
    let products = client.fetch_all_products().await?;
    let label = category.unwrap_or("all");
    if category.is_some() && Category::parse(label).is_none() {
        tracing::warn!(category = label, "unknown category, showing every product");
    }

    let shown = filter_products(&products, label);
    if shown.is_empty() {
        println!("no products");
        return Ok(());
    }

    println!("{:<32}{:>12}  TITLE", "HANDLE", "PRICE");
    for product in shown {
        println!("{}", product_row(product));
    }
    Ok(())
}

/// Print a product page for `handle` with the given option choices.
///
/// # Errors
///
/// Returns an error if the product does not exist, an option pair is not
/// declared on it, or the request fails.
pub(crate) async fn run_show(
    client: &StorefrontClient,
    handle: &str,
    pairs: &[(String, String)],
) -> anyhow::Result<()> {
    let product = require_product(client, handle).await?;
    let selection = selection_from_pairs(&product, pairs)?;
    print!("{}", render_product(&product, &selection));
    Ok(())
}

fn product_categories(product: &Product) -> Vec<String> {
    Category::ALL
        .into_iter()
        .filter(|&c| c != Category::All && matches(product, c))
        .map(|c| c.label().to_owned())
        .collect()
}

pub(crate) fn product_row(product: &Product) -> String {
    let mut row = format!(
        "{:<32}{:>12}  {}",
        product.handle,
        product.min_price().display(),
        product.title
    );
    if !product.has_available_variants() && !product.variants.is_empty() {
        row.push_str(" (sold out)");
    }
    let categories = product_categories(product);
    if !categories.is_empty() {
        row.push_str(&format!(" [{}]", categories.join(", ")));
    }
    row
}

/// Renders the terminal product page: title, price, description, option
/// picker and what the selection resolves to.
pub(crate) fn render_product(product: &Product, selection: &OptionSelection) -> String {
    let variant = resolve_variant(product, selection);
    let mut lines = vec![
        product.title.clone(),
        display_price(product, variant).display(),
    ];
    if let Some(image) = display_image(product, variant) {
        lines.push(format!("image: {} ({})", image.url, image.alt_or(&product.title)));
    }
    if let Some(description) = product.truncated_description(CARD_DESCRIPTION_LIMIT) {
        lines.push(String::new());
        lines.push(description.text);
    }

    if has_standard_size_options(product) {
        lines.push(String::new());
        for choices in option_picker(product, selection) {
            let values: Vec<String> = choices
                .values
                .iter()
                .map(|v| match (v.selected, v.available) {
                    (true, _) => format!("[{}]", v.value),
                    (false, true) => v.value.clone(),
                    (false, false) => format!("{} (unavailable)", v.value),
                })
                .collect();
            lines.push(format!("{}: {}", choices.name, values.join("  ")));
        }
    }

    lines.push(String::new());
    lines.push(match variant {
        Some(v) => format!("variant: {} ({})", v.title, v.id),
        None => {
            let missing: Vec<&str> = product
                .options
                .iter()
                .filter(|o| selection.get(&o.name).is_none())
                .map(|o| o.name.as_str())
                .collect();
            if missing.is_empty() {
                "variant: none available for this selection".to_owned()
            } else {
                format!("variant: choose {}", missing.join(", "))
            }
        }
    });

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
