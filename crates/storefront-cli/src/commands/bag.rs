use storefront_client::StorefrontClient;
use storefront_core::{resolve_variant, AddToBag, BagState};

use super::{require_product, selection_from_pairs};

/// Add the variant that `pairs` resolve to on `handle` to a new cart and
/// print its checkout URL.
///
/// Refuses when no variant resolves, the same way the add-to-bag button is
/// disabled.
///
/// # Errors
///
/// Returns an error if the product or variant cannot be resolved, or the
/// cart mutation fails.
pub(crate) async fn run_add(
    client: &StorefrontClient,
    handle: &str,
    pairs: &[(String, String)],
    quantity: u32,
) -> anyhow::Result<()> {
    let product = require_product(client, handle).await?;
    let selection = selection_from_pairs(&product, pairs)?;
    let variant = resolve_variant(&product, &selection);

    let mut bag = AddToBag::new();
    let Some(submission) = bag.begin(variant, quantity) else {
        anyhow::bail!(
            "no purchasable variant of {handle} for this selection; see `storefront-cli show {handle}`"
        );
    };

    tracing::info!(
        handle,
        variant_id = %submission.line.variant_id,
        quantity,
        "creating cart"
    );
    let result = client.create_cart(std::slice::from_ref(&submission.line)).await;
    let cart = match result {
        Ok(cart) => {
            bag.finish(submission.generation, Ok(()));
            cart
        }
        Err(e) => {
            tracing::error!(handle, error = %e, "cart create failed");
            return Err(anyhow::Error::new(e).context("could not add to bag"));
        }
    };
    debug_assert_eq!(bag.state(), &BagState::Success);

    println!("{} x{quantity}: {}", product.title, bag.button_label());
    println!("cart: {}", cart.id);
    println!("checkout: {}", cart.checkout_url);
    Ok(())
}
