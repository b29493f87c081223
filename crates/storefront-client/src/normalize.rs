//! Normalization from Storefront API wire types to [`storefront_core`] records.

use storefront_core::{
    Collection, Image, Money, PriceRange, Product, ProductOption, SelectedOption, Shop, Variant,
};

use crate::types::{
    CartUserError, CollectionNode, ImageNode, MoneyNode, ProductNode, ShopNode, VariantNode,
};

#[must_use]
pub fn normalize_shop(shop: ShopNode) -> Shop {
    Shop {
        name: shop.name,
        description: shop.description.filter(|d| !d.trim().is_empty()),
    }
}

#[must_use]
pub fn normalize_collection(collection: CollectionNode) -> Collection {
    Collection {
        id: collection.id,
        title: collection.title,
        handle: collection.handle,
    }
}

/// Converts a product node into a [`Product`].
///
/// Absent connections become empty lists, an empty `productType` becomes
/// `None`, and blank tags are dropped.
#[must_use]
pub fn normalize_product(product: ProductNode) -> Product {
    let product_type = product
        .product_type
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty());

    let tags = product
        .tags
        .into_iter()
        .map(|t| t.trim().to_owned())
        .filter(|t| !t.is_empty())
        .collect();

    let images = product
        .images
        .map(|c| c.into_nodes().map(normalize_image).collect())
        .unwrap_or_default();

    let variants = product
        .variants
        .map(|c| c.into_nodes().map(normalize_variant).collect())
        .unwrap_or_default();

    Product {
        id: product.id,
        title: product.title,
        handle: product.handle,
        description_html: product.description_html.filter(|d| !d.is_empty()),
        product_type,
        tags,
        price_range: PriceRange {
            min_variant_price: normalize_money(product.price_range.min_variant_price),
        },
        images,
        options: product
            .options
            .into_iter()
            .map(|o| ProductOption {
                name: o.name,
                values: o.values,
            })
            .collect(),
        variants,
    }
}

fn normalize_variant(variant: VariantNode) -> Variant {
    Variant {
        id: variant.id,
        title: variant.title,
        price: normalize_money(variant.price),
        selected_options: variant
            .selected_options
            .into_iter()
            .map(|o| SelectedOption::new(o.name, o.value))
            .collect(),
        image: variant.image.map(normalize_image),
        available_for_sale: variant.available_for_sale,
    }
}

fn normalize_money(money: MoneyNode) -> Money {
    Money::new(money.amount, money.currency_code)
}

fn normalize_image(image: ImageNode) -> Image {
    Image {
        url: image.url,
        alt_text: image.alt_text,
    }
}

/// Joins cart `userErrors` into one shopper-facing message.
pub(crate) fn user_error_message(errors: &[CartUserError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
