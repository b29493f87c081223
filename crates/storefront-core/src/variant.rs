//! Mapping an option selection to a single purchasable variant.

use crate::catalog::{Image, Money, Product, Variant};
use crate::options::OptionSelection;

const STANDARD_SIZES: [&str; 8] = ["xs", "s", "m", "l", "xl", "xxl", "2xl", "3xl"];

/// Returns `true` if `value` is one of `xs, s, m, l, xl, xxl, 2xl, 3xl`,
/// ignoring case and surrounding whitespace.
#[must_use]
pub fn is_standard_size(value: &str) -> bool {
    let value = value.trim();
    STANDARD_SIZES
        .iter()
        .any(|size| size.eq_ignore_ascii_case(value))
}

/// Returns `true` if the product declares a "size" option (by name, any case)
/// whose every declared value is a standard apparel size.
///
/// Only these products are option-driven; everything else resolves to its
/// first available variant.
#[must_use]
pub fn has_standard_size_options(product: &Product) -> bool {
    product.options.iter().any(|option| {
        option.name.to_lowercase().contains("size")
            && option.values.iter().all(|value| is_standard_size(value))
    })
}

/// Resolves the variant implied by `selection`.
///
/// - Without standard size options the selection is ignored and the first
///   variant available for sale is returned.
/// - With standard size options the first variant whose every option pair
///   agrees with `selection` is returned. An option missing from the
///   selection fails the match; there is no partial resolution.
#[must_use]
pub fn resolve_variant<'a>(product: &'a Product, selection: &OptionSelection) -> Option<&'a Variant> {
    if !has_standard_size_options(product) {
        return product.variants.iter().find(|v| v.available_for_sale);
    }

    product.variants.iter().find(|variant| {
        variant
            .selected_options
            .iter()
            .all(|opt| selection.get(&opt.name) == Some(opt.value.as_str()))
    })
}

/// Price to show: the resolved variant's, else the product's minimum.
#[must_use]
pub fn display_price<'a>(product: &'a Product, variant: Option<&'a Variant>) -> &'a Money {
    variant.map_or_else(|| product.min_price(), |v| &v.price)
}

/// Image to show: the resolved variant's override, else the product's first.
#[must_use]
pub fn display_image<'a>(product: &'a Product, variant: Option<&'a Variant>) -> Option<&'a Image> {
    variant
        .and_then(|v| v.image.as_ref())
        .or_else(|| product.first_image())
}

#[cfg(test)]
#[path = "variant_test.rs"]
mod tests;
