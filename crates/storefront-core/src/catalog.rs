//! Catalog records as the storefront sees them.
//!
//! These are immutable snapshots built from the commerce backend's response.
//! Fields the lighter list queries omit (`description_html`, `product_type`,
//! `tags`, `options`, `variants`) default to empty so the classifier and the
//! resolver can run against either shape.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Characters shown on a product card before the description is cut off.
pub const CARD_DESCRIPTION_LIMIT: usize = 250;

/// A decimal amount in a specific currency, e.g. `12.99 USD`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    pub amount: Decimal,
    /// ISO 4217 currency code (e.g., `"USD"`).
    pub currency_code: String,
}

impl Money {
    #[must_use]
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }

    /// Formats the amount for display: `$12.99`, `€8.00`, `¥1200`, or
    /// `12.99 SEK` for currencies without a known symbol.
    #[must_use]
    pub fn display(&self) -> String {
        let (symbol, scale) = match self.currency_code.as_str() {
            "USD" | "CAD" | "AUD" | "NZD" => (Some("$"), 2),
            "EUR" => (Some("€"), 2),
            "GBP" => (Some("£"), 2),
            "JPY" => (Some("¥"), 0),
            _ => (None, 2),
        };

        let mut amount = self.amount.round_dp(scale);
        amount.rescale(scale);

        match symbol {
            Some(symbol) if amount.is_sign_negative() => format!("-{symbol}{}", amount.abs()),
            Some(symbol) => format!("{symbol}{amount}"),
            None => format!("{amount} {}", self.currency_code),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min_variant_price: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

impl Image {
    /// Alt text for the image, falling back to `fallback` (usually the
    /// product title) when the backend has none.
    #[must_use]
    pub fn alt_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.alt_text
            .as_deref()
            .filter(|alt| !alt.is_empty())
            .unwrap_or(fallback)
    }
}

/// A named axis of variation with its declared values, e.g. `Size: [S, M, L]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

/// One `name → value` assignment carried by a variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SelectedOption {
    pub name: String,
    pub value: String,
}

impl SelectedOption {
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A specific purchasable configuration of a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    pub id: String,
    pub title: String,
    pub price: Money,
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
    /// Overrides the product's first image when present.
    #[serde(default)]
    pub image: Option<Image>,
    pub available_for_sale: bool,
}

impl Variant {
    /// Returns the value this variant assigns to option `name`, if any.
    #[must_use]
    pub fn option_value(&self, name: &str) -> Option<&str> {
        self.selected_options
            .iter()
            .find(|opt| opt.name == name)
            .map(|opt| opt.value.as_str())
    }

    /// Returns `true` if this variant carries exactly the pair `name = value`.
    #[must_use]
    pub fn has_option(&self, name: &str, value: &str) -> bool {
        self.selected_options
            .iter()
            .any(|opt| opt.name == name && opt.value == value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    /// URL slug, e.g. `"classic-tee"`.
    pub handle: String,
    #[serde(default)]
    pub description_html: Option<String>,
    /// Free-text type from the backend. Empty strings are stored as `None`.
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub price_range: PriceRange,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub options: Vec<ProductOption>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

/// Plain-text description prepared for a product card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Description {
    pub text: String,
    /// `true` when `text` was cut and a "read more" affordance applies.
    pub truncated: bool,
}

impl Product {
    #[must_use]
    pub fn first_image(&self) -> Option<&Image> {
        self.images.first()
    }

    #[must_use]
    pub fn min_price(&self) -> &Money {
        &self.price_range.min_variant_price
    }

    /// Looks up a declared option by exact name.
    #[must_use]
    pub fn option(&self, name: &str) -> Option<&ProductOption> {
        self.options.iter().find(|opt| opt.name == name)
    }

    #[must_use]
    pub fn variant(&self, id: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == id)
    }

    /// Returns `true` if at least one variant is currently purchasable.
    #[must_use]
    pub fn has_available_variants(&self) -> bool {
        self.variants.iter().any(|v| v.available_for_sale)
    }

    /// The description with HTML tags removed, or `None` when the product has
    /// no description.
    #[must_use]
    pub fn plain_description(&self) -> Option<String> {
        self.description_html.as_deref().map(strip_tags)
    }

    /// The plain description cut to `limit` characters, with `...` appended
    /// when anything was removed.
    #[must_use]
    pub fn truncated_description(&self, limit: usize) -> Option<Description> {
        let text = self.plain_description()?;
        if text.chars().count() <= limit {
            return Some(Description {
                text,
                truncated: false,
            });
        }

        let mut cut: String = text.chars().take(limit).collect();
        cut.push_str("...");
        Some(Description {
            text: cut,
            truncated: true,
        })
    }
}

/// Removes markup tags, keeping any `<` that does not open one.
///
/// A tag starts with `<` followed by a letter, `/`, `!` or `?`, and ends at
/// the next `>` before another `<`.
fn strip_tags(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match tag_len(after) {
            Some(len) => rest = &after[len..],
            None => {
                out.push('<');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Length of a tag body up to and including `>`, when `after` (the text
/// following a `<`) opens one.
fn tag_len(after: &str) -> Option<usize> {
    let first = after.chars().next()?;
    if !(first.is_ascii_alphabetic() || matches!(first, '/' | '!' | '?')) {
        return None;
    }
    let close = after.find('>')?;
    if after[..close].contains('<') {
        return None;
    }
    Some(close + 1)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shop {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub title: String,
    pub handle: String,
}

/// Everything the storefront renders, fetched together as one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub shop: Shop,
    #[serde(default)]
    pub collections: Vec<Collection>,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl Catalog {
    #[must_use]
    pub fn product_by_handle(&self, handle: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.handle == handle)
    }
}
