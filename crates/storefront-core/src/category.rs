//! Heuristic category buckets for catalog filtering.
//!
//! Categories are derived from free-text signals (title, product type, tags)
//! by case-insensitive substring matching. The matching rule sits behind
//! [`CategoryClassifier`] so a backend-provided category field can replace
//! [`KeywordClassifier`] without touching callers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::catalog::Product;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "all")]
    All,
    #[serde(rename = "clothing")]
    Clothing,
    #[serde(rename = "graphics cards")]
    GraphicsCards,
    #[serde(rename = "computer accessories")]
    ComputerAccessories,
}

impl Category {
    /// Every label in menu order.
    pub const ALL: [Category; 4] = [
        Category::All,
        Category::Clothing,
        Category::GraphicsCards,
        Category::ComputerAccessories,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::All => "all",
            Category::Clothing => "clothing",
            Category::GraphicsCards => "graphics cards",
            Category::ComputerAccessories => "computer accessories",
        }
    }

    /// Parses a label, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(label: &str) -> Option<Self> {
        let wanted = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(wanted))
    }

    /// Label with its first letter capitalized, as shown in the filter menu.
    #[must_use]
    pub fn display_name(self) -> String {
        let label = self.label();
        let mut chars = label.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Lower-case keywords that place a product in this category. Empty for
    /// [`Category::All`], which matches unconditionally.
    #[must_use]
    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            Category::All => &[],
            Category::Clothing => &["shirt", "top", "tee", "blouse", "glove", "mitts"],
            Category::GraphicsCards => &[
                "graphics card",
                "gpu",
                "video card",
                "rtx",
                "radeon",
                "nvidia",
                "geforce",
            ],
            Category::ComputerAccessories => &[
                "headset",
                "headphones",
                "earphones",
                "keyboard",
                "keypad",
                "mouse",
                "monitor",
                "webcam",
                "microphone",
                "speaker",
            ],
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown category \"{s}\""))
    }
}

/// Decides which categories a product belongs to.
pub trait CategoryClassifier {
    /// Returns `true` if `product` belongs to `category`. Must return `true`
    /// for [`Category::All`].
    fn matches(&self, product: &Product, category: Category) -> bool;

    /// `all` plus every category at least one product matches, in menu order.
    fn classify(&self, products: &[Product]) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|&c| c == Category::All || products.iter().any(|p| self.matches(p, c)))
            .collect()
    }

    /// Products in `label`, preserving input order.
    ///
    /// `all` and any label that does not parse return every product.
    fn filter<'a>(&self, products: &'a [Product], label: &str) -> Vec<&'a Product> {
        match Category::parse(label) {
            Some(Category::All) | None => products.iter().collect(),
            Some(category) => products
                .iter()
                .filter(|p| self.matches(p, category))
                .collect(),
        }
    }
}

/// Substring matching of [`Category::keywords`] against the lower-cased
/// title, product type and tags.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    fn contains_keyword(haystack: &str, keywords: &[&str]) -> bool {
        let lowered = haystack.to_lowercase();
        keywords.iter().any(|kw| lowered.contains(kw))
    }
}

impl CategoryClassifier for KeywordClassifier {
    fn matches(&self, product: &Product, category: Category) -> bool {
        if category == Category::All {
            return true;
        }

        let keywords = category.keywords();
        Self::contains_keyword(&product.title, keywords)
            || product
                .product_type
                .as_deref()
                .is_some_and(|t| Self::contains_keyword(t, keywords))
            || product
                .tags
                .iter()
                .any(|tag| Self::contains_keyword(tag, keywords))
    }
}

/// [`CategoryClassifier::classify`] with the default [`KeywordClassifier`].
#[must_use]
pub fn classify(products: &[Product]) -> Vec<Category> {
    KeywordClassifier.classify(products)
}

/// [`CategoryClassifier::matches`] with the default [`KeywordClassifier`].
#[must_use]
pub fn matches(product: &Product, category: Category) -> bool {
    KeywordClassifier.matches(product, category)
}

/// [`CategoryClassifier::filter`] with the default [`KeywordClassifier`].
#[must_use]
pub fn filter_products<'a>(products: &'a [Product], label: &str) -> Vec<&'a Product> {
    KeywordClassifier.filter(products, label)
}

#[cfg(test)]
#[path = "category_test.rs"]
mod tests;
