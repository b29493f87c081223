//! JSON shapes rendered from core records.

use serde::Serialize;
use storefront_core::{
    has_standard_size_options, option_picker, resolve_variant, Category, CategoryClassifier,
    Description, Image, OptionChoices, OptionSelection, Product, SelectedOption, Variant,
    CARD_DESCRIPTION_LIMIT,
};

#[derive(Debug, Clone, Serialize)]
pub struct ImageView {
    pub url: String,
    /// The image's alt text, or the product title when it has none.
    pub alt_text: String,
}

impl ImageView {
    pub fn new(image: &Image, title: &str) -> Self {
        Self {
            url: image.url.clone(),
            alt_text: image.alt_or(title).to_owned(),
        }
    }
}

/// A product tile in the grid.
#[derive(Debug, Serialize)]
pub struct ProductCard {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub price: String,
    pub image: Option<ImageView>,
    pub description: Option<Description>,
    pub categories: Vec<Category>,
    pub available: bool,
}

impl ProductCard {
    pub fn new(product: &Product, classifier: &dyn CategoryClassifier) -> Self {
        let categories = Category::ALL
            .into_iter()
            .filter(|&c| c != Category::All && classifier.matches(product, c))
            .collect();

        Self {
            id: product.id.clone(),
            title: product.title.clone(),
            handle: product.handle.clone(),
            price: product.min_price().display(),
            image: product
                .first_image()
                .map(|img| ImageView::new(img, &product.title)),
            description: product.truncated_description(CARD_DESCRIPTION_LIMIT),
            categories,
            available: product.variants.is_empty() || product.has_available_variants(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct VariantView {
    pub id: String,
    pub title: String,
    pub price: String,
    pub selected_options: Vec<SelectedOption>,
    pub image: Option<ImageView>,
    pub available_for_sale: bool,
}

impl VariantView {
    pub fn new(variant: &Variant, product_title: &str) -> Self {
        Self {
            id: variant.id.clone(),
            title: variant.title.clone(),
            price: variant.price.display(),
            selected_options: variant.selected_options.clone(),
            image: variant
                .image
                .as_ref()
                .map(|img| ImageView::new(img, product_title)),
            available_for_sale: variant.available_for_sale,
        }
    }
}

/// Full product page: card data plus images, option picker and variants.
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub card: ProductCard,
    pub description_html: Option<String>,
    pub images: Vec<ImageView>,
    pub has_size_options: bool,
    pub options: Vec<OptionChoices>,
    pub variants: Vec<VariantView>,
    /// What an empty selection resolves to.
    pub default_variant_id: Option<String>,
}

impl ProductDetail {
    pub fn new(product: &Product, classifier: &dyn CategoryClassifier) -> Self {
        let empty = OptionSelection::new();
        Self {
            card: ProductCard::new(product, classifier),
            description_html: product.description_html.clone(),
            images: product
                .images
                .iter()
                .map(|img| ImageView::new(img, &product.title))
                .collect(),
            has_size_options: has_standard_size_options(product),
            options: option_picker(product, &empty),
            variants: product
                .variants
                .iter()
                .map(|v| VariantView::new(v, &product.title))
                .collect(),
            default_variant_id: resolve_variant(product, &empty).map(|v| v.id.clone()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub label: Category,
    pub display_name: String,
}

impl From<Category> for CategoryView {
    fn from(category: Category) -> Self {
        Self {
            label: category,
            display_name: category.display_name(),
        }
    }
}
