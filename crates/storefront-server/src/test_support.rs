//! Catalog fixtures shared by server tests.

use rust_decimal::Decimal;
use storefront_core::{
    Catalog, Collection, Image, Money, PriceRange, Product, ProductOption, SelectedOption, Shop,
    Variant,
};

fn usd(cents: i64) -> Money {
    Money::new(Decimal::new(cents, 2), "USD")
}

fn variant(id: &str, size: Option<&str>, available: bool) -> Variant {
    Variant {
        id: id.to_owned(),
        title: size.unwrap_or("Default Title").to_owned(),
        price: usd(2_000),
        selected_options: size
            .map(|s| vec![SelectedOption::new("Size", s)])
            .unwrap_or_default(),
        image: None,
        available_for_sale: available,
    }
}

/// Sized tee: S sold out, M and L available.
pub fn sized_tee() -> Product {
    Product {
        id: "gid://shopify/Product/1".to_owned(),
        title: "Classic Tee".to_owned(),
        handle: "classic-tee".to_owned(),
        description_html: Some("<p>Soft cotton tee.</p>".to_owned()),
        product_type: Some("Shirts".to_owned()),
        tags: vec!["cotton".to_owned()],
        price_range: PriceRange {
            min_variant_price: usd(1_800),
        },
        images: vec![Image {
            url: "https://cdn.example.com/tee.jpg".to_owned(),
            alt_text: None,
        }],
        options: vec![ProductOption {
            name: "Size".to_owned(),
            values: vec!["S".to_owned(), "M".to_owned(), "L".to_owned()],
        }],
        variants: vec![
            variant("tee-s", Some("S"), false),
            variant("tee-m", Some("M"), true),
            variant("tee-l", Some("L"), true),
        ],
    }
}

/// Single-variant graphics card without size options.
pub fn gpu() -> Product {
    Product {
        id: "gid://shopify/Product/2".to_owned(),
        title: "RTX 4070 Super".to_owned(),
        handle: "rtx-4070-super".to_owned(),
        description_html: None,
        product_type: None,
        tags: Vec::new(),
        price_range: PriceRange {
            min_variant_price: usd(59_900),
        },
        images: Vec::new(),
        options: Vec::new(),
        variants: vec![variant("gpu-default", None, true)],
    }
}

pub fn catalog() -> Catalog {
    Catalog {
        shop: Shop {
            name: "Demo Store".to_owned(),
            description: Some("Everything, eventually.".to_owned()),
        },
        collections: vec![Collection {
            id: "gid://shopify/Collection/1".to_owned(),
            title: "Featured".to_owned(),
            handle: "featured".to_owned(),
        }],
        products: vec![sized_tee(), gpu()],
    }
}
