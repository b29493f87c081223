use rust_decimal::Decimal;
use storefront_core::{
    Image, Money, OptionSelection, PriceRange, Product, ProductOption, SelectedOption, Variant,
};

use super::*;
use crate::commands::catalog::{product_row, render_product};
use crate::commands::selection_from_pairs;

fn tee() -> Product {
    let variant = |id: &str, size: &str, available: bool| Variant {
        id: id.to_owned(),
        title: size.to_owned(),
        price: Money::new(Decimal::new(2_000, 2), "USD"),
        selected_options: vec![SelectedOption::new("Size", size)],
        image: None,
        available_for_sale: available,
    };
    Product {
        id: "gid://shopify/Product/1".to_owned(),
        title: "Classic Tee".to_owned(),
        handle: "classic-tee".to_owned(),
        description_html: Some("<p>Soft cotton.</p>".to_owned()),
        product_type: None,
        tags: Vec::new(),
        price_range: PriceRange {
            min_variant_price: Money::new(Decimal::new(1_800, 2), "USD"),
        },
        images: vec![Image {
            url: "https://cdn.example.com/tee.jpg".to_owned(),
            alt_text: None,
        }],
        options: vec![ProductOption {
            name: "Size".to_owned(),
            values: vec!["S".to_owned(), "M".to_owned()],
        }],
        variants: vec![variant("tee-s", "S", false), variant("tee-m", "M", true)],
    }
}

// ---------------------------------------------------------------------------
// Argument parsing
// ---------------------------------------------------------------------------

#[test]
fn parses_categories_command() {
    let cli = Cli::try_parse_from(["storefront-cli", "categories"]).expect("valid args");
    assert!(matches!(cli.command, Commands::Categories));
}

#[test]
fn parses_products_with_category() {
    let cli = Cli::try_parse_from([
        "storefront-cli",
        "products",
        "--category",
        "graphics cards",
    ])
    .expect("valid args");
    assert!(matches!(
        cli.command,
        Commands::Products { category: Some(ref c) } if c == "graphics cards"
    ));
}

#[test]
fn parses_repeated_options_on_show() {
    let cli = Cli::try_parse_from([
        "storefront-cli",
        "show",
        "classic-tee",
        "--option",
        "Size=M",
        "--option",
        "Color = Red",
    ])
    .expect("valid args");
    let Commands::Show { handle, options } = cli.command else {
        panic!("expected show");
    };
    assert_eq!(handle, "classic-tee");
    assert_eq!(
        options,
        vec![
            ("Size".to_owned(), "M".to_owned()),
            ("Color".to_owned(), "Red".to_owned())
        ]
    );
}

#[test]
fn add_defaults_quantity_to_one() {
    let cli = Cli::try_parse_from(["storefront-cli", "add", "classic-tee"]).expect("valid args");
    assert!(matches!(
        cli.command,
        Commands::Add { quantity: 1, ref options, .. } if options.is_empty()
    ));
}

#[test]
fn add_rejects_zero_quantity() {
    let result = Cli::try_parse_from(["storefront-cli", "add", "classic-tee", "--quantity", "0"]);
    assert!(result.is_err());
}

#[test]
fn option_without_equals_is_rejected() {
    let result = Cli::try_parse_from(["storefront-cli", "show", "classic-tee", "--option", "M"]);
    assert!(result.is_err());
    assert!(parse_option_pair("Size=").is_err());
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["storefront-cli"]).is_err());
}

// ---------------------------------------------------------------------------
// Selection and rendering
// ---------------------------------------------------------------------------

#[test]
fn selection_rejects_undeclared_option_and_value() {
    let product = tee();
    let err = selection_from_pairs(&product, &[("Color".to_owned(), "Red".to_owned())])
        .expect_err("unknown option");
    assert!(err.to_string().contains("no option 'Color'"));

    let err = selection_from_pairs(&product, &[("Size".to_owned(), "XL".to_owned())])
        .expect_err("unknown value");
    assert!(err.to_string().contains("values: S, M"));
}

#[test]
fn selection_last_pair_wins() {
    let selection = selection_from_pairs(
        &tee(),
        &[
            ("Size".to_owned(), "S".to_owned()),
            ("Size".to_owned(), "M".to_owned()),
        ],
    )
    .expect("valid pairs");
    assert_eq!(selection.get("Size"), Some("M"));
}

#[test]
fn product_row_shows_price_and_categories() {
    let row = product_row(&tee());
    assert!(row.starts_with("classic-tee"));
    assert!(row.contains("$18.00"));
    assert!(row.ends_with("[clothing]"));
}

#[test]
fn render_without_selection_asks_for_size() {
    let page = render_product(&tee(), &OptionSelection::new());
    assert!(page.contains("$18.00"));
    assert!(page.contains("Size: S (unavailable)  M"));
    assert!(page.contains("variant: choose Size"));
    assert!(page.contains("(Classic Tee)"), "alt text falls back to title");
}

#[test]
fn render_with_selection_shows_variant() {
    let mut selection = OptionSelection::new();
    selection.set("Size", "M");
    let page = render_product(&tee(), &selection);
    assert!(page.contains("$20.00"));
    assert!(page.contains("[M]"));
    assert!(page.contains("variant: M (tee-m)"));
}

#[test]
fn render_lays_out_sections_separated_by_blank_lines() {
    let mut selection = OptionSelection::new();
    selection.set("Size", "M");
    let page = render_product(&tee(), &selection);
    assert_eq!(
        page,
        "Classic Tee\n\
         $20.00\n\
         image: https://cdn.example.com/tee.jpg (Classic Tee)\n\
         \n\
         Soft cotton.\n\
         \n\
         Size: S (unavailable)  [M]\n\
         \n\
         variant: M (tee-m)\n"
    );
}
