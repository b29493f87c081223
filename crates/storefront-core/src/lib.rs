//! Domain model and pure catalog logic for the storefront.
//!
//! Nothing in this crate performs I/O: the client crate feeds it catalog
//! snapshots and the server/CLI render what it returns.

mod app_config;
pub mod bag;
pub mod catalog;
pub mod category;
mod config;
pub mod options;
pub mod variant;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use bag::{AddToBag, BagLine, BagState, Submission, SuccessAction};
pub use catalog::{
    Catalog, Collection, Description, Image, Money, PriceRange, Product, ProductOption,
    SelectedOption, Shop, Variant, CARD_DESCRIPTION_LIMIT,
};
pub use category::{
    classify, filter_products, matches, Category, CategoryClassifier, KeywordClassifier,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use options::{available_values, option_picker, OptionChoices, OptionSelection, ValueChoice};
pub use variant::{
    display_image, display_price, has_standard_size_options, is_standard_size, resolve_variant,
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
