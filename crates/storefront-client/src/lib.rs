//! Shopify Storefront GraphQL client: catalog queries, cart mutations,
//! and normalization into [`storefront_core`] records.

pub mod client;
pub mod error;
pub mod normalize;
mod queries;
mod retry;
pub mod types;

pub use client::{ClientOptions, StorefrontClient};
pub use error::ClientError;
pub use normalize::normalize_product;
pub use types::Cart;
