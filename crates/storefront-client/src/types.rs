//! Wire types for Storefront API GraphQL responses.
//!
//! Field names follow the API (`camelCase`). Everything the lighter product
//! shape omits (`descriptionHtml`, `productType`, `tags`, `options`,
//! `variants`) is optional here; [`crate::normalize`] turns absence into empty
//! collections.
//!
//! ### `productType`
//! A plain string that is `""` rather than `null` when unset. Normalized to
//! `None`.
//!
//! ### `availableForSale`
//! Always present on variants returned by the API. Defaults to `false` when
//! missing so an unknown variant is never offered for purchase.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Top-level GraphQL response envelope.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<serde_json::Value>,
}

/// Relay-style connection (`edges { node }` plus optional `pageInfo`).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connection<T> {
    #[serde(default = "Vec::new")]
    pub edges: Vec<Edge<T>>,
    #[serde(default)]
    pub page_info: Option<PageInfo>,
}

impl<T> Connection<T> {
    pub fn into_nodes(self) -> impl Iterator<Item = T> {
        self.edges.into_iter().map(|edge| edge.node)
    }
}

#[derive(Debug, Deserialize)]
pub struct Edge<T> {
    pub node: T,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    #[serde(default)]
    pub end_cursor: Option<String>,
}

// ---------------------------------------------------------------------------
// Query payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ShopData {
    pub shop: ShopNode,
}

#[derive(Debug, Deserialize)]
pub struct ShopNode {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionsData {
    pub collections: Connection<CollectionNode>,
}

#[derive(Debug, Deserialize)]
pub struct CollectionNode {
    pub id: String,
    pub title: String,
    pub handle: String,
}

#[derive(Debug, Deserialize)]
pub struct ProductsData {
    pub products: Connection<ProductNode>,
}

#[derive(Debug, Deserialize)]
pub struct ProductByHandleData {
    #[serde(default)]
    pub product: Option<ProductNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNode {
    pub id: String,
    pub title: String,
    pub handle: String,
    #[serde(default)]
    pub description_html: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub price_range: PriceRangeNode,
    #[serde(default)]
    pub images: Option<Connection<ImageNode>>,
    #[serde(default)]
    pub options: Vec<OptionNode>,
    #[serde(default)]
    pub variants: Option<Connection<VariantNode>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceRangeNode {
    pub min_variant_price: MoneyNode,
}

/// `MoneyV2`: the amount arrives as a decimal string, e.g. `"12.99"`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyNode {
    pub amount: Decimal,
    pub currency_code: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageNode {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OptionNode {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantNode {
    pub id: String,
    pub title: String,
    pub price: MoneyNode,
    #[serde(default)]
    pub selected_options: Vec<SelectedOptionNode>,
    #[serde(default)]
    pub image: Option<ImageNode>,
    #[serde(default)]
    pub available_for_sale: bool,
}

#[derive(Debug, Deserialize)]
pub struct SelectedOptionNode {
    pub name: String,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Cart mutations
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartCreateData {
    #[serde(default)]
    pub cart_create: Option<CartPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLinesAddData {
    #[serde(default)]
    pub cart_lines_add: Option<CartPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
    #[serde(default)]
    pub cart: Option<CartNode>,
    #[serde(default)]
    pub user_errors: Vec<CartUserError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartNode {
    pub id: String,
    pub checkout_url: String,
    #[serde(default)]
    pub total_quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct CartUserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// A cart as returned to callers after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: String,
    pub checkout_url: String,
    pub total_quantity: u32,
}

impl From<CartNode> for Cart {
    fn from(node: CartNode) -> Self {
        Self {
            id: node.id,
            checkout_url: node.checkout_url,
            total_quantity: node.total_quantity,
        }
    }
}
