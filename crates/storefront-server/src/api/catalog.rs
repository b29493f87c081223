use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use storefront_core::{Category, Collection};

use crate::middleware::RequestId;
use crate::views::{CategoryView, ProductCard, ProductDetail};

use super::{ok, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct ShopData {
    name: String,
    description: Option<String>,
    collections: Vec<Collection>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProductQuery {
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct ProductList {
    /// The label the list was filtered by; `all` when absent or unknown.
    category: String,
    products: Vec<ProductCard>,
}

pub(super) async fn shop(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<ShopData>> {
    let catalog = state.catalog.catalog().await;
    ok(
        req_id.0,
        ShopData {
            name: catalog.shop.name.clone(),
            description: catalog.shop.description.clone(),
            collections: catalog.collections.clone(),
        },
    )
}

pub(super) async fn categories(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<Vec<CategoryView>>> {
    let catalog = state.catalog.catalog().await;
    let data = state
        .classifier
        .classify(&catalog.products)
        .into_iter()
        .map(CategoryView::from)
        .collect();
    ok(req_id.0, data)
}

pub(super) async fn list_products(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ProductQuery>,
) -> Json<ApiResponse<ProductList>> {
    let catalog = state.catalog.catalog().await;
    let label = query.category.as_deref().unwrap_or("all");
    let category = Category::parse(label)
        .unwrap_or(Category::All)
        .label()
        .to_owned();

    let products = state
        .classifier
        .filter(&catalog.products, label)
        .into_iter()
        .map(|p| ProductCard::new(p, &*state.classifier))
        .collect();

    ok(req_id.0, ProductList { category, products })
}

pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
) -> Result<Json<ApiResponse<ProductDetail>>, ApiError> {
    let catalog = state.catalog.catalog().await;
    let Some(product) = catalog.product_by_handle(&handle) else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("product '{handle}' not found"),
        ));
    };

    let detail = ProductDetail::new(product, &*state.classifier);
    Ok(ok(req_id.0, detail))
}
