use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use storefront_core::SuccessAction;
use uuid::Uuid;

use crate::middleware::RequestId;
use crate::session::QuickViewData;

use super::{map_session_error, ok, ApiError, ApiResponse, AppState};

type QuickViewResult = Result<Json<ApiResponse<QuickViewData>>, ApiError>;

#[derive(Debug, Deserialize)]
pub(super) struct OpenRequest {
    pub handle: String,
    #[serde(default)]
    pub on_success: SuccessAction,
}

#[derive(Debug, Deserialize)]
pub(super) struct SelectRequest {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Deserialize)]
pub(super) struct BagQuery {
    pub quantity: Option<u32>,
}

#[derive(Debug, Serialize)]
pub(super) struct Closed {
    id: Uuid,
    closed: bool,
}

pub(super) async fn open(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Json(body): Json<OpenRequest>,
) -> Result<(StatusCode, Json<ApiResponse<QuickViewData>>), ApiError> {
    let catalog = state.catalog.catalog().await;
    let Some(product) = catalog.product_by_handle(&body.handle) else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("product '{}' not found", body.handle),
        ));
    };

    let data = state.sessions.open(product.clone(), body.on_success).await;
    Ok((StatusCode::CREATED, ok(req_id.0, data)))
}

pub(super) async fn show(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> QuickViewResult {
    let data = state
        .sessions
        .view(id)
        .await
        .map_err(|e| map_session_error(req_id.0.clone(), &e))?;
    Ok(ok(req_id.0, data))
}

pub(super) async fn select_option(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Json(body): Json<SelectRequest>,
) -> QuickViewResult {
    let data = state
        .sessions
        .select_option(id, &body.name, &body.value)
        .await
        .map_err(|e| map_session_error(req_id.0.clone(), &e))?;
    Ok(ok(req_id.0, data))
}

pub(super) async fn clear_selection(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> QuickViewResult {
    let data = state
        .sessions
        .clear_selection(id)
        .await
        .map_err(|e| map_session_error(req_id.0.clone(), &e))?;
    Ok(ok(req_id.0, data))
}

/// Starts a submission and answers immediately with the `submitting` view.
/// Poll the quick view for the outcome.
pub(super) async fn add_to_bag(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Query(query): Query<BagQuery>,
) -> QuickViewResult {
    let quantity = query.quantity.unwrap_or(1);
    if quantity == 0 {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            "quantity must be at least 1",
        ));
    }

    let data = state
        .sessions
        .submit(
            id,
            Arc::clone(&state.backend),
            quantity,
            state.success_display,
        )
        .await
        .map_err(|e| map_session_error(req_id.0.clone(), &e))?;
    Ok(ok(req_id.0, data))
}

pub(super) async fn dismiss_error(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> QuickViewResult {
    let data = state
        .sessions
        .dismiss_error(id)
        .await
        .map_err(|e| map_session_error(req_id.0.clone(), &e))?;
    Ok(ok(req_id.0, data))
}

pub(super) async fn close(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Closed>>, ApiError> {
    if !state.sessions.close(id).await {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("quick view {id} not found"),
        ));
    }
    Ok(ok(req_id.0, Closed { id, closed: true }))
}
