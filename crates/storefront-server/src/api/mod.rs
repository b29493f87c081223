mod catalog;
mod quick_view;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use storefront_core::CategoryClassifier;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::StorefrontBackend;
use crate::catalog_store::CatalogStore;
use crate::middleware::{
    enforce_rate_limit, request_id, RateLimitState, RequestId, REQUEST_ID_HEADER,
};
use crate::session::{SessionError, SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogStore,
    pub sessions: SessionStore,
    pub backend: Arc<dyn StorefrontBackend>,
    pub classifier: Arc<dyn CategoryClassifier + Send + Sync>,
    /// How long `success` is shown before the quick view resets or closes.
    pub success_display: Duration,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
struct HealthData {
    status: &'static str,
    products: usize,
    open_quick_views: usize,
    catalog_refreshed_at: DateTime<Utc>,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn ok<T: Serialize>(request_id: String, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        data,
        meta: ResponseMeta::new(request_id),
    })
}

pub(super) fn map_session_error(request_id: String, error: &SessionError) -> ApiError {
    match error {
        SessionError::NotFound(_) => ApiError::new(request_id, "not_found", error.to_string()),
        SessionError::UnknownOption(_) | SessionError::UnknownValue { .. } => {
            ApiError::new(request_id, "validation_error", error.to_string())
        }
    }
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
}

fn quick_view_router(rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/quick-view", post(quick_view::open))
        .route(
            "/api/v1/quick-view/{id}",
            get(quick_view::show).delete(quick_view::close),
        )
        .route(
            "/api/v1/quick-view/{id}/options",
            put(quick_view::select_option).delete(quick_view::clear_selection),
        )
        .route("/api/v1/quick-view/{id}/bag", post(quick_view::add_to_bag))
        .route(
            "/api/v1/quick-view/{id}/bag/dismiss",
            post(quick_view::dismiss_error),
        )
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    let catalog_routes = Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/shop", get(catalog::shop))
        .route("/api/v1/categories", get(catalog::categories))
        .route("/api/v1/products", get(catalog::list_products))
        .route("/api/v1/products/{handle}", get(catalog::get_product));

    Router::new()
        .merge(catalog_routes)
        .merge(quick_view_router(rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let snapshot = state.catalog.snapshot().await;
    ok(
        req_id.0,
        HealthData {
            status: "ok",
            products: snapshot.catalog.products.len(),
            open_quick_views: state.sessions.len().await,
            catalog_refreshed_at: snapshot.refreshed_at,
        },
    )
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
