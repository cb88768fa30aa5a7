//! HTTP REST API over the product snapshot.
//!
//! Three read-only endpoints, all JSON:
//!
//! - `GET /all_products/` lists every record in snapshot order.
//! - `GET /products/{name}` returns the first record with that exact name.
//! - `GET /products/{name}/{field}` returns `{field: value}` for one key.
//!
//! Unknown products and fields answer 404 with `{"detail": "..."}`.

use crate::error::ApiResult;
use crate::service::ProductService;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Build the axum Router with all REST endpoints.
pub fn router(service: Arc<ProductService>) -> Router {
    Router::new()
        .route("/all_products/", get(all_products))
        .route("/all_products", get(all_products))
        .route("/products/:product_name", get(product))
        .route("/products/:product_name/:product_field", get(product_field))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}

/// Serve the API on `addr` until the process is stopped.
pub async fn serve(addr: SocketAddr, service: Arc<ProductService>) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    serve_on(listener, service).await
}

/// Serve on an already bound listener.
pub async fn serve_on(
    listener: tokio::net::TcpListener,
    service: Arc<ProductService>,
) -> anyhow::Result<()> {
    let app = router(service);
    tracing::info!("REST API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}

// ── Handlers ────────────────────────────────────────────────────

async fn all_products(State(service): State<Arc<ProductService>>) -> Response {
    Json(service.all()).into_response()
}

async fn product(
    State(service): State<Arc<ProductService>>,
    Path(product_name): Path<String>,
) -> ApiResult<Response> {
    let record = service.find_product_by_name(&product_name)?;
    Ok(Json(record).into_response())
}

async fn product_field(
    State(service): State<Arc<ProductService>>,
    Path((product_name, product_field)): Path<(String, String)>,
) -> ApiResult<Response> {
    let value = service.get_product_field_value(&product_name, &product_field)?;
    Ok(Json(value).into_response())
}
