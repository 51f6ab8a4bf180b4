//! Route registration: module routes plus system endpoints.

use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use wordmap_core::Module;

/// Build the complete router.
///
/// System endpoints are merged outside the module's auth layer and stay public.
pub fn build_router(module: &dyn Module) -> Router {
    let system_routes = Router::new()
        .route("/health", get(health))
        .route("/version", get(version));

    tracing::info!(module = module.name(), "mounting module routes");
    module.routes().merge(system_routes)
}

async fn health() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "status": "ok",
    }))
}

async fn version() -> impl IntoResponse {
    axum::Json(serde_json::json!({
        "name": "wordmapd",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
