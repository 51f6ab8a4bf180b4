use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

use crate::api::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/feature/map-toggle", get(status).post(toggle))
}

async fn status(State(svc): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "success": true, "isEnabled": svc.map_feature_enabled() }))
}

async fn toggle(State(svc): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "success": true, "isEnabled": svc.toggle_map_feature() }))
}
