use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use wordmap_core::ServiceError;

use crate::api::{AppState, JsonBody};
use crate::model::{LoginRequest, LoginResponse};

pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Exchange an access code for a token. The code is never echoed back.
async fn login(
    State(svc): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>, ServiceError> {
    let resp = svc.login(&body.access_code)?;
    Ok(Json(resp))
}
