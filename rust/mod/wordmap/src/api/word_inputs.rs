use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use serde_json::json;

use wordmap_core::ServiceError;

use crate::api::{AppState, JsonBody};
use crate::model::{Claims, WordInputRequest, WordMapEntry};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/word-input", post(upsert_word_input).put(update_word_input))
        .route("/users/{user_id}/word-inputs", get(list_word_inputs))
        .route("/wordmaps/{user_id}", get(list_word_inputs))
}

async fn upsert_word_input(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    JsonBody(body): JsonBody<WordInputRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let outcome = svc.upsert_word_input(&claims.sub, &body.target_user_id, &body.word)?;
    let message = if outcome.created {
        "Word input added successfully"
    } else {
        "Word input updated successfully"
    };
    Ok(Json(json!({ "message": message, "user": outcome.user })))
}

async fn update_word_input(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    JsonBody(body): JsonBody<WordInputRequest>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let user = svc.update_word_input(&claims.sub, &body.target_user_id, &body.word)?;
    Ok(Json(json!({ "message": "Word input updated successfully", "user": user })))
}

async fn list_word_inputs(
    State(svc): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<Vec<WordMapEntry>>, ServiceError> {
    Ok(Json(svc.word_inputs_for(&user_id)?))
}
