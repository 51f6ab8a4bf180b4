use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, put};
use axum::{Extension, Json, Router};
use serde_json::json;

use wordmap_core::ServiceError;

use crate::api::{AppState, JsonBody};
use crate::model::{Claims, CreateUser, UserView};

/// Multipart field carrying the picture.
const PICTURE_FIELD: &str = "profilePicture";

/// Roster administration. Mounted behind the admin gate.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/{user_id}", delete(delete_user))
        .route("/users/{user_id}/wordmap-visibility", put(toggle_visibility))
}

/// Routes for any signed-in user.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users/available", get(available_users))
        .route("/users/profile-picture", put(update_profile_picture))
}

async fn list_users(State(svc): State<AppState>) -> Result<Json<Vec<UserView>>, ServiceError> {
    Ok(Json(svc.list_users()?))
}

async fn create_user(
    State(svc): State<AppState>,
    JsonBody(input): JsonBody<CreateUser>,
) -> Result<(StatusCode, Json<serde_json::Value>), ServiceError> {
    let user = svc.create_user(input)?;
    let view = UserView::resolve(user, |_| Ok::<_, ServiceError>(None))?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "User added successfully", "user": view })),
    ))
}

async fn delete_user(
    State(svc): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    svc.delete_user(&user_id)?;
    Ok(Json(json!({ "message": "User removed successfully" })))
}

async fn toggle_visibility(
    State(svc): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let visible = svc.toggle_word_map_visibility(&user_id)?;
    Ok(Json(json!({
        "message": "Word map visibility updated successfully",
        "wordMapVisible": visible,
    })))
}

async fn available_users(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<UserView>>, ServiceError> {
    Ok(Json(svc.available_users(&claims.sub)?))
}

async fn update_profile_picture(
    State(svc): State<AppState>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ServiceError> {
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::Validation(e.to_string()))?
    {
        if field.name() != Some(PICTURE_FIELD) {
            continue;
        }
        let file_name = field.file_name().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| ServiceError::Validation(e.to_string()))?;
        upload = Some((file_name, data));
    }

    let (file_name, data) =
        upload.ok_or_else(|| ServiceError::Validation("No file uploaded".into()))?;
    let user = svc.set_profile_picture(&claims.sub, file_name.as_deref(), &data)?;
    Ok(Json(json!({
        "message": "Profile picture updated successfully",
        "user": user,
    })))
}
