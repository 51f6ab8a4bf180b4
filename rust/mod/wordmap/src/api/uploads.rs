use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

use wordmap_core::ServiceError;

use crate::api::AppState;
use crate::service::picture::content_type_for;

pub fn routes() -> Router<AppState> {
    Router::new().route("/uploads/{name}", get(get_upload))
}

async fn get_upload(
    State(svc): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ServiceError> {
    let data = svc
        .read_upload(&name)?
        .ok_or_else(|| ServiceError::NotFound("File not found".into()))?;
    Ok(([(header::CONTENT_TYPE, content_type_for(&name))], data))
}
