mod feature;
mod login;
mod middleware;
mod uploads;
mod users;
mod word_inputs;

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::{Json, Router};
use serde::de::DeserializeOwned;

use wordmap_core::ServiceError;

use crate::service::WordMapService;

/// Shared application state.
pub type AppState = Arc<WordMapService>;

/// JSON body extractor whose rejections are `{code, message}` validation
/// errors instead of axum's plain-text 4xx.
pub(crate) struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(rejection_to_error(rejection)),
        }
    }
}

fn rejection_to_error(rejection: JsonRejection) -> ServiceError {
    ServiceError::Validation(rejection.body_text())
}

/// Build the complete word map API router.
///
/// Every route except the public ones requires a valid bearer token;
/// roster administration and the feature flag additionally require an
/// admin token.
pub fn build_router(svc: Arc<WordMapService>) -> Router {
    let admin = Router::new()
        .merge(users::admin_routes())
        .merge(feature::routes())
        .route_layer(axum::middleware::from_fn(middleware::require_admin));

    let api = Router::new()
        .merge(login::routes())
        .merge(uploads::routes())
        .merge(users::routes())
        .merge(word_inputs::routes())
        .merge(admin);

    api.layer(axum::middleware::from_fn_with_state(
        svc.clone(),
        middleware::auth_middleware,
    ))
    .with_state(svc)
}
