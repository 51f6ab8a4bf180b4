use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use wordmap_core::ServiceError;

use crate::api::AppState;
use crate::model::Claims;

/// Paths that don't require authentication.
const PUBLIC_PATHS: &[&str] = &["/login", "/uploads/"];

/// JWT authentication middleware.
///
/// Checks for a Bearer token in the Authorization header.
/// Public paths are excluded. If valid, stores Claims as an Extension
/// for handlers to access via `Extension<Claims>`.
pub async fn auth_middleware(
    State(svc): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    if is_public_path(req.uri().path()) {
        return next.run(req).await;
    }

    let Some(token) = extract_bearer(req.headers()) else {
        return ServiceError::Unauthorized("missing authorization token".into()).into_response();
    };

    match svc.verify_token(token) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(e) => ServiceError::from(e).into_response(),
    }
}

/// Rejects callers whose token does not carry the admin flag.
/// Must run inside `auth_middleware`.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ServiceError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| ServiceError::Unauthorized("missing authorization token".into()))?;

    if !claims.is_admin {
        return Err(ServiceError::PermissionDenied("Admin access required".into()));
    }
    Ok(next.run(req).await)
}

/// Extract the Bearer token from Authorization header.
fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Check if a path is public (no auth required).
fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.iter().any(|prefix| {
        if prefix.ends_with('/') {
            path.starts_with(prefix)
        } else {
            path == *prefix
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_paths() {
        assert!(is_public_path("/login"));
        assert!(is_public_path("/uploads/123.png"));
        assert!(!is_public_path("/login/extra"));
        assert!(!is_public_path("/users"));
        assert!(!is_public_path("/feature/map-toggle"));
    }

    #[test]
    fn bearer_extraction() {
        let mut headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);

        headers.insert("authorization", "Bearer abc.def".parse().unwrap());
        assert_eq!(extract_bearer(&headers), Some("abc.def"));

        headers.insert("authorization", "Basic abc".parse().unwrap());
        assert_eq!(extract_bearer(&headers), None);

        headers.insert("authorization", "Bearer ".parse().unwrap());
        assert_eq!(extract_bearer(&headers), None);
    }
}
