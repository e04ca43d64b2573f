//! Request middleware.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};

/// Header the platform sets on requests it proxies for an authenticated
/// user. Requests without it are rejected.
pub const PLATFORM_USER_HEADER: &str = "x-platform-user-id";

pub async fn platform_auth_middleware(request: Request, next: Next) -> Response {
    let authenticated = request
        .headers()
        .get(PLATFORM_USER_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false);

    if !authenticated {
        return (StatusCode::UNAUTHORIZED, "Not authorized").into_response();
    }

    next.run(request).await
}
