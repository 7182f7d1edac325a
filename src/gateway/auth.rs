//! Authentication middleware.
//!
//! Extracts the bearer token, verifies it through the [`TokenValidator`],
//! and attaches the derived [`Credentials`] to the request. Verification
//! failures answer a generic 401 with no claim details; infrastructure
//! failures (unreachable JWKS, degenerate discovery document) answer 500 so
//! operators can tell the two apart.
//!
//! [`TokenValidator`]: crate::auth::TokenValidator
//! [`Credentials`]: crate::auth::Credentials

use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{debug, error, warn};

use super::router::AppState;

/// Authentication middleware
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    // Public paths bypass authentication
    if state.is_public_path(&path) {
        debug!(path = %path, "Public path, skipping auth");
        return next.run(request).await;
    }

    // Extract token from Authorization header
    let token = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| {
            v.strip_prefix("Bearer ")
                .or_else(|| v.strip_prefix("bearer "))
        })
        .map(str::to_string);

    let Some(token) = token else {
        warn!(path = %path, "Missing Authorization header");
        return unauthorized_response();
    };

    match state.validator.validate(&token).await {
        Ok(credentials) => {
            debug!(path = %path, user_id = %credentials.user_id, "Authenticated request");
            request.extensions_mut().insert(credentials);
            next.run(request).await
        }
        Err(e) if e.is_internal() => {
            error!(path = %path, error = %e, "Token verification infrastructure failure");
            internal_error_response()
        }
        Err(e) => {
            warn!(path = %path, error = %e, "Rejected bearer token");
            unauthorized_response()
        }
    }
}

/// Create a 401 Unauthorized response. Deliberately generic: no claim or
/// verification detail reaches the client.
fn unauthorized_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [("WWW-Authenticate", "Bearer")],
        Json(json!({"message": "Unauthorized"})),
    )
        .into_response()
}

/// Create a 500 response for verification-infrastructure failures.
fn internal_error_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"message": "Internal Server Error"})),
    )
        .into_response()
}
