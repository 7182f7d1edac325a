//! HTTP router, shared state, and the small handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use tower_http::{catch_panic::CatchPanicLayer, compression::CompressionLayer, trace::TraceLayer};

use crate::access::AccessPolicy;
use crate::auth::TokenValidator;
use crate::config::AuthorizationConfig;
use crate::error::Error;
use crate::fss::FssClient;

use super::access_control::access_control_middleware;
use super::auth::auth_middleware;
use super::{bank_details, documents};

/// Shared application state
pub struct AppState {
    /// Token validator (JWKS resolution + signature verification)
    pub validator: TokenValidator,
    /// Access policy (route map + configured allow-lists)
    pub policy: AccessPolicy,
    /// FSS upstream client
    pub fss: FssClient,
    /// Paths that bypass authentication
    pub public_paths: Vec<String>,
    /// The authorization section of the configuration, served to the
    /// frontend so it can mirror gating
    pub authorization: AuthorizationConfig,
}

impl AppState {
    /// Check if a path is public (bypasses auth)
    #[must_use]
    pub fn is_public_path(&self, path: &str) -> bool {
        self.public_paths.iter().any(|p| path.starts_with(p))
    }
}

/// Create the router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/bank-details", post(bank_details::post_bank_details))
        .route(
            "/bank-details/{localAuthority}",
            get(bank_details::get_bank_details).put(bank_details::put_bank_details),
        )
        .route(
            "/file/metadata/{localAuthority}",
            get(documents::get_document_metadata),
        )
        .route("/file/{id}", get(documents::get_document))
        .route("/permissions/config", get(permissions_config_handler))
        // Authentication runs before access control (layers apply bottom-up)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            access_control_middleware,
        ))
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            auth_middleware,
        ))
        .layer(CatchPanicLayer::new())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - liveness probe, public
async fn health_handler() -> impl IntoResponse {
    Json(json!({"message": "success"}))
}

/// GET /permissions/config - the configured permission allow-lists.
/// Authenticated but deliberately absent from the route→permission map.
async fn permissions_config_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.authorization.clone())
}

// ── Shared handler responses ───────────────────────────────────────────────

/// 403 response naming the role and the refused action.
pub(crate) fn forbidden_response(message: &str) -> Response {
    (StatusCode::FORBIDDEN, Json(json!({"message": message}))).into_response()
}

/// 502 response for FSS failures.
pub(crate) fn bad_gateway_response(message: &str) -> Response {
    (StatusCode::BAD_GATEWAY, Json(json!({"message": message}))).into_response()
}

/// Status to audit for a failed FSS call.
pub(crate) fn upstream_status(err: &Error) -> u16 {
    match err {
        Error::Upstream { status, .. } => *status,
        _ => 502,
    }
}
