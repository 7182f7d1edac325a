//! Access-control middleware — the per-request permission resolver.
//!
//! Runs after authentication. Builds the route key from the uppercased
//! method and the matched route **template** (placeholders intact), asks the
//! [`AccessPolicy`] for a decision, and attaches it to the request. The
//! decision is never mutated afterwards; handlers read it to mask data or
//! refuse an action.
//!
//! [`AccessPolicy`]: crate::access::AccessPolicy

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::access::AccessDecision;
use crate::auth::Credentials;

use super::router::AppState;

/// Access-control middleware
pub async fn access_control_middleware(
    State(state): State<Arc<AppState>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    // Public paths carry no credentials and get no decision
    let Some(credentials) = request.extensions().get::<Credentials>().cloned() else {
        return next.run(request).await;
    };

    let method = request.method().as_str().to_string();
    let route_template = request
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_string());

    let decision = match route_template {
        Some(template) => state
            .policy
            .evaluate(&method, &template, credentials.role.as_deref()),
        // No matched route template (e.g. a 404): nothing to evaluate
        None => AccessDecision::Unrestricted,
    };

    request.extensions_mut().insert(decision);
    next.run(request).await
}
