//! Finance document handlers.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::{error, warn};

use crate::access::AccessDecision;
use crate::audit::{ActionKind, Outcome, write_audit_log};
use crate::auth::Credentials;
use crate::fss::enrich_document_details;

use super::router::{AppState, bad_gateway_response, forbidden_response, upstream_status};

/// GET /file/metadata/{localAuthority} - list finance document metadata
pub async fn get_document_metadata(
    State(state): State<Arc<AppState>>,
    Path(local_authority): Path<String>,
    Extension(credentials): Extension<Credentials>,
    Extension(decision): Extension<AccessDecision>,
) -> Response {
    let role = credentials.role.clone().unwrap_or_else(|| "unknown role".to_string());

    if !decision.is_granted() {
        warn!(role = %role, "Refused finance document listing");
        return forbidden_response(&format!("{role} is not allowed to list finance documents"));
    }

    match state.fss.document_metadata(&local_authority).await {
        Ok(mut documents) => {
            enrich_document_details(&mut documents);
            write_audit_log(&credentials, ActionKind::DocumentsListed, Outcome::Success, None);
            (StatusCode::OK, Json(documents)).into_response()
        }
        Err(e) => {
            error!(local_authority = %local_authority, error = %e, "Failed to fetch document metadata");
            write_audit_log(
                &credentials,
                ActionKind::DocumentsListed,
                Outcome::Failure,
                Some(upstream_status(&e)),
            );
            bad_gateway_response("Failed to fetch document metadata")
        }
    }
}

/// GET /file/{id} - fetch a finance document (PDF passthrough)
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Extension(credentials): Extension<Credentials>,
    Extension(decision): Extension<AccessDecision>,
) -> Response {
    let role = credentials.role.clone().unwrap_or_else(|| "unknown role".to_string());

    if !decision.is_granted() {
        warn!(role = %role, "Refused finance document access");
        return forbidden_response(&format!("{role} is not allowed to access finance documents"));
    }

    match state.fss.fetch_document(&id).await {
        Ok((status, body)) => {
            write_audit_log(
                &credentials,
                ActionKind::DocumentAccessed,
                Outcome::Success,
                Some(status),
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/pdf")],
                body,
            )
                .into_response()
        }
        Err(e) => {
            error!(document_id = %id, error = %e, "Failed to fetch document");
            write_audit_log(
                &credentials,
                ActionKind::DocumentAccessed,
                Outcome::Failure,
                Some(upstream_status(&e)),
            );
            bad_gateway_response("Failed to fetch document")
        }
    }
}
