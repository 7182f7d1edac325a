//! Bank-details handlers.
//!
//! The view handler never refuses: an unauthorized caller gets the masked
//! payload and a `MaskedBankDetailsViewed` audit entry instead of an error.
//! The mutating handlers refuse outright with a 403 naming the role and the
//! attempted action. Every outcome branch writes exactly one audit record.

use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;
use tracing::{error, warn};

use crate::access::AccessDecision;
use crate::audit::{ActionKind, Outcome, write_audit_log};
use crate::auth::Credentials;
use crate::fss::process_bank_details;

use super::router::{AppState, bad_gateway_response, forbidden_response, upstream_status};

/// GET /bank-details/{localAuthority}
pub async fn get_bank_details(
    State(state): State<Arc<AppState>>,
    Path(local_authority): Path<String>,
    Extension(credentials): Extension<Credentials>,
    Extension(decision): Extension<AccessDecision>,
) -> Response {
    let full_view = decision.is_granted();
    let action = if full_view {
        ActionKind::FullBankDetailsViewed
    } else {
        ActionKind::MaskedBankDetailsViewed
    };

    match state.fss.bank_details(&local_authority).await {
        Ok(details) => {
            let body = process_bank_details(details, full_view);
            write_audit_log(&credentials, action, Outcome::Success, None);
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            error!(local_authority = %local_authority, error = %e, "Failed to fetch bank details");
            write_audit_log(&credentials, action, Outcome::Failure, Some(upstream_status(&e)));
            bad_gateway_response("Failed to fetch bank details")
        }
    }
}

/// PUT /bank-details/{localAuthority} - confirm bank details
pub async fn put_bank_details(
    State(state): State<Arc<AppState>>,
    Path(local_authority): Path<String>,
    Extension(credentials): Extension<Credentials>,
    Extension(decision): Extension<AccessDecision>,
    Json(payload): Json<Value>,
) -> Response {
    let role = credentials.role.clone().unwrap_or_else(|| "unknown role".to_string());

    if !decision.is_granted() {
        warn!(role = %role, "Refused bank details confirmation");
        return forbidden_response(&format!("{role} is not allowed to confirm bank details"));
    }

    match state
        .fss
        .confirm_bank_details(&local_authority, &payload)
        .await
    {
        Ok((status, body)) => {
            let outcome = if (200..300).contains(&status) {
                Outcome::Success
            } else {
                Outcome::Failure
            };
            write_audit_log(
                &credentials,
                ActionKind::BankDetailsConfirmed,
                outcome,
                Some(status),
            );
            (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                Json(body),
            )
                .into_response()
        }
        Err(e) => {
            error!(local_authority = %local_authority, error = %e, "Failed to confirm bank details");
            write_audit_log(
                &credentials,
                ActionKind::BankDetailsConfirmed,
                Outcome::Failure,
                Some(upstream_status(&e)),
            );
            bad_gateway_response("Failed to confirm bank details")
        }
    }
}

/// POST /bank-details - submit new bank details
pub async fn post_bank_details(
    State(state): State<Arc<AppState>>,
    Extension(credentials): Extension<Credentials>,
    Extension(decision): Extension<AccessDecision>,
    Json(payload): Json<Value>,
) -> Response {
    let role = credentials.role.clone().unwrap_or_else(|| "unknown role".to_string());

    if !decision.is_granted() {
        warn!(role = %role, "Refused bank details creation");
        return forbidden_response(&format!("{role} is not allowed to create bank details"));
    }

    match state.fss.create_bank_details(&payload).await {
        Ok((status, body)) => {
            let outcome = if (200..300).contains(&status) {
                Outcome::Success
            } else {
                Outcome::Failure
            };
            write_audit_log(
                &credentials,
                ActionKind::BankDetailsCreated,
                outcome,
                Some(status),
            );
            (
                StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
                Json(body),
            )
                .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to create bank details");
            write_audit_log(
                &credentials,
                ActionKind::BankDetailsCreated,
                Outcome::Failure,
                Some(upstream_status(&e)),
            );
            bad_gateway_response("Failed to create bank details")
        }
    }
}
