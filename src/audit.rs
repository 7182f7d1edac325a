//! Audit logging for sensitive data access.
//!
//! Every sensitive-data handler writes exactly one audit record per outcome
//! branch. Records are emitted via `tracing::info!` with the serialized
//! record in the `audit` field, making the trail queryable by any log
//! aggregator (Loki, CloudWatch, Datadog).
//!
//! # Events
//!
//! | Action kind | When |
//! |-------------|------|
//! | `FullBankDetailsViewed` | Bank details returned unmasked |
//! | `MaskedBankDetailsViewed` | Bank details returned with the sortcode masked |
//! | `BankDetailsConfirmed` | Bank details confirmation forwarded to FSS |
//! | `BankDetailsCreated` | New bank details forwarded to FSS |
//! | `DocumentsListed` | Finance document metadata listed |
//! | `DocumentAccessed` | A finance document fetched |
//!
//! Emission is fire-and-forget: a sink failure is logged and swallowed and
//! never affects the HTTP response.

use serde::Serialize;
use uuid::Uuid;

use crate::auth::Credentials;

/// Result of the audited action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// The action completed.
    Success,
    /// The action failed.
    Failure,
}

/// The closed set of auditable actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActionKind {
    /// Bank details confirmation forwarded to FSS.
    BankDetailsConfirmed,
    /// New bank details forwarded to FSS.
    BankDetailsCreated,
    /// A finance document fetched.
    DocumentAccessed,
    /// Finance document metadata listed.
    DocumentsListed,
    /// Bank details returned unmasked.
    FullBankDetailsViewed,
    /// Bank details returned with the sortcode masked.
    MaskedBankDetailsViewed,
}

/// Structured audit record, created fresh per call and never persisted
/// in-process.
#[derive(Debug, Serialize)]
pub struct AuditRecord {
    /// Fresh random identifier, unique per call.
    pub log_id: Uuid,
    /// User id of the authenticated caller.
    pub user_id: String,
    /// Email, when the token carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    /// Given name, when the token carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_first_name: Option<String>,
    /// Family name, when the token carried one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_last_name: Option<String>,
    /// Role string from the token, when derivable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_role: Option<String>,
    /// Organisation the caller is acting under (empty when unresolved).
    pub local_authority_name: String,
    /// What happened.
    pub action_kind: ActionKind,
    /// How it went.
    pub outcome: Outcome,
    /// HTTP status of the underlying call, when meaningful.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl AuditRecord {
    /// Build a record from the request's authenticated credentials.
    #[must_use]
    pub fn new(
        credentials: &Credentials,
        action: ActionKind,
        outcome: Outcome,
        status_code: Option<u16>,
    ) -> Self {
        Self {
            log_id: Uuid::new_v4(),
            user_id: credentials.user_id.clone(),
            user_email: credentials.email.clone(),
            user_first_name: credentials.first_name.clone(),
            user_last_name: credentials.last_name.clone(),
            user_role: credentials.role.clone(),
            local_authority_name: credentials.current_organisation.clone(),
            action_kind: action,
            outcome,
            status_code,
        }
    }
}

/// Write one audit record for the request's outcome.
///
/// Never fails: serialization problems are logged at warn level and
/// swallowed so the handler's own outcome is preserved.
pub fn write_audit_log(
    credentials: &Credentials,
    action: ActionKind,
    outcome: Outcome,
    status_code: Option<u16>,
) {
    let record = AuditRecord::new(credentials, action, outcome, status_code);
    emit(&record);
}

/// Emit an audit record via `tracing::info!` with structured fields.
///
/// ```text
/// INFO laps_backend::audit audit={"log_id":"...","action_kind":"DocumentsListed",...}
/// ```
pub fn emit(record: &AuditRecord) {
    match serde_json::to_string(record) {
        Ok(ref json) => tracing::info!(audit = %json, "laps audit"),
        Err(ref e) => tracing::warn!(error = %e, "Failed to serialize audit record"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_credentials() -> Credentials {
        Credentials {
            user_id: "123".to_string(),
            role: Some("CEO".to_string()),
            current_organisation: "Shelbyville Council".to_string(),
            email: Some("pat@shelbyville.gov.test".to_string()),
            first_name: Some("Pat".to_string()),
            last_name: Some("Lee".to_string()),
        }
    }

    fn minimal_credentials() -> Credentials {
        Credentials {
            user_id: "123".to_string(),
            role: None,
            current_organisation: String::new(),
            email: None,
            first_name: None,
            last_name: None,
        }
    }

    #[test]
    fn each_record_gets_a_fresh_log_id() {
        // GIVEN: two records for the same request
        let credentials = make_credentials();
        let first = AuditRecord::new(&credentials, ActionKind::DocumentsListed, Outcome::Success, None);
        let second = AuditRecord::new(&credentials, ActionKind::DocumentsListed, Outcome::Success, None);

        // THEN: distinct ids
        assert_ne!(first.log_id, second.log_id);
    }

    #[test]
    fn record_carries_identity_fields() {
        let credentials = make_credentials();
        let record = AuditRecord::new(
            &credentials,
            ActionKind::FullBankDetailsViewed,
            Outcome::Success,
            None,
        );

        assert_eq!(record.user_id, "123");
        assert_eq!(record.user_role.as_deref(), Some("CEO"));
        assert_eq!(record.local_authority_name, "Shelbyville Council");
    }

    #[test]
    fn minimal_tokens_are_tolerated() {
        // GIVEN: credentials with every optional field absent
        let credentials = minimal_credentials();

        // WHEN: build and serialize — must not fail
        let record = AuditRecord::new(
            &credentials,
            ActionKind::MaskedBankDetailsViewed,
            Outcome::Failure,
            Some(502),
        );
        let json = serde_json::to_string(&record).unwrap();

        // THEN: absent fields are omitted, not null
        assert!(!json.contains("user_email"));
        assert!(json.contains("\"status_code\":502"));
    }

    #[test]
    fn action_kinds_serialize_as_pascal_case_names() {
        let json = serde_json::to_string(&ActionKind::MaskedBankDetailsViewed).unwrap();
        assert_eq!(json, "\"MaskedBankDetailsViewed\"");
        let json = serde_json::to_string(&Outcome::Failure).unwrap();
        assert_eq!(json, "\"Failure\"");
    }

    #[test]
    fn emit_does_not_panic() {
        let record = AuditRecord::new(
            &make_credentials(),
            ActionKind::BankDetailsConfirmed,
            Outcome::Success,
            Some(200),
        );
        emit(&record);
    }

    #[test]
    fn write_audit_log_is_infallible_from_the_caller_side() {
        // The public entry point returns unit; nothing to unwrap, nothing
        // to propagate into a handler's control flow
        write_audit_log(
            &minimal_credentials(),
            ActionKind::DocumentAccessed,
            Outcome::Failure,
            Some(404),
        );
    }
}
