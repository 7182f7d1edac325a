//! Route-to-permission mapping and allow-list evaluation.
//!
//! # Design
//!
//! The route map is keyed by the **declared route template**, not the
//! resolved path — `"GET /bank-details/{localAuthority}"`, never
//! `"GET /bank-details/Shelbyville"`. Routes absent from the map carry no
//! restriction: the request continues with an unevaluated decision. This is
//! a deliberate policy choice, preserved as-is — `/health` and
//! `/permissions/config` depend on it.
//!
//! A mapped permission key whose allow-list is missing from configuration
//! degrades to deny with a warning rather than failing the request pipeline.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AuthorizationConfig;

use super::roles::RoleCode;

/// Protected capabilities, one per access-controlled route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionKey {
    /// See unmasked bank details
    ViewFullBankDetails,
    /// Confirm bank details held on record
    ConfirmBankDetails,
    /// Submit new bank details
    CreateBankDetails,
    /// List finance document metadata
    ListFinanceDocuments,
    /// Fetch a finance document
    AccessFinanceDocument,
}

impl PermissionKey {
    /// The configuration key string (camelCase).
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ViewFullBankDetails => "viewFullBankDetails",
            Self::ConfirmBankDetails => "confirmBankDetails",
            Self::CreateBankDetails => "createBankDetails",
            Self::ListFinanceDocuments => "listFinanceDocuments",
            Self::AccessFinanceDocument => "accessFinanceDocument",
        }
    }
}

impl fmt::Display for PermissionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Permission key for a route key (`"<METHOD> <route_template>"`), if the
/// route is access-controlled.
#[must_use]
pub fn permission_for_route(route_key: &str) -> Option<PermissionKey> {
    match route_key {
        "GET /bank-details/{localAuthority}" => Some(PermissionKey::ViewFullBankDetails),
        "PUT /bank-details/{localAuthority}" => Some(PermissionKey::ConfirmBankDetails),
        "POST /bank-details" => Some(PermissionKey::CreateBankDetails),
        "GET /file/metadata/{localAuthority}" => Some(PermissionKey::ListFinanceDocuments),
        "GET /file/{id}" => Some(PermissionKey::AccessFinanceDocument),
        _ => None,
    }
}

/// Request-scoped authorization outcome, attached before the handler runs
/// and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// The route is not in the permission map; no decision was made.
    Unrestricted,
    /// The caller's role is in the allow-list for the route's permission.
    Granted,
    /// The caller's role is not in the allow-list (or could not be
    /// normalized, or the allow-list is misconfigured).
    Denied,
}

impl AccessDecision {
    /// Whether the caller holds the route's permission.
    ///
    /// `Unrestricted` is not a grant: handlers that branch on this are all
    /// mapped routes, where the decision is always `Granted` or `Denied`.
    #[must_use]
    pub fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// The access policy — the route map plus the configured allow-lists.
pub struct AccessPolicy {
    authorization: AuthorizationConfig,
}

impl AccessPolicy {
    /// Build from the `authorization` section of the configuration.
    #[must_use]
    pub fn new(authorization: AuthorizationConfig) -> Self {
        Self { authorization }
    }

    /// Evaluate the decision for a method + route template + raw role.
    #[must_use]
    pub fn evaluate(
        &self,
        method: &str,
        route_template: &str,
        raw_role: Option<&str>,
    ) -> AccessDecision {
        let route_key = format!("{} {route_template}", method.to_uppercase());

        let Some(permission) = permission_for_route(&route_key) else {
            return AccessDecision::Unrestricted;
        };

        let role = raw_role.and_then(RoleCode::normalize);

        let Some(allowed) = self.authorization.allowed_roles(permission) else {
            warn!(
                permission = %permission,
                route_key = %route_key,
                "Permission key has no configured allow-list, denying"
            );
            return AccessDecision::Denied;
        };

        let granted = role.is_some_and(|r| allowed.contains(&r));
        debug!(
            raw_role = raw_role.unwrap_or("<none>"),
            permission = %permission,
            route_key = %route_key,
            granted,
            "Access control check"
        );

        if granted {
            AccessDecision::Granted
        } else {
            AccessDecision::Denied
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn policy_with(entries: &[(PermissionKey, &[RoleCode])]) -> AccessPolicy {
        AccessPolicy::new(AuthorizationConfig(
            entries
                .iter()
                .map(|(k, roles)| (*k, roles.to_vec()))
                .collect(),
        ))
    }

    // ── Route map ─────────────────────────────────────────────────────────

    #[test]
    fn route_map_covers_exactly_the_protected_routes() {
        assert_eq!(
            permission_for_route("GET /bank-details/{localAuthority}"),
            Some(PermissionKey::ViewFullBankDetails)
        );
        assert_eq!(
            permission_for_route("PUT /bank-details/{localAuthority}"),
            Some(PermissionKey::ConfirmBankDetails)
        );
        assert_eq!(
            permission_for_route("POST /bank-details"),
            Some(PermissionKey::CreateBankDetails)
        );
        assert_eq!(
            permission_for_route("GET /file/metadata/{localAuthority}"),
            Some(PermissionKey::ListFinanceDocuments)
        );
        assert_eq!(
            permission_for_route("GET /file/{id}"),
            Some(PermissionKey::AccessFinanceDocument)
        );
        assert_eq!(permission_for_route("GET /health"), None);
        assert_eq!(permission_for_route("GET /permissions/config"), None);
    }

    #[test]
    fn route_key_uses_template_not_resolved_path() {
        // A resolved path must never match the map
        assert_eq!(permission_for_route("GET /bank-details/Shelbyville"), None);
    }

    // ── evaluate ──────────────────────────────────────────────────────────

    #[test]
    fn unmapped_route_is_unrestricted_regardless_of_role() {
        let policy = policy_with(&[(PermissionKey::ViewFullBankDetails, &[RoleCode::CEO])]);

        // GIVEN: a route with no permission mapping and a role nobody allows
        let decision = policy.evaluate("GET", "/permissions/config", Some("Staff"));

        // THEN: no decision is made against the caller
        assert_eq!(decision, AccessDecision::Unrestricted);
    }

    #[test]
    fn allowed_role_is_granted_after_normalization() {
        let policy = policy_with(&[(
            PermissionKey::ViewFullBankDetails,
            &[RoleCode::CEO, RoleCode::HOF],
        )]);

        // Display name normalizes to CEO, which is in the allow-list
        let decision = policy.evaluate(
            "get",
            "/bank-details/{localAuthority}",
            Some("Chief Executive Officer"),
        );
        assert_eq!(decision, AccessDecision::Granted);
    }

    #[test]
    fn role_code_is_accepted_directly() {
        let policy = policy_with(&[(PermissionKey::ConfirmBankDetails, &[RoleCode::WO])]);

        let decision = policy.evaluate("PUT", "/bank-details/{localAuthority}", Some("WO"));
        assert_eq!(decision, AccessDecision::Granted);
    }

    #[test]
    fn unknown_role_is_denied() {
        let policy = policy_with(&[(
            PermissionKey::ViewFullBankDetails,
            &[RoleCode::CEO, RoleCode::HOF],
        )]);

        let decision = policy.evaluate("GET", "/bank-details/{localAuthority}", Some("Staff"));
        assert_eq!(decision, AccessDecision::Denied);
    }

    #[test]
    fn missing_role_is_denied_on_mapped_routes() {
        let policy = policy_with(&[(PermissionKey::ViewFullBankDetails, &[RoleCode::CEO])]);

        let decision = policy.evaluate("GET", "/bank-details/{localAuthority}", None);
        assert_eq!(decision, AccessDecision::Denied);
    }

    #[test]
    fn role_outside_allow_list_is_denied() {
        let policy = policy_with(&[(PermissionKey::ViewFullBankDetails, &[RoleCode::CEO])]);

        let decision = policy.evaluate(
            "GET",
            "/bank-details/{localAuthority}",
            Some("Head of Finance"),
        );
        assert_eq!(decision, AccessDecision::Denied);
    }

    #[test]
    fn missing_policy_entry_degrades_to_deny() {
        // GIVEN: the route maps to createBankDetails but the policy has no
        // entry for it (configuration typo)
        let policy = policy_with(&[]);

        // WHEN: evaluate — must not panic
        let decision = policy.evaluate("POST", "/bank-details", Some("CEO"));

        // THEN: safe deny
        assert_eq!(decision, AccessDecision::Denied);
    }

    #[test]
    fn empty_allow_list_denies_everyone() {
        let mut map = HashMap::new();
        map.insert(PermissionKey::ListFinanceDocuments, Vec::new());
        let policy = AccessPolicy::new(AuthorizationConfig(map));

        let decision = policy.evaluate("GET", "/file/metadata/{localAuthority}", Some("CEO"));
        assert_eq!(decision, AccessDecision::Denied);
    }

    #[test]
    fn permission_key_serializes_camel_case() {
        let json = serde_json::to_string(&PermissionKey::ViewFullBankDetails).unwrap();
        assert_eq!(json, "\"viewFullBankDetails\"");
        assert_eq!(PermissionKey::AccessFinanceDocument.to_string(), "accessFinanceDocument");
    }
}
