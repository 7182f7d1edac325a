//! Claim extraction — derives a normalized identity from verified claims.
//!
//! Identity claims arrive in a colon-delimited encoding:
//!
//! - `roles` entries look like `"<roleId>:<ROLE_CODE>:<level>"`; the role is
//!   field index 1 of the first entry.
//! - `relationships` entries look like
//!   `"<relationshipId>:<orgId>:<orgName>:..."`; the caller's current
//!   organisation is field index 2 of the entry whose first field equals
//!   `currentRelationshipId`.
//!
//! A token with no `roles` carries no usable identity and fails
//! authentication. Missing `relationships` is tolerated — the organisation
//! resolves to the empty string.
//!
//! Only an explicit allow-list of fields is copied into [`Credentials`];
//! the raw token is never attached to the request.

use serde::Deserialize;

/// Claims carried by a verified access token (untrusted input shape).
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Subject — the user id.
    pub sub: String,
    /// Expiry (Unix timestamp) — validated by jsonwebtoken internally.
    pub exp: u64,
    /// Ordered colon-delimited role entries.
    #[serde(default)]
    pub roles: Vec<String>,
    /// Ordered colon-delimited organisation memberships.
    #[serde(default)]
    pub relationships: Vec<String>,
    /// Id of the relationship the caller is currently acting under.
    #[serde(default, rename = "currentRelationshipId")]
    pub current_relationship_id: Option<String>,
    /// Email address, when the identity provider supplies one.
    #[serde(default)]
    pub email: Option<String>,
    /// Given name.
    #[serde(default, rename = "firstName")]
    pub first_name: Option<String>,
    /// Family name.
    #[serde(default, rename = "lastName")]
    pub last_name: Option<String>,
}

/// Normalized identity attached to the request for its remaining lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// User id (`sub` claim).
    pub user_id: String,
    /// Role string from the first `roles` entry; `None` when the entry has
    /// no second field.
    pub role: Option<String>,
    /// Current organisation name; empty when unresolvable.
    pub current_organisation: String,
    /// Email address.
    pub email: Option<String>,
    /// Given name.
    pub first_name: Option<String>,
    /// Family name.
    pub last_name: Option<String>,
}

/// Derive [`Credentials`] from verified claims.
///
/// Returns `None` when `roles` is missing or empty — authentication must
/// fail and no route may execute.
#[must_use]
pub fn extract_credentials(claims: &TokenClaims) -> Option<Credentials> {
    if claims.roles.is_empty() {
        return None;
    }

    Some(Credentials {
        user_id: claims.sub.clone(),
        role: extract_role(&claims.roles),
        current_organisation: extract_current_local_authority(
            &claims.relationships,
            claims.current_relationship_id.as_deref(),
        ),
        email: claims.email.clone(),
        first_name: claims.first_name.clone(),
        last_name: claims.last_name.clone(),
    })
}

/// Role string: field index 1 of the first `roles` entry.
#[must_use]
pub fn extract_role(roles: &[String]) -> Option<String> {
    roles
        .first()
        .and_then(|entry| entry.split(':').nth(1))
        .map(str::to_string)
}

/// Organisation name for the caller's current relationship.
///
/// Finds the first `relationships` entry whose first colon-delimited field
/// equals `current_relationship_id` and returns its third field. Returns the
/// empty string when there is no id, no match, or the match has fewer than
/// three fields.
#[must_use]
pub fn extract_current_local_authority(
    relationships: &[String],
    current_relationship_id: Option<&str>,
) -> String {
    let Some(current_id) = current_relationship_id else {
        return String::new();
    };

    relationships
        .iter()
        .map(|entry| entry.split(':').collect::<Vec<_>>())
        .find(|fields| fields.first() == Some(&current_id))
        .and_then(|fields| fields.get(2).map(|name| (*name).to_string()))
        .unwrap_or_default()
}
