//! OIDC token verification — discovery, JWKS key resolution, claim extraction.
//!
//! # Verification flow
//!
//! 1. At startup, fetch the OpenID discovery document once ([`DiscoveryCache`]).
//!    A fetch failure or a document without `jwks_uri` aborts startup.
//! 2. Per request, decode the JWT header and resolve a verification key from
//!    the issuer's JWKS ([`KeyResolver`]) — by `kid` when the header carries
//!    one, first key otherwise.
//! 3. Verify the RS256 signature, `exp`, and the issuer pinned to the
//!    discovery document ([`TokenValidator`]).
//! 4. Derive [`Credentials`] from the colon-delimited `roles` and
//!    `relationships` claims ([`claims`]). A token without roles is rejected.
//!
//! # Error classes
//!
//! Failures split into two classes the middleware maps to status codes:
//! infrastructure problems (missing `jwks_uri`, unreachable JWKS endpoint)
//! are the server's fault and surface as 500; everything else means the
//! caller's token cannot be verified and surfaces as a generic 401.

pub mod claims;
pub mod discovery;
pub mod jwks;
pub mod validator;

pub use claims::{Credentials, TokenClaims, extract_credentials};
pub use discovery::{DiscoveryCache, DiscoveryDocument};
pub use jwks::KeyResolver;
pub use validator::TokenValidator;

/// Error variants for the token verification pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// JWT decode / signature verification failed.
    #[error("JWT verification failed: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// The cached discovery document has no `jwks_uri`.
    #[error("No jwks_uri in discovery document")]
    MissingJwksUri,

    /// Network or HTTP error while fetching discovery or JWKS documents.
    #[error("Key material fetch error: {0}")]
    Http(#[from] reqwest::Error),

    /// The JWKS document contains no keys.
    #[error("No JWKS keys found")]
    NoSigningKeys,

    /// The `kid` in the JWT header is not in the JWKS.
    #[error("Unknown key ID: {0}")]
    UnknownKeyId(String),

    /// The verified token has no roles, so no identity can be derived.
    #[error("Token has no roles")]
    MissingRoles,
}

impl AuthError {
    /// Whether this failure is an infrastructure/configuration problem
    /// rather than a problem with the caller's token.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::MissingJwksUri | Self::Http(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn internal_class_is_distinguishable_from_unauthorized() {
        assert!(AuthError::MissingJwksUri.is_internal());
        assert!(!AuthError::NoSigningKeys.is_internal());
        assert!(!AuthError::MissingRoles.is_internal());
        assert!(!AuthError::UnknownKeyId("kid-1".to_string()).is_internal());
    }
}
