//! Token verification orchestration.
//!
//! Ties the key resolver, signature verification, and claim extraction
//! together. The algorithm is fixed to RS256 and the issuer is pinned to the
//! discovery document's — a token from any other issuer fails verification
//! before its claims are ever inspected.

use std::sync::Arc;

use jsonwebtoken::{Algorithm, TokenData, Validation};

use super::claims::{Credentials, TokenClaims, extract_credentials};
use super::discovery::DiscoveryCache;
use super::jwks::KeyResolver;
use super::AuthError;

/// Verifies bearer tokens and derives request credentials.
pub struct TokenValidator {
    keys: KeyResolver,
    discovery: Arc<DiscoveryCache>,
    leeway_secs: u64,
}

impl TokenValidator {
    /// Create a validator bound to the process-wide discovery cache.
    #[must_use]
    pub fn new(client: reqwest::Client, discovery: Arc<DiscoveryCache>, leeway_secs: u64) -> Self {
        Self {
            keys: KeyResolver::new(client, Arc::clone(&discovery)),
            discovery,
            leeway_secs,
        }
    }

    /// Verify a bearer token and derive [`Credentials`] from its claims.
    ///
    /// # Errors
    ///
    /// Any verification failure (malformed token, bad signature, expired,
    /// wrong issuer, no usable signing key, roleless token) rejects the
    /// request before any handler runs.
    pub async fn validate(&self, token: &str) -> Result<Credentials, AuthError> {
        let header = jsonwebtoken::decode_header(token)?;
        let key = self.keys.resolve_key(&header).await?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.leeway = self.leeway_secs;
        // Audience is not part of this deployment's token contract
        validation.validate_aud = false;
        if let Some(issuer) = self.discovery.issuer() {
            validation.set_issuer(&[issuer]);
        }

        let token_data: TokenData<TokenClaims> = jsonwebtoken::decode(token, &key, &validation)?;

        extract_credentials(&token_data.claims).ok_or(AuthError::MissingRoles)
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::discovery::DiscoveryDocument;

    use super::*;

    fn validator_with(document: DiscoveryDocument) -> TokenValidator {
        TokenValidator::new(
            reqwest::Client::new(),
            Arc::new(DiscoveryCache::from_document(document)),
            60,
        )
    }

    #[tokio::test]
    async fn malformed_token_is_rejected_before_any_fetch() {
        // GIVEN: a validator with a complete discovery document
        let validator = validator_with(DiscoveryDocument {
            jwks_uri: Some("https://idp.example.test/jwks".to_string()),
            issuer: Some("https://idp.example.test".to_string()),
        });

        // WHEN: validate something that is not a JWT
        let result = validator.validate("not-a-jwt").await;

        // THEN: rejected with a JWT error, unauthorized class
        let err = result.unwrap_err();
        assert!(matches!(err, AuthError::Jwt(_)));
        assert!(!err.is_internal());
    }

    #[tokio::test]
    async fn missing_jwks_uri_is_an_internal_class_error() {
        // GIVEN: an injected discovery document without jwks_uri
        let validator = validator_with(DiscoveryDocument::default());

        // WHEN: validate a structurally plausible (unsigned-garbage) token
        // whose header decodes fine
        let token = "eyJhbGciOiJSUzI1NiIsInR5cCI6IkpXVCJ9.e30.c2ln";
        let result = validator.validate(token).await;

        // THEN: the failure is the internal class, distinguishable from the
        // empty-JWKS unauthorized case
        let err = result.unwrap_err();
        assert!(matches!(err, AuthError::MissingJwksUri));
        assert!(err.is_internal());
    }
}
