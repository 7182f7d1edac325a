//! JWKS fetch and signing-key selection.
//!
//! The JWK set is fetched per validation; only the discovery document is
//! cached process-wide. Key selection honors the token header's `kid` when
//! present, falling back to the first key only for headers without one —
//! single-key issuers behave identically either way, and multi-key issuers
//! (mid key-rotation) resolve the right key instead of always the first.

use jsonwebtoken::{
    DecodingKey, Header,
    jwk::{AlgorithmParameters, Jwk, JwkSet},
};
use std::sync::Arc;
use tracing::debug;

use super::{AuthError, DiscoveryCache};

/// Resolves a verification key for a token header from the issuer's JWKS.
pub struct KeyResolver {
    client: reqwest::Client,
    discovery: Arc<DiscoveryCache>,
}

impl KeyResolver {
    /// Create a resolver reading the JWKS endpoint from the discovery cache.
    #[must_use]
    pub fn new(client: reqwest::Client, discovery: Arc<DiscoveryCache>) -> Self {
        Self { client, discovery }
    }

    /// Resolve the verification key for a token header.
    ///
    /// # Errors
    ///
    /// - [`AuthError::MissingJwksUri`] when the discovery document has no
    ///   JWKS endpoint (infrastructure fault, not the caller's).
    /// - [`AuthError::Http`] when the JWKS fetch fails.
    /// - [`AuthError::NoSigningKeys`] when the key set is empty — the
    ///   caller's token cannot be verified.
    /// - [`AuthError::UnknownKeyId`] when the header names a `kid` absent
    ///   from the set.
    pub async fn resolve_key(&self, header: &Header) -> Result<DecodingKey, AuthError> {
        let jwks_uri = self.discovery.jwks_uri().ok_or(AuthError::MissingJwksUri)?;

        debug!(jwks_uri = %jwks_uri, "Fetching JWKS");
        let jwks: JwkSet = self
            .client
            .get(jwks_uri)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        select_key(&jwks, header.kid.as_deref())
    }
}

/// Select a key from the set and convert it to a [`DecodingKey`].
///
/// With a `kid`, the matching entry is required; without one, the first
/// entry is used.
pub fn select_key(jwks: &JwkSet, kid: Option<&str>) -> Result<DecodingKey, AuthError> {
    if jwks.keys.is_empty() {
        return Err(AuthError::NoSigningKeys);
    }

    let jwk = match kid {
        Some(kid) => jwks
            .keys
            .iter()
            .find(|k| k.common.key_id.as_deref() == Some(kid))
            .ok_or_else(|| AuthError::UnknownKeyId(kid.to_string()))?,
        None => jwks.keys.first().ok_or(AuthError::NoSigningKeys)?,
    };

    decoding_key(jwk)
}

/// Convert a JWK to a verification key. Deterministic: the same key
/// material always yields the same verification key.
fn decoding_key(jwk: &Jwk) -> Result<DecodingKey, AuthError> {
    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => {
            DecodingKey::from_rsa_components(&rsa.n, &rsa.e).map_err(AuthError::Jwt)
        }
        _ => Err(AuthError::Jwt(jsonwebtoken::errors::Error::from(
            jsonwebtoken::errors::ErrorKind::InvalidKeyFormat,
        ))),
    }
}
