//! OpenID discovery document cache.
//!
//! Fetched exactly once, before the listener binds. A transient failure at
//! boot is an operational incident, not a per-request concern: there is no
//! retry and no refresh. The cache is immutable after construction and
//! shared behind `Arc`; tests inject a fixture via
//! [`DiscoveryCache::from_document`] instead of reaching for the network.

use serde::Deserialize;
use tracing::info;

use super::AuthError;

/// The subset of the OpenID Connect discovery document this service reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoveryDocument {
    /// JWKS endpoint URL. Required in production; its absence at load time
    /// aborts startup.
    #[serde(default)]
    pub jwks_uri: Option<String>,
    /// Issuer identity, pinned during token verification when present.
    #[serde(default)]
    pub issuer: Option<String>,
}

/// Process-wide cache of the discovery document.
pub struct DiscoveryCache {
    document: DiscoveryDocument,
}

impl DiscoveryCache {
    /// Fetch the discovery document from `url`. Called once during startup.
    ///
    /// # Errors
    ///
    /// Fails if the HTTP fetch fails or the document lacks `jwks_uri`;
    /// callers treat either as fatal.
    pub async fn load(client: &reqwest::Client, url: &str) -> Result<Self, AuthError> {
        let document: DiscoveryDocument = client
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if document.jwks_uri.is_none() {
            return Err(AuthError::MissingJwksUri);
        }

        info!(
            issuer = document.issuer.as_deref().unwrap_or("<none>"),
            "Loaded OpenID discovery document"
        );

        Ok(Self { document })
    }

    /// Build a cache from an already-known document, bypassing the network.
    /// Intended for tests; production startup always goes through [`load`].
    ///
    /// [`load`]: DiscoveryCache::load
    #[must_use]
    pub fn from_document(document: DiscoveryDocument) -> Self {
        Self { document }
    }

    /// The JWKS endpoint, if the document carries one.
    #[must_use]
    pub fn jwks_uri(&self) -> Option<&str> {
        self.document.jwks_uri.as_deref()
    }

    /// The issuer identity, if the document carries one.
    #[must_use]
    pub fn issuer(&self) -> Option<&str> {
        self.document.issuer.as_deref()
    }
}
