//! HTTP client for the FSS API.

use bytes::Bytes;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::config::FssConfig;
use crate::{Error, Result};

use super::documents::DocumentMetadata;

/// Client for the FSS finance service.
///
/// One instance per process; `reqwest::Client` pools connections
/// internally. No retry policy: FSS failures surface to the handler, which
/// audits the failure and answers 502-class.
#[derive(Clone)]
pub struct FssClient {
    http: reqwest::Client,
    base: Url,
    api_key: String,
}

impl FssClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Fails when `fss.api_url` is not a usable base URL.
    pub fn new(http: reqwest::Client, config: &FssConfig) -> Result<Self> {
        let base = Url::parse(&config.api_url)
            .map_err(|e| Error::Config(format!("Invalid fss.api_url: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "fss.api_url is not a base URL: {}",
                config.api_url
            )));
        }

        Ok(Self {
            http,
            base,
            api_key: config.resolve_api_key(),
        })
    }

    /// Build an endpoint URL from path segments (percent-encoded).
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// `GET /bank-details?localAuthority=<name>` — current bank details.
    pub async fn bank_details(&self, local_authority: &str) -> Result<Value> {
        let mut url = self.endpoint(&["bank-details"]);
        url.query_pairs_mut()
            .append_pair("localAuthority", local_authority);

        debug!(%url, "Fetching bank details from FSS");
        let response = self
            .http
            .get(url)
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(status.as_u16(), body));
        }

        Ok(response.json().await?)
    }

    /// `PUT /bank-details/{localAuthority}` — confirm bank details.
    ///
    /// Returns the upstream status and body; non-success statuses are the
    /// caller's to interpret (the response is passed through).
    pub async fn confirm_bank_details(
        &self,
        local_authority: &str,
        payload: &Value,
    ) -> Result<(u16, Value)> {
        let url = self.endpoint(&["bank-details", local_authority]);

        debug!(%url, "Confirming bank details with FSS");
        let response = self
            .http
            .put(url)
            .header("x-api-key", &self.api_key)
            .json(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.json().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    /// `POST /bank-details` — submit new bank details.
    pub async fn create_bank_details(&self, payload: &Value) -> Result<(u16, Value)> {
        let url = self.endpoint(&["bank-details"]);

        debug!(%url, "Creating bank details with FSS");
        let response = self
            .http
            .post(url)
            .header("x-api-key", &self.api_key)
            .json(payload)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.json().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    /// `GET /file/metadata/{localAuthority}` — finance document metadata.
    pub async fn document_metadata(&self, local_authority: &str) -> Result<Vec<DocumentMetadata>> {
        let url = self.endpoint(&["file", "metadata", local_authority]);

        debug!(%url, "Fetching document metadata from FSS");
        let response = self
            .http
            .get(url)
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(status.as_u16(), body));
        }

        Ok(response.json().await?)
    }

    /// `GET /file/{id}` — fetch a finance document (PDF bytes).
    ///
    /// Returns the upstream status with the raw bytes so the handler can
    /// pass the document through and audit the status.
    pub async fn fetch_document(&self, id: &str) -> Result<(u16, Bytes)> {
        let url = self.endpoint(&["file", id]);

        debug!(%url, "Fetching document from FSS");
        let response = self
            .http
            .get(url)
            .header("x-api-key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::upstream(status.as_u16(), body));
        }

        Ok((status.as_u16(), response.bytes().await?))
    }
}
