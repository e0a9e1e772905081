//! REST API client for the provider's `/videos` endpoints.
//!
//! Wraps job creation, status retrieval, and content download using
//! [`reqwest`]. Every call authenticates with the single shared bearer
//! credential; a missing credential fails before any request is sent.

use crate::config::ProviderConfig;
use crate::types::{CreateVideoRequest, VideoJobResponse};

/// HTTP client for the video-generation provider.
pub struct VideoApi {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

/// Errors from the provider REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The provider returned a non-2xx status code.
    #[error("Provider API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// No credential is configured; the provider was not contacted.
    #[error("No provider API key configured")]
    MissingCredential,
}

impl VideoApi {
    /// Create a new API client from provider configuration.
    pub fn new(config: ProviderConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Create an API client reusing an existing [`reqwest::Client`]
    /// (useful for connection pooling).
    pub fn with_client(client: reqwest::Client, config: ProviderConfig) -> Self {
        Self {
            client,
            base_url: config.base_url,
            api_key: config.api_key,
        }
    }

    /// Whether a credential was configured at startup.
    pub fn credential_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Submit a generation job.
    ///
    /// Sends a `POST /videos` request with the validated generation
    /// parameters. Returns the provider's job resource, which may or may
    /// not carry a provider job id.
    pub async fn create_video(
        &self,
        request: &CreateVideoRequest,
    ) -> Result<VideoJobResponse, ProviderError> {
        let key = self.credential()?;

        let response = self
            .client
            .post(format!("{}/videos", self.base_url))
            .bearer_auth(key)
            .json(request)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Retrieve the current state of a job.
    ///
    /// Sends a `GET /videos/{id}` request. The returned payload carries
    /// status, progress, and an error object when generation failed.
    pub async fn fetch_status(
        &self,
        provider_job_id: &str,
    ) -> Result<VideoJobResponse, ProviderError> {
        let key = self.credential()?;

        let response = self
            .client
            .get(format!("{}/videos/{}", self.base_url, provider_job_id))
            .bearer_auth(key)
            .send()
            .await?;

        Self::parse_response(response).await
    }

    /// Fetch the rendered asset, optionally for a byte range.
    ///
    /// Sends a `GET /videos/{id}/content` request, forwarding `range`
    /// verbatim as a `Range` header when present. The response is
    /// returned unparsed -- including non-2xx responses -- so the caller
    /// can relay the provider's status, headers, and body unchanged.
    /// Only transport failures and a missing credential are errors.
    pub async fn fetch_content(
        &self,
        provider_job_id: &str,
        range: Option<&str>,
    ) -> Result<reqwest::Response, ProviderError> {
        let key = self.credential()?;

        let mut request = self
            .client
            .get(format!(
                "{}/videos/{}/content",
                self.base_url, provider_job_id
            ))
            .bearer_auth(key);

        if let Some(range) = range {
            request = request.header(reqwest::header::RANGE, range);
        }

        Ok(request.send().await?)
    }

    // ---- private helpers ----

    /// The configured credential, or [`ProviderError::MissingCredential`].
    fn credential(&self) -> Result<&str, ProviderError> {
        self.api_key.as_deref().ok_or(ProviderError::MissingCredential)
    }

    /// Ensure the response has a success status code. Returns the
    /// response unchanged on success, or a [`ProviderError::Api`]
    /// containing the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ProviderError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ProviderError> {
        let response = Self::ensure_success(response).await?;
        Ok(response.json::<T>().await?)
    }
}
