use bytes::Bytes;
use futures::{stream::BoxStream, StreamExt, TryStreamExt};
use reqwest::{Client, Response};
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

use super::models::{ApiConfig, CheckRequest, CheckResponse, DownloadBody, ErrorResponse};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    /// Non-success status; `message` is whatever the server put in its error payload
    #[error("Server responded with status {status}")]
    ServerError {
        status: u16,
        message: Option<String>,
    },

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[derive(Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        Ok(Url::parse(&format!("{}/{}", base, path))?)
    }

    /// Turn a non-success response into `ApiError::ServerError`, keeping the server's message
    async fn ensure_success(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .and_then(ErrorResponse::into_message);
        warn!(status = status.as_u16(), ?message, "server returned an error");

        Err(ApiError::ServerError {
            status: status.as_u16(),
            message,
        })
    }

    /// Query metadata for a video URL
    pub async fn check(&self, url: &str) -> Result<CheckResponse> {
        let response = self
            .http
            .post(self.endpoint("check")?)
            .json(&CheckRequest { url })
            .send()
            .await?;

        Self::ensure_success(response)
            .await?
            .json()
            .await
            .map_err(|e| ApiError::InvalidResponse(format!("JSON decode error: {}", e)))
    }

    /// Start a download and hand back the body as a chunk stream.
    /// Returns (declared content length, stream)
    pub async fn download_stream(
        &self,
        body: &DownloadBody<'_>,
    ) -> Result<(Option<u64>, BoxStream<'static, Result<Bytes>>)> {
        let response = self
            .http
            .post(self.endpoint("download")?)
            .json(body)
            .send()
            .await?;
        let response = Self::ensure_success(response).await?;

        let total_size = response.content_length();
        debug!(?total_size, "download response headers received");

        let stream = response
            .bytes_stream()
            .map_err(ApiError::RequestError)
            .boxed();

        Ok((total_size, stream))
    }

    /// Fetch raw thumbnail bytes
    pub async fn fetch_thumbnail(&self, url: &str) -> Result<Bytes> {
        let bytes = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        Ok(bytes)
    }
}
