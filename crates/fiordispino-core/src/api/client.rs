//! API gateway for the game catalog backend.
//!
//! `ApiClient` issues requests against the configured base URL, attaches
//! `Authorization: Token <token>` whenever the `TokenStore` holds one, and
//! maps transport and HTTP failures to `ApiError`.

use std::time::Duration;

use futures::future::{AbortRegistration, Abortable};
use reqwest::{header, Client, Method, RequestBuilder, Url};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

use super::ApiError;
use crate::auth::TokenStore;
use crate::config::Config;

/// External cancellation signal for a single request.
///
/// Create with `futures::future::AbortHandle::new_pair()` and call
/// `abort()` on the handle to cancel.
pub type CancelSignal = AbortRegistration;

/// Append `segment` to `prefix` as one percent-encoded path segment.
///
/// Reserved characters (`/`, `?`, `#`, `%`) stay inside the segment, and
/// dot segments are refused.
pub fn segment_path(prefix: &str, segment: &str) -> Result<String, ApiError> {
    if matches!(segment, "" | "." | "..") {
        return Err(ApiError::InvalidRequest(format!("Invalid path segment {:?}", segment)));
    }

    let mut url = Url::parse("http://localhost")
        .and_then(|base| base.join(prefix))
        .map_err(|e| ApiError::InvalidRequest(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| ApiError::InvalidRequest(format!("Cannot extend path {}", prefix)))?
        .pop_if_empty()
        .push(segment);
    Ok(url.path().to_string())
}

/// API client for the backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: TokenStore,
}

impl ApiClient {
    /// Create a new API client reading its token from `tokens`
    pub fn new(config: &Config, tokens: TokenStore) -> anyhow::Result<Self> {
        Ok(Self::with_client(Self::http_client(config)?, &config.api_base_url, tokens))
    }

    /// Build the pooled HTTP client used by every `ApiClient`
    pub fn http_client(config: &Config) -> anyhow::Result<Client> {
        Ok(Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?)
    }

    pub fn with_client(client: Client, base_url: &str, tokens: TokenStore) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
        }
    }

    /// Create a new ApiClient over another token store, sharing the connection pool.
    pub fn with_tokens(&self, tokens: TokenStore) -> Self {
        Self {
            client: self.client.clone(), // Cheap clone, shares connection pool
            base_url: self.base_url.clone(),
            tokens,
        }
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(path));
        match self.tokens.token() {
            Some(token) => builder.header(header::AUTHORIZATION, format!("Token {}", token)),
            None => builder,
        }
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        cancel: Option<CancelSignal>,
    ) -> Result<T, ApiError> {
        let mut builder = self.request(Method::GET, path);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        self.dispatch(builder, path, cancel).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B, cancel: Option<CancelSignal>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::POST, path).json(body);
        self.dispatch(builder, path, cancel).await
    }

    /// POST without a request body
    pub async fn post_empty<T: DeserializeOwned>(
        &self,
        path: &str,
        cancel: Option<CancelSignal>,
    ) -> Result<T, ApiError> {
        let builder = self.request(Method::POST, path);
        self.dispatch(builder, path, cancel).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B, cancel: Option<CancelSignal>) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.request(Method::PATCH, path).json(body);
        self.dispatch(builder, path, cancel).await
    }

    /// POST that never carries the session token, for login and registration
    pub async fn post_anonymous<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let builder = self.client.post(self.url(path)).json(body);
        self.dispatch(builder, path, None).await
    }

    async fn dispatch<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        path: &str,
        cancel: Option<CancelSignal>,
    ) -> Result<T, ApiError> {
        let request = Self::execute(builder, path);
        match cancel {
            Some(signal) => match Abortable::new(request, signal).await {
                Ok(result) => result,
                Err(_aborted) => {
                    debug!(path = path, "Request cancelled");
                    Err(ApiError::Cancelled)
                }
            },
            None => request.await,
        }
    }

    async fn execute<T: DeserializeOwned>(builder: RequestBuilder, path: &str) -> Result<T, ApiError> {
        debug!(path = path, "Sending request");
        let response = builder.send().await.map_err(|e| {
            if e.is_builder() {
                ApiError::InvalidRequest(e.to_string())
            } else {
                ApiError::Connection(e)
            }
        })?;

        let status = response.status();
        let text = response.text().await.map_err(ApiError::Connection)?;

        if !status.is_success() {
            debug!(path = path, status = status.as_u16(), "Request failed");
            return Err(ApiError::from_status(status, text));
        }

        // Empty bodies (204, bare 201) decode as JSON null
        let body = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(body)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response from {}: {}", path, e)))
    }
}
