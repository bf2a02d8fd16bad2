//! Transport for the Now REST API.
//!
//! Builds requests from the endpoint table, runs them through the
//! interceptor chain and maps responses to typed results or errors.

use bytes::Bytes;
use futures_util::stream::{self, BoxStream};
use futures_util::{future, StreamExt};
use reqwest::{Client, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{NowError, Result};

use super::endpoints::Endpoint;
use super::interceptors::InterceptorChain;
use super::types::ErrorEnvelope;

/// Raw byte stream of a response body.
pub type FileStream = BoxStream<'static, Result<Bytes>>;

/// Placeholder for requests without a body.
pub(crate) const NO_BODY: Option<&()> = None;

/// Interceptor-equipped HTTP transport.
#[derive(Debug, Clone)]
pub(crate) struct NowService {
    /// HTTP client.
    http: Client,
    /// Base URL endpoints are resolved against.
    base_url: Url,
    /// Interceptors applied to every request.
    interceptors: InterceptorChain,
}

impl NowService {
    pub(crate) const fn new(http: Client, base_url: Url, interceptors: InterceptorChain) -> Self {
        Self {
            http,
            base_url,
            interceptors,
        }
    }

    pub(crate) const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Sends a request and fails on any non-2xx status.
    async fn send<B: Serialize + ?Sized>(
        &self,
        endpoint: Endpoint<'_>,
        body: Option<&B>,
    ) -> Result<Response> {
        let mut builder = self
            .http
            .request(endpoint.method(), endpoint.url(&self.base_url));
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let mut request = builder.build()?;
        self.interceptors.apply(&mut request)?;

        debug!("Sending {endpoint}");
        let response = self.http.execute(request).await?;
        let status = response.status();
        debug!("{endpoint} answered {status}");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or_default().to_string());
            warn!("{endpoint} failed with {}: {message}", status.as_u16());
            return Err(NowError::unsuccessful(status.as_u16(), message));
        }

        Ok(response)
    }

    /// Decodes a JSON body, failing if it is empty.
    pub(crate) async fn fetch<T, B>(&self, endpoint: Endpoint<'_>, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.fetch_optional(endpoint, body)
            .await?
            .ok_or_else(|| NowError::io(format!("Empty response body from {endpoint}")))
    }

    /// Decodes a JSON body, mapping an empty or `null` body to `None`.
    pub(crate) async fn fetch_optional<T, B>(
        &self,
        endpoint: Endpoint<'_>,
        body: Option<&B>,
    ) -> Result<Option<T>>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let bytes = self.send(endpoint, body).await?.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice(&bytes)
            .map_err(|e| NowError::io(format!("Failed to parse response from {endpoint}: {e}")))
    }

    /// Sends a request and ignores the body.
    pub(crate) async fn discard(&self, endpoint: Endpoint<'_>) -> Result<()> {
        self.send(endpoint, NO_BODY).await.map(drop)
    }

    /// Reads the whole body as text, failing if it is empty.
    pub(crate) async fn text(&self, endpoint: Endpoint<'_>) -> Result<String> {
        let text = self.send(endpoint, NO_BODY).await?.text().await?;
        if text.is_empty() {
            return Err(NowError::io(format!("Empty response body from {endpoint}")));
        }
        Ok(text)
    }

    /// Exposes the body as a byte stream, failing if it is empty.
    pub(crate) async fn stream(&self, endpoint: Endpoint<'_>) -> Result<FileStream> {
        let mut response = self.send(endpoint, NO_BODY).await?;

        let first = loop {
            match response.chunk().await? {
                Some(chunk) if chunk.is_empty() => {}
                Some(chunk) => break chunk,
                None => return Err(NowError::io(format!("Empty response body from {endpoint}"))),
            }
        };

        let rest = response.bytes_stream().map(|chunk| chunk.map_err(NowError::from));
        Ok(stream::once(future::ready(Ok(first))).chain(rest).boxed())
    }
}

/// Extracts the server message from an error body.
fn error_message(body: &str) -> Option<String> {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if let Some(message) = envelope.error.message.filter(|m| !m.is_empty()) {
            return Some(message);
        }
    }
    let body = body.trim();
    (!body.is_empty()).then(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_envelope() {
        let body = r#"{"error":{"code":"not_found","message":"Deployment not found"}}"#;
        assert_eq!(error_message(body).as_deref(), Some("Deployment not found"));
    }

    #[test]
    fn test_error_message_falls_back_to_body() {
        assert_eq!(error_message("  Bad Gateway  ").as_deref(), Some("Bad Gateway"));
        assert_eq!(error_message(r#"{"error":{}}"#).as_deref(), Some(r#"{"error":{}}"#));
        assert_eq!(error_message("   "), None);
    }
}
