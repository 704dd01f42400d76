//! Core `ChatTransport` trait and the `HttpTransport` implementation.
//!
//! `HttpTransport` talks to the assistant backend:
//!
//! | Call         | Endpoint           | Body                         | Reply      |
//! |--------------|--------------------|------------------------------|------------|
//! | `ask_text`   | `POST /chat/text`  | JSON `{query}`               | `{answer}` |
//! | `ask_image`  | `POST /chat/image` | multipart `file` + `query`   | `{answer}` |
//! | `transcribe` | `POST /transcribe` | multipart `file`             | `{text}`   |
//!
//! The base URL comes from [`ServerConfig`]; nothing else is configurable.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::AudioClip;
use crate::chat::Attachment;
use crate::config::ServerConfig;

use super::request::Endpoint;

// ---------------------------------------------------------------------------
// TransportError
// ---------------------------------------------------------------------------

/// Errors that can occur talking to the backend.
///
/// These are for logs and for the recording modal; chat replies never show
/// them verbatim (see [`super::answer_with_fallback`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Connection, DNS or protocol failure.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// The server answered with a non-success status.
    #[error("server returned HTTP {0}")]
    Status(u16),

    /// The body was not the JSON shape the endpoint promises.
    #[error("failed to parse server response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TransportError::Timeout
        } else if e.is_decode() {
            TransportError::Parse(e.to_string())
        } else {
            TransportError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// ChatTransport trait
// ---------------------------------------------------------------------------

/// Async interface to the assistant backend.
///
/// Implementors must be `Send + Sync` so they can be shared with the tokio
/// tasks that run each request (`Arc<dyn ChatTransport>`).
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Ask a text-only question; returns the answer.
    async fn ask_text(&self, query: &str) -> Result<String, TransportError>;

    /// Ask about an image; returns the answer.
    async fn ask_image(&self, image: &Attachment, query: &str) -> Result<String, TransportError>;

    /// Transcribe a recorded clip; returns the transcript.
    async fn transcribe(&self, clip: &AudioClip) -> Result<String, TransportError>;
}

// ---------------------------------------------------------------------------
// Wire bodies
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct TextQuery<'a> {
    query: &'a str,
}

#[derive(Deserialize)]
struct AnswerBody {
    answer: String,
}

#[derive(Deserialize)]
struct TranscriptBody {
    text: String,
}

// ---------------------------------------------------------------------------
// HttpTransport
// ---------------------------------------------------------------------------

/// `reqwest`-backed [`ChatTransport`].
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Build a transport from config.
    ///
    /// The client carries the per-request timeout from `timeout_secs`.  A
    /// default client is used if the builder fails.
    pub fn from_config(config: &ServerConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint.path())
    }

    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        request: reqwest::RequestBuilder,
    ) -> Result<T, TransportError> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            log::debug!("{} answered {status}", endpoint.path());
            return Err(TransportError::Status(status.as_u16()));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| TransportError::Parse(e.to_string()))
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn ask_text(&self, query: &str) -> Result<String, TransportError> {
        let request = self
            .client
            .post(self.url(Endpoint::Text))
            .json(&TextQuery { query });

        let body: AnswerBody = self.post_json(Endpoint::Text, request).await?;
        Ok(body.answer)
    }

    async fn ask_image(&self, image: &Attachment, query: &str) -> Result<String, TransportError> {
        let file = Part::bytes(image.bytes.to_vec())
            .file_name(image.file_name.clone())
            .mime_str(image.mime)?;
        let form = Form::new().part("file", file).text("query", query.to_string());

        let request = self.client.post(self.url(Endpoint::Image)).multipart(form);

        let body: AnswerBody = self.post_json(Endpoint::Image, request).await?;
        Ok(body.answer)
    }

    async fn transcribe(&self, clip: &AudioClip) -> Result<String, TransportError> {
        let file = Part::bytes(clip.wav.clone())
            .file_name(AudioClip::FILE_NAME)
            .mime_str(AudioClip::MIME)?;
        let form = Form::new().part("file", file);

        let request = self
            .client
            .post(self.url(Endpoint::Transcribe))
            .multipart(form);

        let body: TranscriptBody = self.post_json(Endpoint::Transcribe, request).await?;
        Ok(body.text)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
