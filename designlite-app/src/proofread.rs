//! Text improvement through a generative language model.
//!
//! [`proofread`] never fails: if the service is unconfigured, unreachable, or
//! returns nothing useful, the caller gets its own text back.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Errors from the text-improvement service.
#[derive(Debug, Error)]
pub enum ProofreadError {
    /// No API key is configured.
    #[error("no API key configured, AI features are disabled")]
    MissingApiKey,
    /// The service URL is invalid.
    #[error("invalid text service URL: {0}")]
    InvalidUrl(String),
    /// HTTP layer failed (connection, timeout, body decoding).
    #[error("text service request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The service answered with a non-success status.
    #[error("text service returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        message: String,
    },
    /// The reply carried no text.
    #[error("text service returned an empty reply")]
    EmptyResponse,
}

/// Something that can rewrite text for clarity and grammar.
#[async_trait]
pub trait TextImprover: Send + Sync {
    /// Return an improved version of `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if the improvement could not be produced.
    async fn improve(&self, text: &str) -> Result<String, ProofreadError>;
}

/// Improve `text`, falling back to the input on any failure.
pub async fn proofread(improver: &dyn TextImprover, text: &str) -> String {
    match improver.improve(text).await {
        Ok(improved) => {
            let improved = improved.trim();
            if improved.is_empty() {
                tracing::warn!("text service returned blank text, keeping original");
                text.to_string()
            } else {
                improved.to_string()
            }
        }
        Err(ProofreadError::MissingApiKey) => {
            tracing::warn!("Gemini API key is missing, proofreading is disabled");
            text.to_string()
        }
        Err(e) => {
            tracing::error!(error = %e, "proofreading failed, keeping original text");
            text.to_string()
        }
    }
}

/// Prompt sent to the model for `text`.
#[must_use]
pub fn proofread_prompt(text: &str) -> String {
    format!(
        "Proofread and improve the following text for clarity and grammar. \
         Return ONLY the corrected text, no explanations or quotes:\n\n\"{text}\""
    )
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiClient {
    inner: Arc<InnerClient>,
}

struct InnerClient {
    http: Client,
    endpoint: Url,
    api_key: Option<String>,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.inner.endpoint.as_str())
            .field("has_api_key", &self.inner.api_key.is_some())
            .finish()
    }
}

impl GeminiClient {
    /// Create a client for `model` at `base_url`.
    ///
    /// A client without a key is valid; every call fails with
    /// [`ProofreadError::MissingApiKey`] without touching the network.
    ///
    /// # Errors
    ///
    /// Returns [`ProofreadError::InvalidUrl`] if the URL is malformed.
    /// Returns [`ProofreadError::Http`] if the HTTP client fails to build.
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<String>,
    ) -> Result<Self, ProofreadError> {
        let endpoint = Url::parse(&format!(
            "{}/v1beta/models/{model}:generateContent",
            base_url.trim_end_matches('/')
        ))
        .map_err(|e| ProofreadError::InvalidUrl(e.to_string()))?;

        let http = Client::builder()
            .user_agent("designlite")
            // Disable proxy detection to avoid macOS system-configuration panic
            .no_proxy()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            inner: Arc::new(InnerClient {
                http,
                endpoint,
                api_key,
            }),
        })
    }

    /// Build a client from application configuration.
    ///
    /// # Errors
    ///
    /// See [`GeminiClient::new`].
    pub fn from_config(config: &crate::AppConfig) -> Result<Self, ProofreadError> {
        Self::new(
            &config.gemini_url,
            &config.gemini_model,
            config.gemini_api_key.clone(),
        )
    }

    /// The resolved `generateContent` endpoint.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.inner.endpoint
    }
}

#[async_trait]
impl TextImprover for GeminiClient {
    async fn improve(&self, text: &str) -> Result<String, ProofreadError> {
        let api_key = self
            .inner
            .api_key
            .as_deref()
            .ok_or(ProofreadError::MissingApiKey)?;

        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: Some(proofread_prompt(text)),
                }],
            }],
        };

        let response = self
            .inner
            .http
            .post(self.inner.endpoint.clone())
            .header("x-goog-api-key", api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProofreadError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response.json().await?;
        let reply = body.text();
        tracing::debug!(chars = reply.len(), "text service replied");

        if reply.trim().is_empty() {
            return Err(ProofreadError::EmptyResponse);
        }
        Ok(reply.trim().to_string())
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate.
    fn text(&self) -> String {
        self.candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}
