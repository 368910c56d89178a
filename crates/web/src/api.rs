//! Client for the document/prediction backend.
//!
//! Two endpoints, both under the configured base URL:
//! - `POST /upload`: multipart PDF in, `{summary}` or `{error}` out
//! - `POST /predict`: JSON form in, `{custody, compensation, similar_cases?}` or `{error}` out

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::forms::{PDF_CONTENT_TYPE, PdfDocument};
use crate::types::{ErrorBody, PredictionRequest, PredictionResult, UploadResponse};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The backend answered with an `error` field.
    #[error("{0}")]
    Remote(String),

    #[error("backend returned status {0}")]
    Status(u16),

    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    /// What a screen shows: the backend's own message when it sent one.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Remote(message) if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait SummaryService {
    async fn summarize(&self, document: &PdfDocument) -> Result<String, ApiError>;
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait PredictionService {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, ApiError>;
}

/// HTTP client for the backend. No retries, no custom timeouts.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            http: reqwest::Client::new(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl SummaryService for BackendClient {
    async fn summarize(&self, document: &PdfDocument) -> Result<String, ApiError> {
        tracing::info!(file = document.name(), bytes = document.bytes().len(), "uploading document");

        let part = reqwest::multipart::Part::bytes(document.bytes().to_vec())
            .file_name(document.name().to_string())
            .mime_str(PDF_CONTENT_TYPE)
            .map_err(|e| ApiError::Network(e.to_string()))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .http
            .post(self.url("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let body: UploadResponse = read_body(response).await?;
        body.summary
            .ok_or_else(|| ApiError::Decode("response carries no summary".to_string()))
    }
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl PredictionService for BackendClient {
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionResult, ApiError> {
        tracing::info!(child_age = request.child_age, "requesting prediction");

        let response = self
            .http
            .post(self.url("predict"))
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        read_body(response).await
    }
}

async fn read_body<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status().as_u16();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    let outcome = interpret(status, &body);
    if let Err(e) = &outcome {
        tracing::warn!(status, error = %e, "backend request failed");
    }
    outcome
}

/// Map a raw response to a value or an [`ApiError`].
///
/// An `error` field wins over the status code, in both directions.
fn interpret<T: DeserializeOwned>(status: u16, body: &str) -> Result<T, ApiError> {
    if let Ok(ErrorBody { error }) = serde_json::from_str::<ErrorBody>(body) {
        return Err(ApiError::Remote(error));
    }
    if !(200..300).contains(&status) {
        return Err(ApiError::Status(status));
    }

    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}
