//! Outbound word prediction.
//!
//! Request body: `{"letters": ["h", "e"], "currentMessage": "I NEED"}`.
//! Response body: `{"predictions": ["help", "hello"]}`.

use async_trait::async_trait;
use log::warn;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionRequest {
    pub letters: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_message: Option<String>,
}

impl PredictionRequest {
    pub fn new(letters: &[char], current_message: Option<String>) -> Self {
        Self {
            letters: letters.iter().map(|c| c.to_string()).collect(),
            current_message: current_message.filter(|m| !m.trim().is_empty()),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct PredictionResponse {
    predictions: Vec<String>,
}

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("prediction request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("prediction service returned status {0}")]
    Status(u16),
    #[error("malformed prediction response: {0}")]
    Malformed(String),
    #[error("prediction timed out after {0:?}")]
    Timeout(Duration),
    #[error("prediction cancelled")]
    Cancelled,
}

/// Anything that can turn a letter sequence into candidate words.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, request: &PredictionRequest) -> Result<Vec<String>, PredictError>;
}

/// JSON-over-HTTP predictor.
pub struct HttpPredictor {
    client: Client,
    endpoint: String,
    timeout: Duration,
}

impl HttpPredictor {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|err| {
                warn!(
                    "failed to build HTTP client ({}); requests run without the {:?} client timeout",
                    err, timeout
                );
                Client::new()
            });
        Self {
            client,
            endpoint: endpoint.into(),
            timeout,
        }
    }
}

#[async_trait]
impl Predictor for HttpPredictor {
    async fn predict(&self, request: &PredictionRequest) -> Result<Vec<String>, PredictError> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PredictError::Timeout(self.timeout)
                } else {
                    PredictError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PredictError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        parse_response(&body)
    }
}

/// Parses a response body into cleaned, lowercased words in service order.
pub fn parse_response(body: &str) -> Result<Vec<String>, PredictError> {
    let parsed: PredictionResponse =
        serde_json::from_str(body).map_err(|e| PredictError::Malformed(e.to_string()))?;

    let mut words: Vec<String> = Vec::with_capacity(parsed.predictions.len());
    for word in parsed.predictions {
        let word = word.trim().to_lowercase();
        if !word.is_empty() && !words.contains(&word) {
            words.push(word);
        }
    }
    Ok(words)
}
