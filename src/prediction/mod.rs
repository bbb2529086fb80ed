pub mod dictionary;
pub mod engine;
pub mod remote;

pub use dictionary::{Dictionary, LetterCounts};
pub use engine::PredictionEngine;
pub use remote::{HttpPredictor, PredictError, PredictionRequest, Predictor};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Provenance {
    Remote,
    LocalFallback,
}

/// Ranked candidates for the current letter sequence. Replaced wholesale on
/// every cycle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    pub words: Vec<String>,
    pub provenance: Provenance,
    pub generated_at: DateTime<Utc>,
}

impl PredictionResult {
    pub fn empty() -> Self {
        Self {
            words: Vec::new(),
            provenance: Provenance::LocalFallback,
            generated_at: Utc::now(),
        }
    }

    pub fn local(words: Vec<String>) -> Self {
        Self {
            words,
            provenance: Provenance::LocalFallback,
            generated_at: Utc::now(),
        }
    }

    pub fn remote(words: Vec<String>) -> Self {
        Self {
            words,
            provenance: Provenance::Remote,
            generated_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Tunables for the prediction engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct PredictionConfig {
    /// Rolling window of confirmed letters.
    pub max_letters: usize,
    pub max_results: usize,
    /// No prediction cycle runs below this many letters.
    pub min_letters: usize,
    /// Quiet period after the last letter before a cycle starts.
    pub debounce_ms: u64,
    pub remote_timeout_ms: u64,
    /// Remote predictor URL; `None` keeps the engine fully offline.
    pub endpoint: Option<String>,
}

impl Default for PredictionConfig {
    fn default() -> Self {
        Self {
            max_letters: 10,
            max_results: 5,
            min_letters: 2,
            debounce_ms: 1500,
            remote_timeout_ms: 3000,
            endpoint: None,
        }
    }
}
