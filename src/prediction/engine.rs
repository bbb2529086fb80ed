use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio_util::sync::CancellationToken;

use super::{
    Dictionary, PredictError, PredictionConfig, PredictionRequest, PredictionResult, Predictor,
};

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info, log_warn};

type RemoteOutcome = Result<Vec<String>, PredictError>;

/// The single outstanding remote attempt.
struct InFlight {
    generation: u64,
    cancel: CancellationToken,
    rx: oneshot::Receiver<RemoteOutcome>,
}

/// Collects confirmed letters and turns them into ranked candidates.
///
/// Timing is driven by the caller: `push_letter` and `poll` take the current
/// instant, so the debounce window is evaluated on the pipeline tick. Remote
/// attempts run as tokio tasks; their results are picked up by `poll` (or
/// awaited with `wait_for_remote`). A new letter or a clear cancels the
/// outstanding attempt, so at most one is ever in flight.
pub struct PredictionEngine {
    config: PredictionConfig,
    dictionary: Dictionary,
    predictor: Option<Arc<dyn Predictor>>,
    sequence: Vec<char>,
    context: Option<String>,
    generation: u64,
    debounce_deadline: Option<Instant>,
    in_flight: Option<InFlight>,
    result: PredictionResult,
}

impl PredictionEngine {
    pub fn new(config: PredictionConfig, predictor: Option<Arc<dyn Predictor>>) -> Self {
        Self::with_dictionary(config, Dictionary::default(), predictor)
    }

    pub fn with_dictionary(
        config: PredictionConfig,
        dictionary: Dictionary,
        predictor: Option<Arc<dyn Predictor>>,
    ) -> Self {
        Self {
            config,
            dictionary,
            predictor,
            sequence: Vec::new(),
            context: None,
            generation: 0,
            debounce_deadline: None,
            in_flight: None,
            result: PredictionResult::empty(),
        }
    }

    pub fn offline(config: PredictionConfig) -> Self {
        Self::new(config, None)
    }

    /// Appends a confirmed letter. Non-letters are ignored and return false.
    pub fn push_letter(&mut self, letter: char, now: Instant) -> bool {
        if !letter.is_ascii_alphabetic() {
            return false;
        }

        self.sequence.push(letter.to_ascii_lowercase());
        if self.sequence.len() > self.config.max_letters {
            let excess = self.sequence.len() - self.config.max_letters;
            self.sequence.drain(..excess);
        }

        self.supersede();
        self.debounce_deadline = (self.sequence.len() >= self.config.min_letters)
            .then(|| now + Duration::from_millis(self.config.debounce_ms));
        true
    }

    /// Drops the sequence, cancels any remote attempt and empties the
    /// predictions immediately.
    pub fn clear(&mut self) {
        self.sequence.clear();
        self.debounce_deadline = None;
        self.supersede();
    }

    /// In-progress message sent along with the next remote attempt.
    pub fn set_context(&mut self, message: Option<String>) {
        self.context = message;
    }

    /// Advances the debounce window and collects a finished remote attempt.
    /// Returns true when `result()` changed.
    pub fn poll(&mut self, now: Instant) -> bool {
        let mut changed = false;

        if let Some(deadline) = self.debounce_deadline {
            if now >= deadline {
                self.debounce_deadline = None;
                changed |= self.dispatch();
            }
        }

        changed |= self.collect();
        changed
    }

    /// Waits for the outstanding remote attempt, if any, and applies it.
    pub async fn wait_for_remote(&mut self) -> bool {
        let Some(flight) = self.in_flight.as_mut() else {
            return false;
        };
        let outcome = (&mut flight.rx)
            .await
            .unwrap_or(Err(PredictError::Cancelled));
        self.finish(outcome);
        true
    }

    pub fn result(&self) -> &PredictionResult {
        &self.result
    }

    pub fn sequence(&self) -> &[char] {
        &self.sequence
    }

    /// True while waiting out the debounce or a remote reply.
    pub fn is_generating(&self) -> bool {
        self.debounce_deadline.is_some() || self.in_flight.is_some()
    }

    pub fn has_remote(&self) -> bool {
        self.predictor.is_some()
    }

    pub fn config(&self) -> &PredictionConfig {
        &self.config
    }

    /// Local dictionary candidates for the current sequence.
    pub fn local_predictions(&self) -> Vec<String> {
        self.dictionary
            .candidates(&self.sequence, self.config.max_results)
    }

    fn supersede(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if let Some(flight) = self.in_flight.take() {
            log_debug!("cancelling remote prediction (generation {})", flight.generation);
            flight.cancel.cancel();
        }
        self.result = PredictionResult::empty();
    }

    fn dispatch(&mut self) -> bool {
        let predictor = match (&self.predictor, Handle::try_current()) {
            (Some(predictor), Ok(handle)) => Some((Arc::clone(predictor), handle)),
            (Some(_), Err(_)) => {
                log_warn!("no async runtime available; using local predictions");
                None
            }
            (None, _) => None,
        };

        let Some((predictor, handle)) = predictor else {
            self.result = PredictionResult::local(self.local_predictions());
            log_info!(
                "local predictions for {:?}: {:?}",
                self.sequence_string(),
                self.result.words
            );
            return true;
        };

        let request = PredictionRequest::new(&self.sequence, self.context.clone());
        let timeout = Duration::from_millis(self.config.remote_timeout_ms);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let (tx, rx) = oneshot::channel();

        handle.spawn(async move {
            let outcome = tokio::select! {
                _ = token.cancelled() => Err(PredictError::Cancelled),
                reply = tokio::time::timeout(timeout, predictor.predict(&request)) => {
                    reply.unwrap_or(Err(PredictError::Timeout(timeout)))
                }
            };
            // Receiver is gone when the attempt was superseded.
            let _ = tx.send(outcome);
        });

        log_debug!(
            "remote prediction dispatched for {:?} (generation {})",
            self.sequence_string(),
            self.generation
        );
        self.in_flight = Some(InFlight {
            generation: self.generation,
            cancel,
            rx,
        });
        false
    }

    fn collect(&mut self) -> bool {
        let Some(flight) = self.in_flight.as_mut() else {
            return false;
        };
        let outcome = match flight.rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Closed) => Err(PredictError::Cancelled),
        };
        self.finish(outcome);
        true
    }

    fn finish(&mut self, outcome: RemoteOutcome) {
        self.in_flight = None;
        self.result = match outcome {
            Ok(mut words) if !words.is_empty() => {
                words.truncate(self.config.max_results);
                log_info!("remote predictions: {:?}", words);
                PredictionResult::remote(words)
            }
            Ok(_) => {
                log_info!("remote predictor returned nothing; using local predictions");
                PredictionResult::local(self.local_predictions())
            }
            Err(err) => {
                log_warn!("remote prediction failed ({}); using local predictions", err);
                PredictionResult::local(self.local_predictions())
            }
        };
    }

    fn sequence_string(&self) -> String {
        self.sequence.iter().collect()
    }
}

impl Drop for PredictionEngine {
    fn drop(&mut self) {
        if let Some(flight) = self.in_flight.take() {
            flight.cancel.cancel();
        }
    }
}
