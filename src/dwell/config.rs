use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::models::TargetClass;

/// Required dwell per target class.
///
/// Letters, phrases and actions stay long enough that a passing glance
/// cannot trigger them. Prediction slots only appear after deliberate
/// typing, so they can confirm quickly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct DwellTimings {
    pub letter_ms: u64,
    pub phrase_ms: u64,
    pub action_ms: u64,
    pub prediction_ms: u64,
}

impl Default for DwellTimings {
    fn default() -> Self {
        Self {
            letter_ms: 1500,
            phrase_ms: 1500,
            action_ms: 1500,
            prediction_ms: 100,
        }
    }
}

impl DwellTimings {
    pub fn required(&self, class: TargetClass) -> Duration {
        let ms = match class {
            TargetClass::Letter => self.letter_ms,
            TargetClass::Phrase => self.phrase_ms,
            TargetClass::Action => self.action_ms,
            TargetClass::Prediction => self.prediction_ms,
        };
        Duration::from_millis(ms)
    }

    /// Same duration for every class.
    pub fn uniform(ms: u64) -> Self {
        Self {
            letter_ms: ms,
            phrase_ms: ms,
            action_ms: ms,
            prediction_ms: ms,
        }
    }
}
