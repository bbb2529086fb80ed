use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use log::info;
use uuid::Uuid;

use crate::calibration::CalibrationStep;
use crate::compose::{Edit, MessageComposer};
use crate::layout;
use crate::models::{GazeSample, TargetId};
use crate::prediction::Predictor;
use crate::settings::PipelineConfig;

use super::{CalibrationStatus, GazePipeline, PipelineSnapshot};

/// Notifications for whoever renders the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum SessionEvent {
    Selected { target: TargetId, message: String },
    CalibrationComplete,
    CalibrationFailed { reason: String },
}

/// A pipeline wired to a message buffer over the default board.
///
/// Letter selections extend the prediction sequence; every other edit
/// clears it and cancels the dwell.
pub struct GazeSession {
    id: String,
    pipeline: GazePipeline,
    composer: MessageComposer,
}

impl GazeSession {
    pub fn new(config: &PipelineConfig, predictor: Option<Arc<dyn Predictor>>) -> Self {
        Self::from_pipeline(GazePipeline::new(config, predictor))
    }

    pub fn from_pipeline(pipeline: GazePipeline) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            pipeline,
            composer: MessageComposer::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Ingests one sample, ticks against the default board and applies any
    /// selection. Returns the snapshot and the events it produced.
    pub fn step(
        &mut self,
        sample: &GazeSample,
        now: Instant,
    ) -> (PipelineSnapshot, Vec<SessionEvent>) {
        let mut events = Vec::new();

        match self.pipeline.ingest(sample) {
            Ok(Some(CalibrationStep::Complete(_))) => {
                events.push(SessionEvent::CalibrationComplete);
            }
            Ok(_) => {}
            Err(err) => events.push(SessionEvent::CalibrationFailed {
                reason: err.to_string(),
            }),
        }

        let targets = layout::default_targets(self.pipeline.predictions().words.len());
        let snapshot = self.pipeline.tick(now, &targets);

        if let Some(target) = &snapshot.selected {
            if self.apply_selection(target, &snapshot.predictions.words) != Edit::Ignored {
                events.push(SessionEvent::Selected {
                    target: target.clone(),
                    message: self.composer.message().to_string(),
                });
            }
        }

        (snapshot, events)
    }

    /// Applies a confirmed selection to the message. `predictions` is the
    /// candidate list that was on screen when it fired.
    pub fn apply_selection(&mut self, target: &TargetId, predictions: &[String]) -> Edit {
        let edit = self.composer.apply(target, predictions);
        match edit {
            Edit::Letter { .. } => {}
            Edit::Text => {
                self.pipeline.clear_predictions();
                self.pipeline.cancel_dwell();
            }
            Edit::Ignored => return edit,
        }
        self.pipeline.set_context(self.composer.message());
        info!(
            "session {}: {} -> {:?}",
            self.id,
            target,
            self.composer.message()
        );
        edit
    }

    pub fn message(&self) -> &str {
        self.composer.message()
    }

    pub fn calibration_status(&self) -> CalibrationStatus {
        self.pipeline.calibration_status()
    }

    pub fn pipeline(&self) -> &GazePipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut GazePipeline {
        &mut self.pipeline
    }
}
