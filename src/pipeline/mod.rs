//! Single owner of all per-session gaze state.
//!
//! `ingest` is called for every raw sample as it arrives; `tick` is called
//! on the fixed interval with the renderer's current targets and returns
//! everything the renderer needs for that frame. Both take injected
//! instants, so a host that calls them from one task gets the ordering the
//! dwell and prediction components rely on.

pub mod session;

pub use session::{GazeSession, SessionEvent};

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use log::{info, warn};

use crate::calibration::{
    CalibrationConfig, CalibrationError, CalibrationMapping, CalibrationSession, CalibrationStep,
    Viewport,
};
use crate::dwell::{DwellDetector, DwellEvent};
use crate::models::{GazeSample, Point, Target, TargetId};
use crate::prediction::{PredictionEngine, PredictionResult, Predictor};
use crate::resolver::resolve;
use crate::settings::PipelineConfig;
use crate::smoothing::Smoother;

#[derive(Debug, Clone)]
pub enum CalibrationPhase {
    /// No mapping: smoothed points are used as screen points directly.
    Uncalibrated,
    Collecting(CalibrationSession),
    Ready(CalibrationMapping),
}

/// Serializable view of the calibration phase for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", tag = "state")]
pub enum CalibrationStatus {
    Uncalibrated,
    Collecting {
        index: usize,
        total: usize,
        target: Option<Point>,
        progress: f64,
    },
    Ready,
}

/// Per-tick output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineSnapshot {
    pub screen_point: Option<Point>,
    pub hovered_target: Option<TargetId>,
    pub dwell_progress: f64,
    pub is_dwelling: bool,
    /// Set on the tick a dwell completes.
    pub selected: Option<TargetId>,
    pub calibration: CalibrationStatus,
    pub predictions: PredictionResult,
    pub predictions_changed: bool,
    pub is_generating: bool,
}

pub struct GazePipeline {
    smoother: Smoother,
    calibration_config: CalibrationConfig,
    viewport: Viewport,
    phase: CalibrationPhase,
    calibration_progress: f64,
    dwell: DwellDetector,
    prediction: PredictionEngine,
    tracking_enabled: bool,
}

impl GazePipeline {
    pub fn new(config: &PipelineConfig, predictor: Option<Arc<dyn Predictor>>) -> Self {
        Self::with_engine(
            config,
            PredictionEngine::new(config.prediction.clone(), predictor),
        )
    }

    pub fn with_engine(config: &PipelineConfig, prediction: PredictionEngine) -> Self {
        Self {
            smoother: Smoother::new(config.smoothing_alpha),
            calibration_config: config.calibration.clone(),
            viewport: config.viewport,
            phase: CalibrationPhase::Uncalibrated,
            calibration_progress: 0.0,
            dwell: DwellDetector::new(config.dwell.clone()),
            prediction,
            tracking_enabled: true,
        }
    }

    /// Feeds one raw sample. While collecting, the smoothed point is also
    /// offered to the calibration session at the sample's timestamp.
    ///
    /// A degenerate fit drops back to `Uncalibrated` and returns the error;
    /// the caller must start a new calibration run.
    pub fn ingest(
        &mut self,
        sample: &GazeSample,
    ) -> Result<Option<CalibrationStep>, CalibrationError> {
        if !self.tracking_enabled || !sample.point.is_finite() {
            return Ok(None);
        }

        let smoothed = self.smoother.ingest(sample);

        let CalibrationPhase::Collecting(session) = &mut self.phase else {
            return Ok(None);
        };

        match session.observe(smoothed, sample.timestamp) {
            Ok(CalibrationStep::Complete(mapping)) => {
                self.phase = CalibrationPhase::Ready(mapping);
                self.calibration_progress = 0.0;
                Ok(Some(CalibrationStep::Complete(mapping)))
            }
            Ok(step) => {
                self.calibration_progress = match &step {
                    CalibrationStep::Tracking { progress, .. } => *progress,
                    _ => 0.0,
                };
                Ok(Some(step))
            }
            Err(err) => {
                warn!("calibration failed: {}", err);
                self.phase = CalibrationPhase::Uncalibrated;
                self.calibration_progress = 0.0;
                Err(err)
            }
        }
    }

    /// Starts a fresh calibration run, discarding any previous mapping.
    pub fn start_calibration(&mut self) {
        let session = CalibrationSession::new(&self.calibration_config, self.viewport);
        info!(
            "calibration started ({} points)",
            session.total_points()
        );
        self.phase = CalibrationPhase::Collecting(session);
        self.calibration_progress = 0.0;
        self.dwell.cancel();
    }

    /// Same as `start_calibration` with an explicit target sequence.
    pub fn start_calibration_with(&mut self, points: Vec<Point>) {
        let session =
            CalibrationSession::with_points(points, &self.calibration_config, self.viewport);
        self.phase = CalibrationPhase::Collecting(session);
        self.calibration_progress = 0.0;
        self.dwell.cancel();
    }

    /// Current estimate in screen space, `None` before the first sample.
    pub fn screen_point(&self) -> Option<Point> {
        let smoothed = self.smoother.current()?;
        Some(match &self.phase {
            CalibrationPhase::Ready(mapping) => mapping.apply(smoothed),
            _ => smoothed,
        })
    }

    /// Advances dwell and prediction timing against this tick's targets.
    ///
    /// Targets are not selectable while calibrating or while tracking is
    /// paused. A completed letter dwell is pushed into the prediction
    /// sequence before the snapshot is built.
    pub fn tick(&mut self, now: Instant, targets: &[Target]) -> PipelineSnapshot {
        let selectable = self.tracking_enabled && !self.is_calibrating();
        let screen_point = self.screen_point();

        let hovered = if selectable {
            screen_point.and_then(|p| resolve(p, targets))
        } else {
            None
        };

        let mut selected = None;
        if let Some(DwellEvent::Selected { target }) = self.dwell.update(hovered.as_ref(), now) {
            if let TargetId::Letter(c) = &target {
                self.prediction.push_letter(*c, now);
            }
            selected = Some(target);
        }

        let predictions_changed = self.prediction.poll(now);

        PipelineSnapshot {
            screen_point,
            hovered_target: hovered,
            dwell_progress: self.dwell.progress(),
            is_dwelling: self.dwell.is_dwelling(),
            selected,
            calibration: self.calibration_status(),
            predictions: self.prediction.result().clone(),
            predictions_changed,
            is_generating: self.prediction.is_generating(),
        }
    }

    /// Suppresses a pending gaze selection.
    pub fn cancel_dwell(&mut self) -> Option<DwellEvent> {
        self.dwell.cancel()
    }

    /// Clears the letter sequence and predictions immediately.
    pub fn clear_predictions(&mut self) {
        self.prediction.clear();
    }

    /// Message text sent as context with the next remote prediction.
    pub fn set_context(&mut self, message: &str) {
        let context = (!message.trim().is_empty()).then(|| message.to_string());
        self.prediction.set_context(context);
    }

    /// Pausing cancels any dwell and ignores samples until resumed. A
    /// calibration point being collected starts its dwell over on resume.
    pub fn set_tracking_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.dwell.cancel();
        }
        if let CalibrationPhase::Collecting(session) = &mut self.phase {
            session.reset_dwell();
            self.calibration_progress = 0.0;
        }
        if enabled != self.tracking_enabled {
            info!(
                "gaze tracking {}",
                if enabled { "resumed" } else { "paused" }
            );
        }
        self.tracking_enabled = enabled;
    }

    pub fn is_calibrating(&self) -> bool {
        matches!(self.phase, CalibrationPhase::Collecting(_))
    }

    pub fn phase(&self) -> &CalibrationPhase {
        &self.phase
    }

    pub fn mapping(&self) -> Option<&CalibrationMapping> {
        match &self.phase {
            CalibrationPhase::Ready(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn calibration_status(&self) -> CalibrationStatus {
        match &self.phase {
            CalibrationPhase::Uncalibrated => CalibrationStatus::Uncalibrated,
            CalibrationPhase::Collecting(session) => CalibrationStatus::Collecting {
                index: session.current_index(),
                total: session.total_points(),
                target: session.current_target(),
                progress: self.calibration_progress,
            },
            CalibrationPhase::Ready(_) => CalibrationStatus::Ready,
        }
    }

    pub fn predictions(&self) -> &PredictionResult {
        self.prediction.result()
    }

    pub fn prediction_engine(&self) -> &PredictionEngine {
        &self.prediction
    }

    pub fn prediction_engine_mut(&mut self) -> &mut PredictionEngine {
        &mut self.prediction
    }

    pub fn dwell(&self) -> &DwellDetector {
        &self.dwell
    }
}
