use std::time::{Duration, Instant};

use log::info;

use crate::models::Point;

use super::{CalibrationConfig, CalibrationError, CalibrationMapping, CalibrationSample, Viewport};

/// What a single observation did to the run.
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationStep {
    /// Still waiting on target `index`. `progress` is 0 while the point is
    /// outside the radius.
    Tracking { index: usize, progress: f64 },
    /// Target `index` was accepted; the next observation works on `index + 1`.
    Accepted { index: usize, sample: CalibrationSample },
    /// All targets collected and fitted.
    Complete(CalibrationMapping),
}

/// A calibration run in the collecting phase.
///
/// Targets are visited in grid order. A target is accepted once the observed
/// point has stayed inside the radius for the configured dwell; leaving the
/// radius drops the timer with no partial credit.
#[derive(Debug, Clone)]
pub struct CalibrationSession {
    points: Vec<Point>,
    radius_px: f64,
    dwell: Duration,
    viewport: Viewport,
    index: usize,
    dwell_started: Option<Instant>,
    samples: Vec<CalibrationSample>,
}

impl CalibrationSession {
    pub fn new(config: &CalibrationConfig, viewport: Viewport) -> Self {
        Self::with_points(config.grid.points(), config, viewport)
    }

    pub fn with_points(points: Vec<Point>, config: &CalibrationConfig, viewport: Viewport) -> Self {
        Self {
            points,
            radius_px: config.radius_px,
            dwell: Duration::from_millis(config.dwell_ms),
            viewport,
            index: 0,
            dwell_started: None,
            samples: Vec::new(),
        }
    }

    /// Target currently being collected, `None` once every point is done.
    pub fn current_target(&self) -> Option<Point> {
        self.points.get(self.index).copied()
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn total_points(&self) -> usize {
        self.points.len()
    }

    pub fn samples(&self) -> &[CalibrationSample] {
        &self.samples
    }

    /// Drops any dwell in progress on the current target.
    pub fn reset_dwell(&mut self) {
        self.dwell_started = None;
    }

    pub fn observe(
        &mut self,
        observed: Point,
        now: Instant,
    ) -> Result<CalibrationStep, CalibrationError> {
        let Some(target) = self.current_target() else {
            return CalibrationMapping::fit(&self.samples).map(CalibrationStep::Complete);
        };

        if self.viewport.pixel_distance(&observed, &target) >= self.radius_px {
            self.dwell_started = None;
            return Ok(CalibrationStep::Tracking {
                index: self.index,
                progress: 0.0,
            });
        }

        let started = *self.dwell_started.get_or_insert(now);
        let elapsed = now.saturating_duration_since(started);

        if elapsed < self.dwell {
            let progress = if self.dwell.is_zero() {
                1.0
            } else {
                (elapsed.as_secs_f64() / self.dwell.as_secs_f64()).min(1.0)
            };
            return Ok(CalibrationStep::Tracking {
                index: self.index,
                progress,
            });
        }

        let sample = CalibrationSample { target, observed };
        self.samples.push(sample);
        let accepted = self.index;
        self.index += 1;
        self.dwell_started = None;

        info!(
            "calibration point {}/{} accepted at ({:.3}, {:.3})",
            accepted + 1,
            self.points.len(),
            observed.x,
            observed.y
        );

        if self.index >= self.points.len() {
            let mapping = CalibrationMapping::fit(&self.samples)?;
            info!("calibration complete: {:?}", mapping);
            return Ok(CalibrationStep::Complete(mapping));
        }

        Ok(CalibrationStep::Accepted {
            index: accepted,
            sample,
        })
    }
}
