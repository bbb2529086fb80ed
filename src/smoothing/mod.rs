//! Exponential moving average over the raw gaze stream.

use crate::models::{GazeSample, Point};

pub const DEFAULT_ALPHA: f64 = 0.3;

/// Per-axis EMA: `smoothed = alpha * raw + (1 - alpha) * previous`.
///
/// Only the previous smoothed value is kept. The first sample seeds the
/// filter unchanged. Values outside `[0, 1]` pass through unclamped.
#[derive(Debug, Clone)]
pub struct Smoother {
    alpha: f64,
    current: Option<Point>,
}

impl Smoother {
    /// `alpha` is clamped into `(0, 1]`; non-finite values fall back to the default.
    pub fn new(alpha: f64) -> Self {
        let alpha = if alpha.is_finite() && alpha > 0.0 {
            alpha.min(1.0)
        } else {
            DEFAULT_ALPHA
        };
        Self {
            alpha,
            current: None,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn ingest(&mut self, sample: &GazeSample) -> Point {
        let raw = sample.point;
        let next = match self.current {
            None => raw,
            Some(prev) => Point::new(
                self.alpha * raw.x + (1.0 - self.alpha) * prev.x,
                self.alpha * raw.y + (1.0 - self.alpha) * prev.y,
            ),
        };
        self.current = Some(next);
        next
    }

    pub fn current(&self) -> Option<Point> {
        self.current
    }
}

impl Default for Smoother {
    fn default() -> Self {
        Self::new(DEFAULT_ALPHA)
    }
}
